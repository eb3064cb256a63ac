use geoproj_core::models::{ClassificationResult, Coordinate};
use geoproj_geo::{DatasetSet, PointClassifier};

/// The operator's current map selection
///
/// `confirmed` holds exactly when the stored classification is inside the
/// boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    classification: Option<ClassificationResult>,
    confirmed: bool,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a click and replace the stored selection with it
    ///
    /// An outside click still replaces the selection and drops any prior
    /// confirmation.
    pub fn on_map_click(
        &mut self,
        coordinate: Coordinate,
        datasets: &DatasetSet,
        classifier: &PointClassifier,
    ) -> ClassificationResult {
        let result = classifier.classify_set(coordinate, datasets);
        self.confirmed = result.inside_boundary;
        self.classification = Some(result.clone());
        result
    }

    pub fn reset(&mut self) {
        self.classification = None;
        self.confirmed = false;
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn classification(&self) -> Option<&ClassificationResult> {
        self.classification.as_ref()
    }

    /// The selected coordinate when confirmed
    pub fn confirmed_location(&self) -> Option<Coordinate> {
        self.classification.as_ref().filter(|_| self.confirmed).map(|c| c.coordinate)
    }
}
