use geo::{BoundingRect, Intersects, MultiPolygon, Point};
use geoproj_core::models::Coordinate;
use rstar::{RTree, RTreeObject, AABB};

/// Bounding box of one zone, keyed by the zone's position in its dataset
#[derive(Debug, Clone, PartialEq)]
struct IndexedZone {
    position: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedZone {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Bounding-box prefilter over a dataset's zones
///
/// Only narrows candidates. Exact containment is checked with
/// [`point_in_shape`].
#[derive(Debug, Default)]
pub struct ZoneIndex {
    tree: RTree<IndexedZone>,
}

impl ZoneIndex {
    /// Build from zone shapes in dataset order
    ///
    /// Empty shapes have no bounding box and are never candidates.
    pub fn from_shapes(shapes: &[MultiPolygon<f64>]) -> Self {
        let indexed: Vec<IndexedZone> = shapes
            .iter()
            .enumerate()
            .filter_map(|(position, shape)| {
                let rect = shape.bounding_rect()?;
                let (min, max) = (rect.min(), rect.max());
                Some(IndexedZone {
                    position,
                    envelope: AABB::from_corners([min.x, min.y], [max.x, max.y]),
                })
            })
            .collect();

        Self { tree: RTree::bulk_load(indexed) }
    }

    /// Positions of zones whose bounding box covers the point, ascending
    pub fn candidates(&self, coordinate: Coordinate) -> Vec<usize> {
        let probe = AABB::from_point(coordinate.as_xy());
        let mut positions: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&probe)
            .map(|zone| zone.position)
            .collect();
        positions.sort_unstable();
        positions
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

/// Point-in-polygon with boundary points counted as inside
pub fn point_in_shape(shape: &MultiPolygon<f64>, coordinate: Coordinate) -> bool {
    shape.intersects(&Point::new(coordinate.longitude, coordinate.latitude))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{to_geo_multi_polygon, Geometry};

    fn shapes() -> Vec<MultiPolygon<f64>> {
        vec![
            to_geo_multi_polygon(&Geometry::rectangle([0.0, 0.0], [10.0, 10.0])),
            to_geo_multi_polygon(&Geometry::rectangle([20.0, 20.0], [30.0, 30.0])),
            to_geo_multi_polygon(&Geometry::rectangle([5.0, 5.0], [25.0, 25.0])),
            MultiPolygon::new(vec![]),
        ]
    }

    #[test]
    fn test_candidates_are_in_dataset_order() {
        let index = ZoneIndex::from_shapes(&shapes());
        assert_eq!(index.len(), 3);
        assert_eq!(index.candidates(Coordinate::new(7.0, 7.0)), vec![0, 2]);
        assert_eq!(index.candidates(Coordinate::new(22.0, 22.0)), vec![1, 2]);
        assert!(index.candidates(Coordinate::new(-1.0, -1.0)).is_empty());
    }

    #[test]
    fn test_hole_excludes_point() {
        let donut = to_geo_multi_polygon(&Geometry::polygon(vec![
            vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]],
            vec![[4.0, 4.0], [6.0, 4.0], [6.0, 6.0], [4.0, 6.0], [4.0, 4.0]],
        ]));

        assert!(point_in_shape(&donut, Coordinate::new(2.0, 2.0)));
        assert!(!point_in_shape(&donut, Coordinate::new(5.0, 5.0)));
    }

    #[test]
    fn test_edge_counts_as_inside() {
        let square = to_geo_multi_polygon(&Geometry::rectangle([0.0, 0.0], [10.0, 10.0]));
        assert!(point_in_shape(&square, Coordinate::new(10.0, 5.0)));
        assert!(point_in_shape(&square, Coordinate::new(0.0, 0.0)));
        assert!(!point_in_shape(&square, Coordinate::new(10.000001, 5.0)));
    }
}
