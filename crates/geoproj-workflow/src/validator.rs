use chrono::{Datelike, Utc};
use geoproj_core::error::FieldErrors;
use geoproj_core::models::{CandidateRecord, ProjectRecord};
use geoproj_core::ports::RecordValidator;

/// Latest year a project period may reach
pub const MAX_PROJECT_YEAR: i32 = 2100;

/// Field rules for project registration
///
/// Errors are keyed by field name; the first failing rule per field is kept.
#[derive(Debug, Clone)]
pub struct ProjectValidator {
    country_region: String,
    current_year: i32,
}

impl ProjectValidator {
    /// Validator for `country_region`, with the current UTC year as the lower bound
    pub fn new(country_region: impl Into<String>) -> Self {
        Self::with_current_year(country_region, Utc::now().year())
    }

    pub fn with_current_year(country_region: impl Into<String>, current_year: i32) -> Self {
        Self { country_region: country_region.into(), current_year }
    }

    fn check_year(&self, errors: &mut FieldErrors, field: &str, label: &str, year: Option<i32>) {
        match year {
            None => errors.insert(field, format!("{} is required", label)),
            Some(y) if y < self.current_year => {
                errors.insert(field, format!("{} must be {} or later", label, self.current_year))
            }
            Some(y) if y > MAX_PROJECT_YEAR => {
                errors.insert(field, format!("{} must be {} or earlier", label, MAX_PROJECT_YEAR))
            }
            Some(_) => {}
        }
    }
}

impl RecordValidator for ProjectValidator {
    fn validate(&self, candidate: &CandidateRecord) -> Result<ProjectRecord, FieldErrors> {
        let mut errors = FieldErrors::new();

        if candidate.name.trim().is_empty() {
            errors.insert("name", "Project name is required");
        }
        if candidate.owner.trim().is_empty() {
            errors.insert("owner", "Owner is required");
        }
        if candidate.code == 0 {
            errors.insert("code", "Code is required");
        }
        if candidate.location.is_none() {
            errors.insert("location", "Location is required");
        }
        if candidate.country_region != self.country_region {
            errors.insert("country_region", format!("Country/region must be {}", self.country_region));
        }

        self.check_year(&mut errors, "start_year", "Start year", candidate.start_year);
        self.check_year(&mut errors, "end_year", "End year", candidate.end_year);
        if let (Some(start), Some(end)) = (candidate.start_year, candidate.end_year) {
            if end < start {
                errors.insert("end_year", "End year must not be before start year");
            }
        }

        match (candidate.location, candidate.start_year, candidate.end_year) {
            (Some(location), Some(start_year), Some(end_year)) if errors.is_empty() => {
                Ok(ProjectRecord {
                    name: candidate.name.trim().to_string(),
                    owner: candidate.owner.clone(),
                    code: candidate.code,
                    location,
                    country_region: candidate.country_region.clone(),
                    climate_zone: candidate.climate_zone.clone(),
                    ecological_zone: candidate.ecological_zone.clone(),
                    start_year,
                    end_year,
                })
            }
            _ => Err(errors),
        }
    }
}
