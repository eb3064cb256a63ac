use console::style;
use geoproj_core::error::{FieldErrors, GeoprojError};
use geoproj_core::models::Coordinate;
use std::fmt;

/// Error with context and suggested fixes
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// One or more datasets failed to load
pub fn datasets_failed(failures: &[(String, String)]) -> CliError {
    let details: Vec<String> =
        failures.iter().map(|(name, reason)| format!("  {}: {}", name, reason)).collect();

    CliError::new("Dataset loading failed")
        .with_context(format!("Some zone datasets could not be loaded.\n\n{}", details.join("\n")))
        .with_suggestion("Check the dataset paths: geoproj config")
        .with_suggestion("Override a location: --boundary, --climate or --ecological")
        .with_suggestion("Use --geometry-validity lenient to repair invalid zones")
        .with_help("Run: geoproj datasets --help")
}

/// The boundary dataset is required before any location can be accepted
pub fn boundary_unavailable(reason: &str) -> CliError {
    CliError::new("Boundary dataset unavailable")
        .with_context(format!(
            "Locations cannot be accepted until the boundary dataset loads.\n\nReason: {}",
            reason
        ))
        .with_suggestion("Check the boundary location: geoproj config")
        .with_suggestion("Point at another file: --boundary data/boundary.geojson")
        .with_help("Run: geoproj datasets")
}

pub fn out_of_bounds(coordinate: Coordinate) -> CliError {
    CliError::new("Location outside the registration boundary")
        .with_context(format!("The selected point is not inside the boundary.\n\n{}", coordinate))
        .with_suggestion("Pick a point inside the boundary")
        .with_suggestion("Check where a point falls: geoproj classify --lon <LON> --lat <LAT>")
        .with_help("Run: geoproj register --help")
}

pub fn validation_failed(fields: &FieldErrors) -> CliError {
    let details: Vec<String> =
        fields.iter().map(|(field, message)| format!("  {}: {}", field, message)).collect();

    let mut error = CliError::new("Project record is invalid")
        .with_context(format!("Fix the following fields:\n\n{}", details.join("\n")));
    for (field, _) in fields.iter() {
        if let Some(flag) = field_flag(field) {
            error = error.with_suggestion(format!("Provide a valid value with {}", flag));
        }
    }
    error.with_help("Run: geoproj register --help")
}

fn field_flag(field: &str) -> Option<&'static str> {
    match field {
        "name" => Some("--name"),
        "owner" => Some("--owner"),
        "location" => Some("--lon/--lat"),
        "start_year" => Some("--start-year"),
        "end_year" => Some("--end-year"),
        _ => None,
    }
}

pub fn submission_failed(message: &str) -> CliError {
    CliError::new("Project registration failed")
        .with_context(format!("The backend rejected the submission.\n\nError: {}", message))
        .with_suggestion("Check the backend URL: geoproj config")
        .with_suggestion("Retry later, or rehearse with --dry-run")
        .with_help("Run: geoproj register --help")
}

pub fn missing_arguments(missing: &[&str]) -> CliError {
    CliError::new("Missing required arguments")
        .with_context(format!("Non-interactive registration needs: {}", missing.join(", ")))
        .with_suggestion("Provide the missing flags")
        .with_suggestion("Or run interactively: geoproj register --interactive")
        .with_help("Run: geoproj register --help")
}

/// Map a domain error onto the CLI error with the most useful hints
pub fn from_domain(error: GeoprojError) -> CliError {
    match error {
        GeoprojError::OutOfBounds { longitude, latitude } => {
            out_of_bounds(Coordinate::new(longitude, latitude))
        }
        GeoprojError::Validation(fields) => validation_failed(&fields),
        GeoprojError::Submission { message } => submission_failed(&message),
        GeoprojError::ConfigInvalid { key, reason } => invalid_config(&key, &reason),
        other => CliError::new(other.to_string()),
    }
}

/// Create error for invalid configuration
pub fn invalid_config(key: &str, reason: &str) -> CliError {
    CliError::new(format!("Invalid configuration: {}", key))
        .with_context(format!("Configuration value is invalid.\n\nReason: {}", reason))
        .with_suggestion("Check geoproj.toml for syntax errors")
        .with_suggestion("Check GEOPROJ_* environment variables")
        .with_help("Run: geoproj config")
}

/// Convert anyhow::Error to CliError with context
pub fn from_anyhow(error: anyhow::Error) -> CliError {
    let error = match error.downcast::<GeoprojError>() {
        Ok(domain) => return from_domain(domain),
        Err(other) => other,
    };
    let message = format!("{:#}", error);

    if message.contains("No such file or directory") {
        CliError::new("File not found")
            .with_context(format!("Error: {}", message))
            .with_suggestion("Check the file path and try again")
    } else if message.contains("Failed to load configuration") {
        invalid_config("file", &message)
    } else if message.contains("Connection refused") {
        CliError::new("Cannot reach the backend")
            .with_context(format!("Error: {}", message))
            .with_suggestion("Check the backend URL: geoproj config")
            .with_suggestion("Or rehearse with --dry-run")
    } else {
        CliError::new(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_fields() {
        let mut fields = FieldErrors::new();
        fields.insert("name", "Project name is required");
        fields.insert("end_year", "End year must not be before start year");

        let error = validation_failed(&fields);
        let context = error.context.unwrap();
        assert!(context.contains("name: Project name is required"));
        assert!(context.contains("end_year: End year must not be before start year"));
        assert_eq!(error.suggestions.len(), 2);
    }

    #[test]
    fn test_domain_errors_map_to_hints() {
        let error = from_domain(GeoprojError::Submission { message: "Internal Server Error".into() });
        assert_eq!(error.message, "Project registration failed");
        assert!(error.context.unwrap().contains("Internal Server Error"));

        let error = from_anyhow(anyhow::Error::from(GeoprojError::OutOfBounds {
            longitude: -43.2,
            latitude: -22.9,
        }));
        assert_eq!(error.message, "Location outside the registration boundary");
    }
}
