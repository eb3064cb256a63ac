use anyhow::Result;
use chrono::Datelike;
use console::style;
use dialoguer::{Confirm, Input};
use geoproj_core::error::GeoprojError;
use geoproj_core::models::{ClassificationResult, Coordinate, ProjectDraft};
use geoproj_core::ports::{ProjectSubmitter, RecordValidator};
use geoproj_workflow::RegistrationWorkflow;

use crate::commands::register::{report_success, submit_with_spinner};
use crate::errors;
use crate::output::OutputWriter;

/// Interactive registration: pick a point, fill the form, submit with retry
pub async fn register<S, V>(
    workflow: &RegistrationWorkflow<S, V>,
    output: &OutputWriter,
    dry_run: bool,
) -> Result<()>
where
    S: ProjectSubmitter,
    V: RecordValidator,
{
    println!("\n{}\n", style("Project registration").bold());
    workflow.show_map();

    let mut classification = pick_location(workflow, output)?;
    let mut draft = prompt_draft(&ProjectDraft::default())?;

    loop {
        output.kv("Project", &draft.name);
        output.kv("Period", format!("{} years", draft.period_years()));

        let submit = Confirm::new().with_prompt("Submit project?").default(true).interact()?;
        if !submit {
            workflow.clear().map_err(errors::from_domain)?;
            output.info("Registration cancelled");
            return Ok(());
        }

        match submit_with_spinner(workflow, draft.clone(), output).await {
            Ok(body) => return report_success(output, &classification, &draft, body, dry_run),
            Err(GeoprojError::Validation(fields)) => {
                errors::validation_failed(&fields).display();
                draft = prompt_draft(&draft)?;
            }
            Err(GeoprojError::Precondition { reason }) => {
                output.warning(format!("Cannot submit: {}", reason));
                classification = pick_location(workflow, output)?;
            }
            Err(GeoprojError::Submission { message }) => {
                output.error(&message);
                let retry = Confirm::new()
                    .with_prompt("Retry with the same details?")
                    .default(true)
                    .interact()?;
                if !retry {
                    return Err(errors::submission_failed(&message).into());
                }
                draft = workflow.draft();
            }
            Err(other) => return Err(errors::from_domain(other).into()),
        }
    }
}

/// Ask for points until one inside the boundary is confirmed
fn pick_location<S, V>(
    workflow: &RegistrationWorkflow<S, V>,
    output: &OutputWriter,
) -> Result<ClassificationResult>
where
    S: ProjectSubmitter,
    V: RecordValidator,
{
    let center = workflow.settings().viewport.center;
    let mut last = center;

    loop {
        let longitude: f64 =
            Input::new().with_prompt("Longitude").default(last.longitude).interact()?;
        let latitude: f64 =
            Input::new().with_prompt("Latitude").default(last.latitude).interact()?;
        let coordinate = Coordinate::new(longitude, latitude);
        last = coordinate;

        if !coordinate.is_valid() {
            output.warning("Longitude must be within ±180 and latitude within ±90");
            continue;
        }

        match workflow.handle_click(coordinate) {
            Ok(result) => {
                output.kv("Location", result.coordinate);
                output.kv("Climate zone", ClassificationResult::display_zone(&result.climate_zone));
                output.kv(
                    "Ecological zone",
                    ClassificationResult::display_zone(&result.ecological_zone),
                );

                let confirmed =
                    Confirm::new().with_prompt("Use this location?").default(true).interact()?;
                if confirmed {
                    return Ok(result);
                }
            }
            Err(GeoprojError::OutOfBounds { .. }) => {
                output.warning("This location is outside the registration boundary, pick another");
            }
            Err(other) => return Err(errors::from_domain(other).into()),
        }
    }
}

/// Prompt for the operator-entered fields, defaulting to `previous`
fn prompt_draft(previous: &ProjectDraft) -> Result<ProjectDraft> {
    let mut name_input = Input::<String>::new().with_prompt("Project name");
    if !previous.name.is_empty() {
        name_input = name_input.default(previous.name.clone());
    }
    let name = name_input.interact()?;

    let current_year = chrono::Utc::now().year();
    let start_year: i32 = Input::new()
        .with_prompt("Start year")
        .default(previous.start_year.unwrap_or(current_year))
        .interact()?;
    let end_year: i32 = Input::new()
        .with_prompt("End year")
        .default(previous.end_year.unwrap_or(start_year))
        .interact()?;

    Ok(ProjectDraft::new(name.trim(), start_year, end_year))
}
