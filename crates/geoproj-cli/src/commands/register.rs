//! Register command implementation

use crate::cli::RegisterArgs;
use crate::commands::{datasets, geographic_point};
use crate::errors;
use crate::interactive;
use crate::map_view::TerminalMapView;
use crate::output::OutputWriter;
use crate::output_types::RegisterOutput;
use crate::progress::{create_spinner, finish_error, finish_success};
use anyhow::Result;
use geoproj_backend::{HttpProjectSubmitter, MemoryProjectSubmitter};
use geoproj_core::config::LayeredConfig;
use geoproj_core::models::{ClassificationResult, ProjectDraft, SubmissionOutcome};
use geoproj_core::ports::{MapView, ProjectSubmitter, RecordValidator};
use geoproj_workflow::{LazyMapView, ProjectValidator, RegistrationWorkflow, WorkflowSettings};
use std::sync::Arc;

pub async fn execute(
    args: RegisterArgs,
    config: &LayeredConfig,
    output: &OutputWriter,
    dry_run: bool,
) -> Result<()> {
    let datasets = datasets::load(config, output).await;
    if let Some(reason) = datasets::boundary_failure(&datasets) {
        return Err(errors::boundary_unavailable(&reason).into());
    }

    let settings = WorkflowSettings::from_config(config);
    let validator = ProjectValidator::new(settings.region.country_region.clone());
    let quiet = output.is_json();
    let map: Arc<dyn MapView> =
        Arc::new(LazyMapView::new(move || Box::new(TerminalMapView::new(quiet))));

    if dry_run {
        output.info("Dry run: submitting to an in-memory backend");
        let workflow = RegistrationWorkflow::new(
            settings,
            datasets,
            map,
            MemoryProjectSubmitter::new(),
            validator,
        );
        run(&workflow, args, output, true).await
    } else {
        let submitter = HttpProjectSubmitter::new(config.project_url());
        tracing::debug!(endpoint = submitter.endpoint(), "Submitting to backend");
        let workflow = RegistrationWorkflow::new(settings, datasets, map, submitter, validator);
        run(&workflow, args, output, false).await
    }
}

async fn run<S, V>(
    workflow: &RegistrationWorkflow<S, V>,
    args: RegisterArgs,
    output: &OutputWriter,
    dry_run: bool,
) -> Result<()>
where
    S: ProjectSubmitter,
    V: RecordValidator,
{
    if args.is_interactive() {
        return interactive::register(workflow, output, dry_run).await;
    }

    let mut missing = Vec::new();
    if args.name.is_none() {
        missing.push("--name");
    }
    if args.start_year.is_none() {
        missing.push("--start-year");
    }
    if args.end_year.is_none() {
        missing.push("--end-year");
    }
    if !missing.is_empty() {
        return Err(errors::missing_arguments(&missing).into());
    }

    // `is_interactive` is false only when a longitude was given, and clap pairs it with a latitude
    let coordinate = geographic_point(args.lon.unwrap_or_default(), args.lat.unwrap_or_default())?;
    let classification = workflow.handle_click(coordinate).map_err(errors::from_domain)?;

    let draft = ProjectDraft {
        name: args.name.unwrap_or_default(),
        start_year: args.start_year,
        end_year: args.end_year,
    };

    let body = submit_with_spinner(workflow, draft.clone(), output)
        .await
        .map_err(errors::from_domain)?;
    report_success(output, &classification, &draft, body, dry_run)
}

/// Submit `draft` behind a spinner; `Pending` is reported as a submission failure
pub(crate) async fn submit_with_spinner<S, V>(
    workflow: &RegistrationWorkflow<S, V>,
    draft: ProjectDraft,
    output: &OutputWriter,
) -> geoproj_core::Result<serde_json::Value>
where
    S: ProjectSubmitter,
    V: RecordValidator,
{
    let spinner = create_spinner(output, "Registering project...");
    match workflow.submit(draft).await {
        Ok(SubmissionOutcome::Succeeded(body)) => {
            finish_success(&spinner, "Project registered");
            Ok(body)
        }
        Ok(SubmissionOutcome::Pending) => {
            finish_error(&spinner, "Another submission is in progress");
            Err(geoproj_core::GeoprojError::Submission {
                message: "Another submission is in progress".to_string(),
            })
        }
        Ok(SubmissionOutcome::Failed(message)) => {
            finish_error(&spinner, &message);
            Err(geoproj_core::GeoprojError::Submission { message })
        }
        Err(e) => {
            spinner.finish_and_clear();
            Err(e)
        }
    }
}

pub(crate) fn report_success(
    output: &OutputWriter,
    classification: &ClassificationResult,
    draft: &ProjectDraft,
    response: serde_json::Value,
    dry_run: bool,
) -> Result<()> {
    let start_year = draft.start_year.unwrap_or_default();
    let end_year = draft.end_year.unwrap_or_default();

    if output.is_json() {
        return output.result(RegisterOutput {
            name: draft.name.clone(),
            location: classification.coordinate,
            climate_zone: classification.climate_zone.clone(),
            ecological_zone: classification.ecological_zone.clone(),
            start_year,
            end_year,
            period_years: draft.period_years(),
            dry_run,
            response,
        });
    }

    output.success(format!("Registered project '{}'", draft.name));
    output.kv("Location", classification.coordinate);
    output.kv("Climate zone", ClassificationResult::display_zone(&classification.climate_zone));
    output.kv(
        "Ecological zone",
        ClassificationResult::display_zone(&classification.ecological_zone),
    );
    output.kv("Period", format!("{}-{} ({} years)", start_year, end_year, draft.period_years()));
    if let Some(id) = response.get("id") {
        output.kv("Project id", id);
    }
    Ok(())
}
