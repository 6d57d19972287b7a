//! End-to-end export pipeline: traverse the API, then flatten to CSV.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::client::{ApiClient, ApiError, ProgressLogApi};
use crate::config::Config;
use crate::export::{export_csv, ExportError};
use crate::traverse::fetch_all_records;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Summary of one export run.
#[derive(Debug, Serialize)]
pub struct ExportReport {
    pub projects: u64,
    pub units: u64,
    pub rows_written: u64,
    pub skipped_projects: u64,
    pub skipped_units: u64,
    pub output_path: PathBuf,
}

/// Builds the authenticated client from config and runs the full export.
pub async fn run_export(config: &Config, output: &Path) -> Result<ExportReport, PipelineError> {
    let api = ApiClient::new(config)?;
    export_measurements(&api, output).await
}

/// Runs traversal and export against any [`ProgressLogApi`] implementation.
/// A project-listing failure aborts the run; an empty CSV must not be
/// mistaken for a healthy upstream.
pub async fn export_measurements<A: ProgressLogApi>(
    api: &A,
    output: &Path,
) -> Result<ExportReport, PipelineError> {
    info!("Starting measurement export pipeline");

    let traversal = match fetch_all_records(api).await {
        Ok(traversal) => traversal,
        Err(e) => {
            error!(error = %e, "Failed to traverse building projects, aborting export");
            return Err(e.into());
        }
    };

    let rows_written = match export_csv(&traversal.records, output) {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "Failed to write CSV export");
            return Err(e.into());
        }
    };

    let report = ExportReport {
        projects: traversal.stats.projects,
        units: traversal.stats.units,
        rows_written,
        skipped_projects: traversal.stats.skipped_projects,
        skipped_units: traversal.stats.skipped_units,
        output_path: output.to_path_buf(),
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => debug!(json = %json, "Export report"),
        Err(e) => error!(error = ?e, "Failed to serialize export report"),
    }
    info!(
        path = %output.display(),
        rows = report.rows_written,
        "Export pipeline finished"
    );
    Ok(report)
}
