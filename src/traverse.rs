//! Three-level walk over the Sienge progress-log hierarchy.
//!
//! Projects come from the top-level listing, building units from each
//! project's progress log, and item records from each unit. Order is the API
//! order at every level. A failed branch below the project listing is logged
//! and skipped; the project listing itself is fatal because an empty export
//! must not mask an upstream outage.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::client::{ApiError, ProgressLogApi};

/// Continuation marker the API mixes into item results; never exported.
pub const SENTINEL_TASK_ID: &str = "next";

/// A building project paired with the progress log (measurement) to read.
#[derive(Debug, Clone)]
pub struct BuildingProject {
    pub building_id: String,
    pub measurement_number: String,
}

/// Branch counters for one traversal.
#[derive(Debug, Default)]
pub struct TraversalStats {
    pub projects: u64,
    pub units: u64,
    pub skipped_projects: u64,
    pub skipped_units: u64,
}

pub struct Traversal {
    pub records: Vec<Value>,
    pub stats: TraversalStats,
}

/// Walks projects → building units → item records and returns the flat,
/// ordered record sequence with sentinel entries already removed.
pub async fn fetch_all_records<A: ProgressLogApi>(api: &A) -> Result<Traversal, ApiError> {
    let mut records = Vec::new();
    let mut stats = TraversalStats::default();

    for project in list_projects(api).await? {
        stats.projects += 1;
        let units = match list_units(api, &project).await {
            Ok(units) => units,
            Err(e) if e.is_not_found() => {
                debug!(
                    building_id = %project.building_id,
                    measurement_number = %project.measurement_number,
                    "No building units for this measurement"
                );
                continue;
            }
            Err(e) => {
                warn!(
                    building_id = %project.building_id,
                    measurement_number = %project.measurement_number,
                    error = %e,
                    "Failed to list building units, skipping project"
                );
                stats.skipped_projects += 1;
                continue;
            }
        };

        for unit_id in &units {
            stats.units += 1;
            match list_items(api, &project, unit_id).await {
                Ok(items) => records.extend(items),
                Err(e) if e.is_not_found() => {
                    debug!(
                        building_id = %project.building_id,
                        building_unit_id = %unit_id,
                        "No item records for this building unit"
                    );
                }
                Err(e) => {
                    warn!(
                        building_id = %project.building_id,
                        measurement_number = %project.measurement_number,
                        building_unit_id = %unit_id,
                        error = %e,
                        "Failed to list item records, skipping unit"
                    );
                    stats.skipped_units += 1;
                }
            }
        }
    }

    info!(
        projects = stats.projects,
        units = stats.units,
        records = records.len(),
        "Traversal finished"
    );
    Ok(Traversal { records, stats })
}

async fn list_projects<A: ProgressLogApi>(api: &A) -> Result<Vec<BuildingProject>, ApiError> {
    let body = api.get("building-projects/progress-logs", &[]).await?;
    let results = array_field(&body, "results");
    let mut projects = Vec::with_capacity(results.len());
    for entry in results {
        match (
            id_field(entry, "buildingId"),
            id_field(entry, "measurementNumber"),
        ) {
            (Some(building_id), Some(measurement_number)) => projects.push(BuildingProject {
                building_id,
                measurement_number,
            }),
            _ => warn!(
                entry = %entry,
                "Project entry missing buildingId or measurementNumber, skipping"
            ),
        }
    }
    info!(projects = projects.len(), "Listed building projects");
    Ok(projects)
}

async fn list_units<A: ProgressLogApi>(
    api: &A,
    project: &BuildingProject,
) -> Result<Vec<String>, ApiError> {
    let path = format!(
        "building-projects/{}/progress-logs/{}",
        project.building_id, project.measurement_number
    );
    let body = api.get(&path, &[]).await?;
    let units: Vec<String> = array_field(&body, "buildingUnits")
        .iter()
        .filter_map(|unit| id_field(unit, "id"))
        .collect();
    debug!(
        building_id = %project.building_id,
        units = units.len(),
        "Listed building units"
    );
    Ok(units)
}

async fn list_items<A: ProgressLogApi>(
    api: &A,
    project: &BuildingProject,
    unit_id: &str,
) -> Result<Vec<Value>, ApiError> {
    let path = format!(
        "building-projects/{}/progress-logs/{}/items/{}",
        project.building_id, project.measurement_number, unit_id
    );
    let body = api.get(&path, &[]).await?;
    Ok(array_field(&body, "results")
        .iter()
        .filter(|record| !is_sentinel(record))
        .cloned()
        .collect())
}

/// True for the pagination continuation entry (`taskId == "next"`).
pub fn is_sentinel(record: &Value) -> bool {
    record.get("taskId").and_then(Value::as_str) == Some(SENTINEL_TASK_ID)
}

fn array_field<'a>(body: &'a Value, key: &str) -> &'a [Value] {
    body.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Ids arrive as JSON strings or numbers depending on the tenant; both are
/// normalised to their string rendering for URL paths.
fn id_field(entry: &Value, key: &str) -> Option<String> {
    match entry.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
