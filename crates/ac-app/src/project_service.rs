//! Project loading, saving, validation, and series import.

use std::path::Path;

use ac_project::{ComparisonDef, ComparisonProject};
use ac_results::{ReportStore, SeriesStore};

use crate::error::{AppError, AppResult};

/// Summary of a comparison for listing.
#[derive(Debug, Clone)]
pub struct ComparisonSummary {
    pub id: String,
    pub variable: String,
    pub reference: Option<String>,
    pub participant_count: usize,
}

/// Load a project file (JSON by extension, YAML otherwise).
pub fn load_project(path: &Path) -> AppResult<ComparisonProject> {
    Ok(ac_project::load_project(path)?)
}

pub fn save_project(path: &Path, project: &ComparisonProject) -> AppResult<()> {
    Ok(ac_project::save_project(path, project)?)
}

pub fn validate_project(project: &ComparisonProject) -> AppResult<()> {
    ac_project::validate_project(project).map_err(|e| AppError::Validation(e.to_string()))
}

pub fn list_comparisons(project: &ComparisonProject) -> Vec<ComparisonSummary> {
    project
        .comparisons
        .iter()
        .map(|c| ComparisonSummary {
            id: c.id.clone(),
            variable: c.variable.clone(),
            reference: c.reference.as_ref().map(|r| r.to_string()),
            participant_count: c.participants.len(),
        })
        .collect()
}

pub fn get_comparison<'a>(
    project: &'a ComparisonProject,
    comparison_id: &str,
) -> AppResult<&'a ComparisonDef> {
    project
        .comparison(comparison_id)
        .ok_or_else(|| AppError::ComparisonNotFound(comparison_id.to_string()))
}

pub(crate) fn series_store(
    project_path: &Path,
    project: &ComparisonProject,
) -> AppResult<SeriesStore> {
    Ok(SeriesStore::for_project(
        project_path,
        Path::new(&project.store_dir),
    )?)
}

pub(crate) fn report_store(
    project_path: &Path,
    project: &ComparisonProject,
) -> AppResult<ReportStore> {
    Ok(ReportStore::for_project(
        project_path,
        Path::new(&project.store_dir),
    )?)
}

/// Import `coord,value` CSV text into the project's series store.
pub fn import_series_csv(
    project_path: &Path,
    simulation_id: &str,
    variable: &str,
    unit: &str,
    csv: &str,
) -> AppResult<usize> {
    let project = load_project(project_path)?;
    let store = series_store(project_path, &project)?;
    let count = store.import_csv(simulation_id, variable, unit, csv)?;
    tracing::info!(simulation_id, variable, unit, samples = count, "imported series");
    Ok(count)
}

/// Stored `(simulation, variable)` pairs.
pub fn list_series(project_path: &Path) -> AppResult<Vec<(String, String)>> {
    let project = load_project(project_path)?;
    let store = series_store(project_path, &project)?;
    let mut out = Vec::new();
    for sim in store.list_simulations()? {
        for var in store.list_variables(&sim)? {
            out.push((sim.clone(), var));
        }
    }
    Ok(out)
}
