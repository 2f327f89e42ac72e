//! Project-level comparison runs with report caching.

use std::path::Path;
use std::time::Instant;

use ac_results::{ReportManifest, SeriesStore, compute_report_id};
use serde::Serialize;

use crate::compare_service::run_comparison;
use crate::error::AppResult;
use crate::progress::{RunProgressEvent, RunStage};
use crate::project_service::{self, report_store, series_store};
use crate::report::ComparisonReport;
use crate::request::ComparisonRequest;
use crate::resolver::{MemoResolver, StoreResolver};

/// Version folded into report ids; a new engine never reuses old reports.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub use_cache: bool,
    pub engine_version: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            engine_version: ENGINE_VERSION.to_string(),
        }
    }
}

/// Request to run one comparison of a project.
pub struct RunRequest<'a> {
    pub project_path: &'a Path,
    pub comparison_id: &'a str,
    pub options: RunOptions,
}

#[derive(Debug, Clone)]
pub struct RunResponse {
    pub report_id: String,
    pub manifest: ReportManifest,
    pub report: ComparisonReport,
    pub loaded_from_cache: bool,
    pub elapsed_s: f64,
}

/// What a cached report depends on: the request and the stored content of
/// every participant series.
#[derive(Serialize)]
struct ReportKey<'a> {
    request: &'a ComparisonRequest,
    inputs: Vec<(&'a str, Option<String>)>,
}

fn report_key<'a>(
    comparison: &'a ComparisonRequest,
    store: &SeriesStore,
) -> AppResult<ReportKey<'a>> {
    let inputs = comparison
        .participants
        .iter()
        .map(|p| Ok((p.as_str(), store.series_digest(p.as_str(), &comparison.variable)?)))
        .collect::<AppResult<Vec<_>>>()?;
    Ok(ReportKey {
        request: comparison,
        inputs,
    })
}

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    stage: RunStage,
    started: Instant,
    message: &str,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent::stage(
            stage,
            started.elapsed().as_secs_f64(),
            Some(message.to_string()),
        ));
    }
}

/// Compute a comparison or load its cached report.
pub async fn ensure_report(request: &RunRequest<'_>) -> AppResult<RunResponse> {
    ensure_report_with_progress(request, None).await
}

pub async fn ensure_report_with_progress(
    request: &RunRequest<'_>,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let started = Instant::now();

    emit_progress(&mut progress_cb, RunStage::LoadingProject, started, "Loading project");
    let project = project_service::load_project(request.project_path)?;
    let def = project_service::get_comparison(&project, request.comparison_id)?;
    let comparison = ComparisonRequest::from(def);

    emit_progress(&mut progress_cb, RunStage::CheckingCache, started, "Checking report cache");
    let series = series_store(request.project_path, &project)?;
    let key = report_key(&comparison, &series)?;
    let report_id = compute_report_id(&key, &request.options.engine_version);
    let reports = report_store(request.project_path, &project)?;

    if request.options.use_cache && reports.has_report(&report_id) {
        emit_progress(
            &mut progress_cb,
            RunStage::LoadingCachedReport,
            started,
            "Loading cached report",
        );
        let manifest = reports.load_manifest(&report_id)?;
        let report: ComparisonReport = reports.load_report(&report_id)?;
        tracing::info!(comparison_id = %def.id, %report_id, "loaded cached report");

        emit_progress(&mut progress_cb, RunStage::Completed, started, "Loaded cached report");
        return Ok(RunResponse {
            report_id,
            manifest,
            report,
            loaded_from_cache: true,
            elapsed_s: started.elapsed().as_secs_f64(),
        });
    }

    emit_progress(&mut progress_cb, RunStage::ResolvingSeries, started, "Resolving series");
    let resolver = MemoResolver::new(StoreResolver::new(series));

    emit_progress(&mut progress_cb, RunStage::Computing, started, "Computing comparison");
    let report = run_comparison(&comparison, &resolver).await?;

    emit_progress(&mut progress_cb, RunStage::SavingReport, started, "Saving report");
    let manifest = ReportManifest::new(
        report_id.clone(),
        def.id.clone(),
        comparison.variable.clone(),
        comparison.reference.as_ref().map(|r| r.to_string()),
        comparison
            .participants
            .iter()
            .map(|p| p.to_string())
            .collect(),
        request.options.engine_version.clone(),
    );
    reports.save_report(&manifest, &report)?;

    emit_progress(&mut progress_cb, RunStage::Completed, started, "Comparison completed");
    Ok(RunResponse {
        report_id,
        manifest,
        report,
        loaded_from_cache: false,
        elapsed_s: started.elapsed().as_secs_f64(),
    })
}

/// Stored reports of a project, oldest first.
pub fn list_reports(
    project_path: &Path,
    comparison_id: Option<&str>,
) -> AppResult<Vec<ReportManifest>> {
    let project = project_service::load_project(project_path)?;
    let store = report_store(project_path, &project)?;
    Ok(store.list_reports(comparison_id)?)
}

pub fn load_report(
    project_path: &Path,
    report_id: &str,
) -> AppResult<(ReportManifest, ComparisonReport)> {
    let project = project_service::load_project(project_path)?;
    let store = report_store(project_path, &project)?;
    let manifest = store.load_manifest(report_id)?;
    let report = store.load_report(report_id)?;
    Ok((manifest, report))
}
