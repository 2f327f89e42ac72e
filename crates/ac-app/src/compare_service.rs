//! Comparison orchestration: resolve, harmonize, compute.

use ac_core::{Tolerances, conversion_factor, nearly_equal};
use ac_core::timing::Timer;
use ac_stats::{
    NamedSeries, align, check_agreement, difference, histogram, reference_difference,
    reference_point, summarize, taylor_point, trend,
};
use rayon::prelude::*;

use crate::error::{AppError, AppResult};
use crate::report::{
    ComparisonReport, PairwiseMetrics, SimulationAgreement, SimulationDifference,
    SimulationReport, SimulationTaylor,
};
use crate::request::{ComparisonOptions, ComparisonRequest};
use crate::resolver::SeriesResolver;

/// Resolve every participant through `resolver`, then compute the report on a
/// blocking worker.
///
/// The request is validated before anything is resolved. Participants are
/// resolved in order and the first resolution failure is returned.
pub async fn run_comparison<R>(
    request: &ComparisonRequest,
    resolver: &R,
) -> AppResult<ComparisonReport>
where
    R: SeriesResolver + ?Sized,
{
    if let Err(e) = request.validate() {
        tracing::warn!(variable = %request.variable, error = %e, "rejected comparison request");
        return Err(e);
    }

    let mut series = Vec::with_capacity(request.participants.len());
    for simulation_id in &request.participants {
        tracing::debug!(%simulation_id, variable = %request.variable, "resolving series");
        let resolved = resolver
            .resolve(simulation_id, &request.variable, &request.selectors)
            .await
            .map_err(|e| AppError::Resolution {
                simulation_id: simulation_id.to_string(),
                variable: request.variable.clone(),
                message: e.to_string(),
            })?;
        series.push(resolved);
    }

    let owned = request.clone();
    let report =
        tokio::task::spawn_blocking(move || compute_comparison(&owned, series)).await??;

    tracing::info!(
        variable = %report.variable,
        participants = report.participants.len(),
        reference = ?report.reference.as_ref().map(|r| r.as_str()),
        "comparison computed"
    );
    Ok(report)
}

/// Compute a comparison from already resolved series, one per participant in
/// participant order.
pub fn compute_comparison(
    request: &ComparisonRequest,
    series: Vec<NamedSeries>,
) -> AppResult<ComparisonReport> {
    request.validate()?;

    if series.len() != request.participants.len() {
        return Err(AppError::InvalidRequest(format!(
            "expected {} series, got {}",
            request.participants.len(),
            series.len()
        )));
    }
    for (s, expected) in series.iter().zip(&request.participants) {
        if &s.simulation_id != expected {
            return Err(AppError::InvalidRequest(format!(
                "series for '{}' supplied where '{}' was expected",
                s.simulation_id, expected
            )));
        }
    }

    let timer = Timer::start("compute_comparison");
    let reference_index = request.reference_index();
    let (unit, series) = harmonize_units(series, reference_index)?;
    let options = &request.options;

    let simulations = series
        .par_iter()
        .map(|s| simulation_report(s, &unit, options))
        .collect::<AppResult<Vec<_>>>()?;

    let mut report = ComparisonReport {
        variable: request.variable.clone(),
        unit,
        reference: request.reference.clone(),
        participants: request.participants.clone(),
        simulations,
        pairwise: Vec::new(),
        differences: Vec::new(),
        taylor: Vec::new(),
        agreement: Vec::new(),
    };

    if let Some(ri) = reference_index
        && series.len() > 1
    {
        let reference = &series[ri];
        let compared: Vec<ReferenceComparison> = series
            .par_iter()
            .enumerate()
            .map(|(i, s)| compare_to_reference(s, reference, i == ri, options))
            .collect();

        for c in compared {
            report.pairwise.push(c.pairwise);
            report.differences.extend(c.difference);
            report.taylor.extend(c.taylor);
            report.agreement.extend(c.agreement);
        }
    }

    timer.stop_and_log();
    Ok(report)
}

/// Bring every series to the unit of the reference (or the first participant).
///
/// Mixing-ratio units are converted (spellings of the same unit are only
/// relabelled); any other mismatch is an invalid request.
pub fn harmonize_units(
    series: Vec<NamedSeries>,
    reference_index: Option<usize>,
) -> AppResult<(String, Vec<NamedSeries>)> {
    let target = series
        .get(reference_index.unwrap_or(0))
        .map(|s| s.unit.clone())
        .ok_or_else(|| AppError::InvalidRequest("no series to compare".to_string()))?;

    let harmonized = series
        .into_iter()
        .map(|mut s| {
            if s.unit != target {
                let factor = conversion_factor(&s.unit, &target).map_err(|e| {
                    AppError::InvalidRequest(format!(
                        "cannot compare '{}' in '{}' with '{}': {e}",
                        s.simulation_id, s.unit, target
                    ))
                })?;
                if nearly_equal(factor, 1.0, Tolerances::default()) {
                    s.unit = target.clone();
                    return Ok(s);
                }
                tracing::debug!(
                    simulation_id = %s.simulation_id,
                    from = %s.unit,
                    to = %target,
                    factor,
                    "converting units"
                );
                s.series = s.series.map_values(|v| v * factor);
                s.unit = target.clone();
            }
            Ok(s)
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok((target, harmonized))
}

fn simulation_report(
    s: &NamedSeries,
    unit: &str,
    options: &ComparisonOptions,
) -> AppResult<SimulationReport> {
    let values = s.series.values();
    Ok(SimulationReport {
        simulation_id: s.simulation_id.clone(),
        unit: unit.to_string(),
        sample_count: values.len(),
        summary: summarize(values),
        histogram: histogram(values, options.histogram_bins)?,
        trend: options.trend.map(|cfg| trend(values, cfg)).transpose()?,
    })
}

struct ReferenceComparison {
    pairwise: PairwiseMetrics,
    difference: Option<SimulationDifference>,
    taylor: Option<SimulationTaylor>,
    agreement: Option<SimulationAgreement>,
}

fn compare_to_reference(
    s: &NamedSeries,
    reference: &NamedSeries,
    is_reference: bool,
    options: &ComparisonOptions,
) -> ReferenceComparison {
    let simulation_id = s.simulation_id.clone();

    let (candidate, baseline): (Vec<f64>, Vec<f64>) = if is_reference {
        (s.series.values().to_vec(), s.series.values().to_vec())
    } else {
        align(&s.series, &reference.series)
            .into_iter()
            .map(|p| (p.a, p.b))
            .unzip()
    };

    let diff = options.show_difference.then(|| SimulationDifference {
        simulation_id: simulation_id.clone(),
        result: if is_reference {
            reference_difference(&s.series, options.difference_mode())
        } else {
            difference(&s.series, &reference.series, options.difference_mode())
        },
    });

    let taylor_entry = options.taylor.then(|| SimulationTaylor {
        simulation_id: simulation_id.clone(),
        point: if is_reference {
            reference_point(&baseline)
        } else {
            taylor_point(&candidate, &baseline)
        },
    });

    let agreement = options.agreement.map(|thresholds| SimulationAgreement {
        simulation_id: simulation_id.clone(),
        report: check_agreement(&candidate, &baseline, &thresholds),
    });

    let pairwise = if is_reference {
        PairwiseMetrics::reference(simulation_id, &baseline)
    } else {
        PairwiseMetrics::compute(simulation_id, &candidate, &baseline)
    };

    ReferenceComparison {
        pairwise,
        difference: diff,
        taylor: taylor_entry,
        agreement,
    }
}
