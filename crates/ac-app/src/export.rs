//! Delimited-text export of comparison reports.

use std::fmt;
use std::str::FromStr;

use ac_core::is_missing;

use crate::report::ComparisonReport;

/// Placeholder for values that could not be computed.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTable {
    Summaries,
    Histograms,
    Trends,
    Pairwise,
    Differences,
    Taylor,
    Agreement,
}

impl ExportTable {
    pub const ALL: [ExportTable; 7] = [
        ExportTable::Summaries,
        ExportTable::Histograms,
        ExportTable::Trends,
        ExportTable::Pairwise,
        ExportTable::Differences,
        ExportTable::Taylor,
        ExportTable::Agreement,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ExportTable::Summaries => "summaries",
            ExportTable::Histograms => "histograms",
            ExportTable::Trends => "trends",
            ExportTable::Pairwise => "pairwise",
            ExportTable::Differences => "differences",
            ExportTable::Taylor => "taylor",
            ExportTable::Agreement => "agreement",
        }
    }
}

impl fmt::Display for ExportTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportTable {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExportTable::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let names: Vec<&str> = ExportTable::ALL.iter().map(|t| t.name()).collect();
                format!("unknown table '{s}', expected one of: {}", names.join(", "))
            })
    }
}

fn num(v: f64) -> String {
    if is_missing(v) {
        NOT_AVAILABLE.to_string()
    } else {
        v.to_string()
    }
}

fn opt(v: Option<f64>) -> String {
    v.map_or_else(|| NOT_AVAILABLE.to_string(), num)
}

/// Quote a field when it holds the delimiter, a quote or a line break.
fn field(text: &str, delimiter: char) -> String {
    if text.contains(delimiter) || text.contains(['"', '\n', '\r']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

struct Table {
    delimiter: char,
    out: String,
}

impl Table {
    fn new(delimiter: char, header: &[&str]) -> Self {
        let mut table = Self {
            delimiter,
            out: String::new(),
        };
        table.row(header.iter().map(|h| h.to_string()).collect());
        table
    }

    fn row(&mut self, cells: Vec<String>) {
        let line: Vec<String> = cells.iter().map(|c| field(c, self.delimiter)).collect();
        self.out.push_str(&line.join(&self.delimiter.to_string()));
        self.out.push('\n');
    }
}

/// Render one table of `report`.
///
/// Undefined numbers, degenerate correlations and missing points are written
/// as `N/A`.
pub fn export_table(report: &ComparisonReport, table: ExportTable, delimiter: char) -> String {
    match table {
        ExportTable::Summaries => summaries(report, delimiter),
        ExportTable::Histograms => histograms(report, delimiter),
        ExportTable::Trends => trends(report, delimiter),
        ExportTable::Pairwise => pairwise(report, delimiter),
        ExportTable::Differences => differences(report, delimiter),
        ExportTable::Taylor => taylor(report, delimiter),
        ExportTable::Agreement => agreement(report, delimiter),
    }
}

fn summaries(report: &ComparisonReport, delimiter: char) -> String {
    let mut t = Table::new(
        delimiter,
        &[
            "simulation_id",
            "unit",
            "count",
            "mean",
            "median",
            "std_dev",
            "min",
            "max",
            "p25",
            "p75",
            "p95",
        ],
    );
    for sim in &report.simulations {
        let s = &sim.summary;
        t.row(vec![
            sim.simulation_id.to_string(),
            sim.unit.clone(),
            s.count.to_string(),
            num(s.mean),
            num(s.median),
            num(s.std_dev),
            num(s.min),
            num(s.max),
            num(s.p25),
            num(s.p75),
            num(s.p95),
        ]);
    }
    t.out
}

fn histograms(report: &ComparisonReport, delimiter: char) -> String {
    let mut t = Table::new(
        delimiter,
        &["simulation_id", "bin", "start", "end", "count", "frequency"],
    );
    for sim in &report.simulations {
        for (i, bin) in sim.histogram.bins.iter().enumerate() {
            t.row(vec![
                sim.simulation_id.to_string(),
                i.to_string(),
                num(bin.start),
                num(bin.end),
                bin.count.to_string(),
                num(bin.frequency),
            ]);
        }
    }
    t.out
}

fn trends(report: &ComparisonReport, delimiter: char) -> String {
    let mut t = Table::new(
        delimiter,
        &["simulation_id", "index", "smoothed", "trend_line", "direction"],
    );
    for sim in &report.simulations {
        let Some(tr) = &sim.trend else { continue };
        for (i, smoothed) in tr.smoothed.iter().enumerate() {
            t.row(vec![
                sim.simulation_id.to_string(),
                i.to_string(),
                opt(*smoothed),
                num(tr.fit.predict(i as f64)),
                tr.direction.label().to_string(),
            ]);
        }
    }
    t.out
}

fn pairwise(report: &ComparisonReport, delimiter: char) -> String {
    let mut t = Table::new(
        delimiter,
        &[
            "simulation_id",
            "valid_pairs",
            "correlation",
            "rmse",
            "mbe",
            "mae",
            "max_abs_error",
            "slope",
            "intercept",
            "r_squared",
        ],
    );
    for m in &report.pairwise {
        let correlation = if m.correlation_defined {
            num(m.correlation)
        } else {
            NOT_AVAILABLE.to_string()
        };
        t.row(vec![
            m.simulation_id.to_string(),
            m.valid_pairs.to_string(),
            correlation,
            num(m.rmse),
            num(m.mbe),
            num(m.mae),
            num(m.max_abs_error),
            num(m.slope),
            num(m.intercept),
            num(m.r_squared),
        ]);
    }
    t.out
}

fn differences(report: &ComparisonReport, delimiter: char) -> String {
    let mut t = Table::new(
        delimiter,
        &["simulation_id", "coord", "difference", "mode"],
    );
    for d in &report.differences {
        let mode = match d.result.mode {
            ac_stats::DifferenceMode::Absolute => "absolute",
            ac_stats::DifferenceMode::Percent => "percent",
            ac_stats::DifferenceMode::Standardized => "standardized",
        };
        for p in &d.result.points {
            t.row(vec![
                d.simulation_id.to_string(),
                p.coord.to_string(),
                opt(p.value),
                mode.to_string(),
            ]);
        }
    }
    t.out
}

fn taylor(report: &ComparisonReport, delimiter: char) -> String {
    let mut t = Table::new(
        delimiter,
        &[
            "simulation_id",
            "n",
            "normalized_std",
            "correlation",
            "centered_rmse",
            "normalized_centered_rmse",
            "std_dev",
            "reference_std_dev",
        ],
    );
    for entry in &report.taylor {
        let p = &entry.point;
        t.row(vec![
            entry.simulation_id.to_string(),
            p.n.to_string(),
            num(p.normalized_std),
            num(p.correlation),
            num(p.centered_rmse),
            num(p.normalized_centered_rmse),
            num(p.std_dev),
            num(p.reference_std_dev),
        ]);
    }
    t.out
}

fn agreement(report: &ComparisonReport, delimiter: char) -> String {
    let mut t = Table::new(
        delimiter,
        &[
            "simulation_id",
            "n",
            "mean_ref",
            "mean_test",
            "mean_abs_diff",
            "max_abs_diff",
            "rmse",
            "mean_rel_diff",
            "max_rel_diff",
            "correlation",
            "passes",
        ],
    );
    for entry in &report.agreement {
        let id = entry.simulation_id.to_string();
        match &entry.report {
            Some(a) => t.row(vec![
                id,
                a.n.to_string(),
                num(a.mean_ref),
                num(a.mean_test),
                num(a.mean_abs_diff),
                num(a.max_abs_diff),
                num(a.rmse),
                num(a.mean_rel_diff),
                num(a.max_rel_diff),
                num(a.correlation),
                a.passes.to_string(),
            ]),
            None => {
                let mut cells = vec![id, "0".to_string()];
                cells.extend(std::iter::repeat_n(NOT_AVAILABLE.to_string(), 9));
                t.row(cells);
            }
        }
    }
    t.out
}
