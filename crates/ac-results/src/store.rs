//! Series and report storage API.

use std::fs;
use std::path::{Path, PathBuf};

use ac_stats::{Coordinate, NamedSeries, Series};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::hash::content_digest;
use crate::types::{ReportManifest, SampleRecord, Selectors, SeriesMeta};
use crate::{ResultsError, ResultsResult};

/// Reject names that would escape the store directory.
fn check_component(name: &str, what: &str) -> ResultsResult<()> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.contains('\0')
    {
        return Err(ResultsError::InvalidPath {
            message: format!("{what} '{name}' is not usable as a file name"),
        });
    }
    Ok(())
}

fn store_root(project_path: &Path, store_dir: &Path) -> ResultsResult<PathBuf> {
    let project_dir = project_path
        .parent()
        .ok_or_else(|| ResultsError::InvalidPath {
            message: "project path has no parent directory".to_string(),
        })?;
    Ok(project_dir.join(store_dir))
}

/// Per-simulation output series, one JSON-lines file per variable.
///
/// Layout: `<root>/series/<simulation>/<variable>.jsonl` plus
/// `<variable>.meta.json` holding the unit.
#[derive(Clone)]
pub struct SeriesStore {
    root_dir: PathBuf,
}

impl SeriesStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        let series_dir = root_dir.join("series");
        if !series_dir.exists() {
            fs::create_dir_all(&series_dir)?;
        }
        Ok(Self { root_dir })
    }

    pub fn for_project(project_path: &Path, store_dir: &Path) -> ResultsResult<Self> {
        Self::new(store_root(project_path, store_dir)?)
    }

    fn simulation_dir(&self, simulation_id: &str) -> PathBuf {
        self.root_dir.join("series").join(simulation_id)
    }

    fn data_path(&self, simulation_id: &str, variable: &str) -> PathBuf {
        self.simulation_dir(simulation_id)
            .join(format!("{variable}.jsonl"))
    }

    fn meta_path(&self, simulation_id: &str, variable: &str) -> PathBuf {
        self.simulation_dir(simulation_id)
            .join(format!("{variable}.meta.json"))
    }

    pub fn has_series(&self, simulation_id: &str, variable: &str) -> bool {
        self.meta_path(simulation_id, variable).exists()
    }

    pub fn save_series(
        &self,
        simulation_id: &str,
        variable: &str,
        unit: &str,
        records: &[SampleRecord],
    ) -> ResultsResult<()> {
        check_component(simulation_id, "simulation id")?;
        check_component(variable, "variable")?;
        fs::create_dir_all(self.simulation_dir(simulation_id))?;

        let mut content = String::new();
        for record in records {
            content.push_str(&serde_json::to_string(record)?);
            content.push('\n');
        }
        fs::write(self.data_path(simulation_id, variable), content)?;

        let meta = SeriesMeta {
            simulation_id: simulation_id.to_string(),
            variable: variable.to_string(),
            unit: unit.to_string(),
            sample_count: records.len(),
        };
        fs::write(
            self.meta_path(simulation_id, variable),
            serde_json::to_string_pretty(&meta)?,
        )?;

        tracing::debug!(simulation_id, variable, samples = records.len(), "saved series");
        Ok(())
    }

    /// Digest of the stored files of one series, `None` if it was never saved.
    ///
    /// Changes whenever the series is re-imported with different content.
    pub fn series_digest(
        &self,
        simulation_id: &str,
        variable: &str,
    ) -> ResultsResult<Option<String>> {
        check_component(simulation_id, "simulation id")?;
        check_component(variable, "variable")?;
        if !self.has_series(simulation_id, variable) {
            return Ok(None);
        }
        let meta = fs::read(self.meta_path(simulation_id, variable))?;
        let data = fs::read(self.data_path(simulation_id, variable))?;
        Ok(Some(content_digest(&[&meta, &data])))
    }

    pub fn load_meta(&self, simulation_id: &str, variable: &str) -> ResultsResult<SeriesMeta> {
        check_component(simulation_id, "simulation id")?;
        check_component(variable, "variable")?;
        let path = self.meta_path(simulation_id, variable);
        if !path.exists() {
            return Err(ResultsError::SeriesNotFound {
                simulation_id: simulation_id.to_string(),
                variable: variable.to_string(),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn load_records(
        &self,
        simulation_id: &str,
        variable: &str,
    ) -> ResultsResult<Vec<SampleRecord>> {
        check_component(simulation_id, "simulation id")?;
        check_component(variable, "variable")?;
        let path = self.data_path(simulation_id, variable);
        if !path.exists() {
            return Err(ResultsError::SeriesNotFound {
                simulation_id: simulation_id.to_string(),
                variable: variable.to_string(),
            });
        }

        let content = fs::read_to_string(path)?;
        let mut records = Vec::new();
        for line in content.lines() {
            if !line.trim().is_empty() {
                records.push(serde_json::from_str(line)?);
            }
        }
        Ok(records)
    }

    /// Load a variable as a named series, keeping only records matching `selectors`.
    pub fn load_series(
        &self,
        simulation_id: &str,
        variable: &str,
        selectors: &Selectors,
    ) -> ResultsResult<NamedSeries> {
        let meta = self.load_meta(simulation_id, variable)?;
        let records = self.load_records(simulation_id, variable)?;

        let series = Series::from_pairs(
            records
                .into_iter()
                .filter(|r| selectors.matches(r))
                .map(|r| (r.coord, r.value.unwrap_or(f64::NAN))),
        );

        Ok(NamedSeries::new(
            simulation_id,
            meta.variable,
            meta.unit,
            series,
        ))
    }

    pub fn list_simulations(&self) -> ResultsResult<Vec<String>> {
        let mut sims = Vec::new();
        let series_dir = self.root_dir.join("series");
        if !series_dir.exists() {
            return Ok(sims);
        }
        for entry in fs::read_dir(series_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                sims.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        sims.sort();
        Ok(sims)
    }

    pub fn list_variables(&self, simulation_id: &str) -> ResultsResult<Vec<String>> {
        check_component(simulation_id, "simulation id")?;
        let mut vars = Vec::new();
        let dir = self.simulation_dir(simulation_id);
        if !dir.exists() {
            return Ok(vars);
        }
        for entry in fs::read_dir(dir)? {
            let name = entry?.file_name().to_string_lossy().to_string();
            if let Some(var) = name.strip_suffix(".meta.json") {
                vars.push(var.to_string());
            }
        }
        vars.sort();
        Ok(vars)
    }

    /// Import `coord,value` CSV text as a series. Returns the number of samples stored.
    pub fn import_csv(
        &self,
        simulation_id: &str,
        variable: &str,
        unit: &str,
        csv: &str,
    ) -> ResultsResult<usize> {
        let records = parse_csv(csv)?;
        self.save_series(simulation_id, variable, unit, &records)?;
        Ok(records.len())
    }
}

/// Parse `coord,value` lines. A header line and blank lines are skipped;
/// an empty, `NaN` or `NA` value is a missing sample.
pub fn parse_csv(csv: &str) -> ResultsResult<Vec<SampleRecord>> {
    let mut records = Vec::new();
    for (i, line) in csv.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((coord, value)) = line.split_once(',') else {
            return Err(ResultsError::Csv {
                line: i + 1,
                message: "expected 'coord,value'".to_string(),
            });
        };
        let value = value.trim();
        let parsed = match value {
            "" | "NaN" | "nan" | "NA" => None,
            v => match v.parse::<f64>() {
                Ok(x) => Some(x),
                Err(_) if i == 0 => continue,
                Err(_) => {
                    return Err(ResultsError::Csv {
                        line: i + 1,
                        message: format!("invalid value '{v}'"),
                    });
                }
            },
        };
        records.push(SampleRecord::new(Coordinate::parse(coord), parsed));
    }
    Ok(records)
}

/// Cached comparison reports.
///
/// Layout: `<root>/reports/<report_id>/{manifest.json, report.json}`.
#[derive(Clone)]
pub struct ReportStore {
    root_dir: PathBuf,
}

impl ReportStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        let reports_dir = root_dir.join("reports");
        if !reports_dir.exists() {
            fs::create_dir_all(&reports_dir)?;
        }
        Ok(Self { root_dir })
    }

    pub fn for_project(project_path: &Path, store_dir: &Path) -> ResultsResult<Self> {
        Self::new(store_root(project_path, store_dir)?)
    }

    fn report_dir(&self, report_id: &str) -> PathBuf {
        self.root_dir.join("reports").join(report_id)
    }

    pub fn has_report(&self, report_id: &str) -> bool {
        self.report_dir(report_id).join("manifest.json").exists()
    }

    pub fn save_report<T: Serialize>(
        &self,
        manifest: &ReportManifest,
        report: &T,
    ) -> ResultsResult<()> {
        check_component(&manifest.report_id, "report id")?;
        let dir = self.report_dir(&manifest.report_id);
        fs::create_dir_all(&dir)?;

        fs::write(
            dir.join("manifest.json"),
            serde_json::to_string_pretty(manifest)?,
        )?;
        fs::write(dir.join("report.json"), serde_json::to_string_pretty(report)?)?;

        tracing::debug!(report_id = %manifest.report_id, "saved report");
        Ok(())
    }

    pub fn load_manifest(&self, report_id: &str) -> ResultsResult<ReportManifest> {
        check_component(report_id, "report id")?;
        let path = self.report_dir(report_id).join("manifest.json");
        if !path.exists() {
            return Err(ResultsError::ReportNotFound {
                report_id: report_id.to_string(),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn load_report<T: DeserializeOwned>(&self, report_id: &str) -> ResultsResult<T> {
        check_component(report_id, "report id")?;
        let path = self.report_dir(report_id).join("report.json");
        if !path.exists() {
            return Err(ResultsError::ReportNotFound {
                report_id: report_id.to_string(),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Manifests of all stored reports, optionally for one comparison only.
    pub fn list_reports(&self, comparison_id: Option<&str>) -> ResultsResult<Vec<ReportManifest>> {
        let mut reports = Vec::new();
        let reports_dir = self.root_dir.join("reports");
        if !reports_dir.exists() {
            return Ok(reports);
        }

        for entry in fs::read_dir(reports_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                let report_id = entry.file_name().to_string_lossy().to_string();
                if let Ok(manifest) = self.load_manifest(&report_id)
                    && comparison_id.is_none_or(|c| manifest.comparison_id == c)
                {
                    reports.push(manifest);
                }
            }
        }
        reports.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(reports)
    }

    pub fn delete_report(&self, report_id: &str) -> ResultsResult<()> {
        check_component(report_id, "report id")?;
        let dir = self.report_dir(report_id);
        if dir.exists() {
            fs::remove_dir_all(dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_with_header_and_missing() {
        let records = parse_csv("coord,value\n0,1.5\n1,\n2,NaN\n3,4\n").unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].value, Some(1.5));
        assert_eq!(records[1].value, None);
        assert_eq!(records[2].value, None);
        assert_eq!(records[3].coord, Coordinate::Index(3));
    }

    #[test]
    fn csv_rejects_garbage_after_header() {
        let err = parse_csv("t,v\n0,1\n1,abc\n").unwrap_err();
        assert!(matches!(err, ResultsError::Csv { line: 3, .. }));
    }

    #[test]
    fn csv_requires_two_columns() {
        assert!(parse_csv("0 1\n").is_err());
    }

    #[test]
    fn path_components_are_checked() {
        assert!(check_component("../etc", "simulation id").is_err());
        assert!(check_component("..", "simulation id").is_err());
        assert!(check_component("", "variable").is_err());
        assert!(check_component("SpeciesConc_O3", "variable").is_ok());
    }
}
