//! Comparison project schema definitions.

use ac_core::SimulationId;
use ac_results::Selectors;
use ac_stats::{AgreementThresholds, DifferenceMode, TrendConfig};
use serde::{Deserialize, Serialize};

pub const PROJECT_VERSION: u32 = 1;

fn default_store_dir() -> String {
    ".accompare".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonProject {
    pub version: u32,
    pub name: String,
    /// Series and report store, relative to the project file.
    #[serde(default = "default_store_dir")]
    pub store_dir: String,
    #[serde(default)]
    pub comparisons: Vec<ComparisonDef>,
}

impl ComparisonProject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: PROJECT_VERSION,
            name: name.into(),
            store_dir: default_store_dir(),
            comparisons: Vec::new(),
        }
    }

    pub fn comparison(&self, id: &str) -> Option<&ComparisonDef> {
        self.comparisons.iter().find(|c| c.id == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonDef {
    pub id: String,
    pub variable: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Baseline for pairwise metrics; without one only summaries are produced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<SimulationId>,
    pub participants: Vec<SimulationId>,
    #[serde(default)]
    pub options: ComparisonOptionsDef,
}

impl ComparisonDef {
    pub fn selectors(&self) -> Selectors {
        Selectors {
            region: self.region.clone(),
            level: self.level,
            time: self.time.clone(),
        }
    }
}

fn default_histogram_bins() -> usize {
    10
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonOptionsDef {
    /// Report differences as a percentage of the reference.
    #[serde(default)]
    pub normalize: bool,
    #[serde(default)]
    pub show_difference: bool,
    /// Overrides `normalize` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difference_mode: Option<DifferenceMode>,
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,
    #[serde(default = "default_true")]
    pub taylor: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<TrendConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agreement: Option<AgreementThresholds>,
}

impl Default for ComparisonOptionsDef {
    fn default() -> Self {
        Self {
            normalize: false,
            show_difference: false,
            difference_mode: None,
            histogram_bins: default_histogram_bins(),
            taylor: true,
            trend: None,
            agreement: None,
        }
    }
}

impl ComparisonOptionsDef {
    /// First requested option that only makes sense against a reference.
    ///
    /// `taylor` is on by default and is simply skipped without a reference.
    pub fn needs_reference(&self) -> Option<&'static str> {
        if self.show_difference {
            Some("show_difference")
        } else if self.normalize {
            Some("normalize")
        } else if self.difference_mode.is_some() {
            Some("difference_mode")
        } else if self.agreement.is_some() {
            Some("agreement")
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let yaml = "version: 1\nname: Ozone\ncomparisons:\n  - id: o3\n    variable: SpeciesConc_O3\n    participants: [a, b]\n";
        let project: ComparisonProject = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(project.store_dir, ".accompare");
        let def = &project.comparisons[0];
        assert_eq!(def.reference, None);
        assert_eq!(def.options.histogram_bins, 10);
        assert!(def.options.taylor);
        assert!(def.selectors().is_empty());
    }

    #[test]
    fn trend_and_agreement_options_parse() {
        let yaml = r#"
id: no2
variable: NO2
level: 0
reference: ref
participants: [ref, dev]
options:
  normalize: true
  trend: { half_window: 3, threshold_fraction: 0.05 }
  agreement: { mean: 1.0e-4, rmse: 1.0e-3, max_abs_diff: 1.0e-2 }
"#;
        let def: ComparisonDef = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.selectors().level, Some(0));
        assert_eq!(def.options.trend.unwrap().half_window, 3);
        assert_eq!(def.options.agreement.unwrap().rmse, 1.0e-3);
    }
}
