//! Comparison requests as accepted by the orchestrator.

use std::collections::HashSet;

use ac_core::SimulationId;
use ac_project::{ComparisonDef, ComparisonOptionsDef};
use ac_results::Selectors;
use ac_stats::{AgreementThresholds, DifferenceMode, TrendConfig};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// What to compute beyond the per-simulation summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonOptions {
    pub normalize: bool,
    pub show_difference: bool,
    pub difference_mode: Option<DifferenceMode>,
    pub histogram_bins: usize,
    pub taylor: bool,
    pub trend: Option<TrendConfig>,
    pub agreement: Option<AgreementThresholds>,
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        Self {
            normalize: false,
            show_difference: false,
            difference_mode: None,
            histogram_bins: 10,
            taylor: true,
            trend: None,
            agreement: None,
        }
    }
}

impl ComparisonOptions {
    /// Explicit mode if set, otherwise percent when `normalize` is on.
    pub fn difference_mode(&self) -> DifferenceMode {
        self.difference_mode
            .unwrap_or_else(|| DifferenceMode::from_normalize(self.normalize))
    }
}

impl ComparisonOptions {
    /// First requested option that only makes sense against a reference.
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

impl From<&ComparisonOptionsDef> for ComparisonOptions {
    fn from(def: &ComparisonOptionsDef) -> Self {
        Self {
            normalize: def.normalize,
            show_difference: def.show_difference,
            difference_mode: def.difference_mode,
            histogram_bins: def.histogram_bins,
            taylor: def.taylor,
            trend: def.trend,
            agreement: def.agreement,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRequest {
    pub variable: String,
    #[serde(default)]
    pub selectors: Selectors,
    pub reference: Option<SimulationId>,
    /// Output order of every per-simulation result.
    pub participants: Vec<SimulationId>,
    #[serde(default)]
    pub options: ComparisonOptions,
}

impl ComparisonRequest {
    pub fn new(variable: impl Into<String>, participants: Vec<SimulationId>) -> Self {
        Self {
            variable: variable.into(),
            selectors: Selectors::default(),
            reference: None,
            participants,
            options: ComparisonOptions::default(),
        }
    }

    pub fn with_reference(mut self, reference: impl Into<SimulationId>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_options(mut self, options: ComparisonOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_selectors(mut self, selectors: Selectors) -> Self {
        self.selectors = selectors;
        self
    }

    /// Position of the reference among the participants.
    pub fn reference_index(&self) -> Option<usize> {
        let reference = self.reference.as_ref()?;
        self.participants.iter().position(|p| p == reference)
    }

    /// Check the request before anything is resolved.
    pub fn validate(&self) -> AppResult<()> {
        if self.variable.trim().is_empty() {
            return Err(AppError::InvalidRequest(
                "variable name must not be empty".to_string(),
            ));
        }

        if self.participants.is_empty() {
            return Err(AppError::InvalidRequest(
                "at least one participant simulation is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for participant in &self.participants {
            if !seen.insert(participant) {
                return Err(AppError::InvalidRequest(format!(
                    "simulation '{participant}' is listed more than once"
                )));
            }
        }

        if let Some(reference) = &self.reference
            && !seen.contains(reference)
        {
            return Err(AppError::InvalidRequest(format!(
                "reference simulation '{reference}' is not a participant"
            )));
        }

        if self.reference.is_none()
            && let Some(option) = self.options.needs_reference()
        {
            return Err(AppError::InvalidRequest(format!(
                "'{option}' needs a reference simulation"
            )));
        }

        if self.options.histogram_bins < 2 {
            return Err(AppError::InvalidRequest(format!(
                "histogram needs at least 2 bins, got {}",
                self.options.histogram_bins
            )));
        }

        if let Some(trend) = &self.options.trend {
            if trend.half_window == 0 {
                return Err(AppError::InvalidRequest(
                    "trend half window must be at least 1".to_string(),
                ));
            }
            if trend.threshold_fraction.is_nan() || trend.threshold_fraction < 0.0 {
                return Err(AppError::InvalidRequest(format!(
                    "trend threshold fraction must not be negative, got {}",
                    trend.threshold_fraction
                )));
            }
        }

        if let Some(thresholds) = &self.options.agreement {
            thresholds.validate()?;
        }

        Ok(())
    }
}

impl From<&ComparisonDef> for ComparisonRequest {
    fn from(def: &ComparisonDef) -> Self {
        Self {
            variable: def.variable.clone(),
            selectors: def.selectors(),
            reference: def.reference.clone(),
            participants: def.participants.clone(),
            options: ComparisonOptions::from(&def.options),
        }
    }
}
