//! Project validation logic.

use std::collections::HashSet;

use crate::schema::{ComparisonDef, ComparisonProject, PROJECT_VERSION};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_project(project: &ComparisonProject) -> Result<(), ValidationError> {
    if project.version != PROJECT_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    let mut comparison_ids = HashSet::new();
    for comparison in &project.comparisons {
        if comparison.id.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "comparison id".to_string(),
                value: format!("'{}'", comparison.id),
                reason: "must not be empty".to_string(),
            });
        }
        if !comparison_ids.insert(&comparison.id) {
            return Err(ValidationError::DuplicateId {
                id: comparison.id.clone(),
                context: "comparisons".to_string(),
            });
        }
        validate_comparison(comparison)?;
    }

    Ok(())
}

pub fn validate_comparison(comparison: &ComparisonDef) -> Result<(), ValidationError> {
    let context = format!("comparison '{}'", comparison.id);

    if comparison.variable.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: format!("{context} variable"),
            value: "''".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    if comparison.participants.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: format!("{context} participants"),
            value: "[]".to_string(),
            reason: "at least one simulation is required".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for participant in &comparison.participants {
        if !seen.insert(participant) {
            return Err(ValidationError::DuplicateId {
                id: participant.to_string(),
                context: format!("{context} participants"),
            });
        }
    }

    if let Some(reference) = &comparison.reference
        && !seen.contains(reference)
    {
        return Err(ValidationError::MissingReference {
            id: reference.to_string(),
            context: format!("{context} participants"),
        });
    }

    let options = &comparison.options;
    if comparison.reference.is_none()
        && let Some(option) = options.needs_reference()
    {
        return Err(ValidationError::InvalidValue {
            field: format!("{context} reference"),
            value: "none".to_string(),
            reason: format!("'{option}' needs a reference simulation"),
        });
    }

    if options.histogram_bins < 2 {
        return Err(ValidationError::InvalidValue {
            field: format!("{context} histogram_bins"),
            value: options.histogram_bins.to_string(),
            reason: "at least 2 bins are required".to_string(),
        });
    }

    if let Some(trend) = &options.trend {
        if trend.half_window == 0 {
            return Err(ValidationError::InvalidValue {
                field: format!("{context} trend.half_window"),
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if trend.threshold_fraction.is_nan() || trend.threshold_fraction < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: format!("{context} trend.threshold_fraction"),
                value: trend.threshold_fraction.to_string(),
                reason: "must not be negative".to_string(),
            });
        }
    }

    if let Some(thresholds) = &options.agreement
        && let Err(e) = thresholds.validate()
    {
        return Err(ValidationError::InvalidValue {
            field: format!("{context} agreement"),
            value: format!(
                "{{ mean: {}, rmse: {}, max_abs_diff: {} }}",
                thresholds.mean, thresholds.rmse, thresholds.max_abs_diff
            ),
            reason: e.to_string(),
        });
    }

    Ok(())
}
