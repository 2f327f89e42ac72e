//! Stored data types.

use ac_stats::Coordinate;
use serde::{Deserialize, Serialize};

pub type ReportId = String;

/// One stored sample of a simulation output variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub coord: Coordinate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// `None` for a missing sample.
    pub value: Option<f64>,
}

impl SampleRecord {
    pub fn new(coord: Coordinate, value: Option<f64>) -> Self {
        Self {
            coord,
            region: None,
            level: None,
            time: None,
            value,
        }
    }
}

/// Region/level/time selection applied when reading a series.
///
/// A selector that is set keeps only records carrying the same value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selectors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl Selectors {
    pub fn matches(&self, record: &SampleRecord) -> bool {
        self.region
            .as_ref()
            .is_none_or(|r| record.region.as_ref() == Some(r))
            && self.level.is_none_or(|l| record.level == Some(l))
            && self
                .time
                .as_ref()
                .is_none_or(|t| record.time.as_ref() == Some(t))
    }

    pub fn is_empty(&self) -> bool {
        self.region.is_none() && self.level.is_none() && self.time.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesMeta {
    pub simulation_id: String,
    pub variable: String,
    pub unit: String,
    pub sample_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportManifest {
    pub report_id: ReportId,
    pub comparison_id: String,
    pub variable: String,
    pub reference: Option<String>,
    pub participants: Vec<String>,
    pub timestamp: String,
    pub engine_version: String,
}

impl ReportManifest {
    /// Manifest stamped with the current UTC time.
    pub fn new(
        report_id: ReportId,
        comparison_id: impl Into<String>,
        variable: impl Into<String>,
        reference: Option<String>,
        participants: Vec<String>,
        engine_version: impl Into<String>,
    ) -> Self {
        Self {
            report_id,
            comparison_id: comparison_id.into(),
            variable: variable.into(),
            reference,
            participants,
            timestamp: chrono::Utc::now().to_rfc3339(),
            engine_version: engine_version.into(),
        }
    }
}
