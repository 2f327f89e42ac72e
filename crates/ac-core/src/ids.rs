use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of one simulation run taking part in a comparison.
///
/// Ids are opaque strings assigned by the run catalogue; equality is exact.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct SimulationId(String);

impl SimulationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SimulationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SimulationId({})", self.0)
    }
}

impl fmt::Display for SimulationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SimulationId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SimulationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for SimulationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
