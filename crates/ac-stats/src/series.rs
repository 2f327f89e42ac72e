//! Series data model and sample alignment.

use std::collections::HashMap;
use std::fmt;

use ac_core::{SimulationId, is_missing};
use serde::{Deserialize, Serialize};

use crate::{StatsError, StatsResult};

/// Coordinate label attached to one sample.
///
/// Time stamps are carried as labels (ISO 8601 text); grid cells and model
/// levels as indices; spatial positions as plain values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Index(i64),
    Value(f64),
    Label(String),
}

/// Hashable view of a coordinate, used for alignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CoordKey {
    Index(i64),
    Bits(u64),
    Label(String),
}

impl Coordinate {
    /// Parse a textual label: integers become indices, other finite numbers values.
    pub fn parse(text: &str) -> Self {
        let t = text.trim();
        if let Ok(i) = t.parse::<i64>() {
            Coordinate::Index(i)
        } else if let Ok(v) = t.parse::<f64>()
            && v.is_finite()
        {
            Coordinate::Value(v)
        } else {
            Coordinate::Label(t.to_string())
        }
    }

    fn key(&self) -> CoordKey {
        match self {
            Coordinate::Index(i) => CoordKey::Index(*i),
            // -0.0 and 0.0 label the same position
            Coordinate::Value(v) if *v == 0.0 => CoordKey::Bits(0.0_f64.to_bits()),
            Coordinate::Value(v) => CoordKey::Bits(v.to_bits()),
            Coordinate::Label(s) => CoordKey::Label(s.clone()),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coordinate::Index(i) => write!(f, "{i}"),
            Coordinate::Value(v) => write!(f, "{v}"),
            Coordinate::Label(s) => f.write_str(s),
        }
    }
}

impl From<usize> for Coordinate {
    fn from(value: usize) -> Self {
        Coordinate::Index(value as i64)
    }
}

impl From<&str> for Coordinate {
    fn from(value: &str) -> Self {
        Coordinate::Label(value.to_string())
    }
}

/// Ordered numeric samples with optional coordinate labels of equal length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SeriesRepr", into = "SeriesRepr")]
pub struct Series {
    values: Vec<f64>,
    coords: Option<Vec<Coordinate>>,
}

#[derive(Serialize, Deserialize)]
struct SeriesRepr {
    #[serde(with = "values_serde")]
    values: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    coords: Option<Vec<Coordinate>>,
}

impl TryFrom<SeriesRepr> for Series {
    type Error = StatsError;

    fn try_from(repr: SeriesRepr) -> Result<Self, Self::Error> {
        match repr.coords {
            Some(coords) => Series::with_coords(repr.values, coords),
            None => Ok(Series::new(repr.values)),
        }
    }
}

impl From<Series> for SeriesRepr {
    fn from(series: Series) -> Self {
        SeriesRepr {
            values: series.values,
            coords: series.coords,
        }
    }
}

// Missing samples are stored as `null`.
mod values_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        values
            .iter()
            .map(|v| v.is_finite().then_some(*v))
            .collect::<Vec<_>>()
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        let raw = Vec::<Option<f64>>::deserialize(deserializer)?;
        Ok(raw.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    }
}

impl Series {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            coords: None,
        }
    }

    pub fn with_coords(values: Vec<f64>, coords: Vec<Coordinate>) -> StatsResult<Self> {
        if values.len() != coords.len() {
            return Err(StatsError::CoordinateLengthMismatch {
                values: values.len(),
                coords: coords.len(),
            });
        }
        Ok(Self {
            values,
            coords: Some(coords),
        })
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (Coordinate, f64)>) -> Self {
        let (coords, values): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
        Self {
            values,
            coords: Some(coords),
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn coords(&self) -> Option<&[Coordinate]> {
        self.coords.as_deref()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Coordinate of sample `i`, falling back to its position.
    pub fn coord_at(&self, i: usize) -> Coordinate {
        match &self.coords {
            Some(coords) => coords[i].clone(),
            None => Coordinate::from(i),
        }
    }

    pub fn valid_values(&self) -> Vec<f64> {
        self.values.iter().copied().filter(|v| !is_missing(*v)).collect()
    }

    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|v| !is_missing(**v)).count()
    }

    /// Same coordinates, values transformed by `f`.
    pub fn map_values(&self, f: impl Fn(f64) -> f64) -> Series {
        Series {
            values: self.values.iter().map(|v| f(*v)).collect(),
            coords: self.coords.clone(),
        }
    }
}

/// A series owned by one simulation, for one variable, in one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSeries {
    pub simulation_id: SimulationId,
    pub variable: String,
    pub unit: String,
    pub series: Series,
}

impl NamedSeries {
    pub fn new(
        simulation_id: impl Into<SimulationId>,
        variable: impl Into<String>,
        unit: impl Into<String>,
        series: Series,
    ) -> Self {
        Self {
            simulation_id: simulation_id.into(),
            variable: variable.into(),
            unit: unit.into(),
            series,
        }
    }
}

/// One sample of `a` with the sample of `b` at the same coordinate.
///
/// `b` is `NaN` when `b` has no sample there.
#[derive(Debug, Clone, PartialEq)]
pub struct Aligned {
    pub coord: Coordinate,
    pub a: f64,
    pub b: f64,
}

/// Align every sample of `a` with `b`.
///
/// When both series carry coordinates, samples are matched by equal
/// coordinate (first occurrence in `b` wins); otherwise by position.
pub fn align(a: &Series, b: &Series) -> Vec<Aligned> {
    match (a.coords(), b.coords()) {
        (Some(ca), Some(cb)) => {
            let mut lookup: HashMap<CoordKey, usize> = HashMap::with_capacity(cb.len());
            for (j, c) in cb.iter().enumerate() {
                lookup.entry(c.key()).or_insert(j);
            }
            ca.iter()
                .zip(a.values())
                .map(|(c, &va)| Aligned {
                    coord: c.clone(),
                    a: va,
                    b: lookup.get(&c.key()).map_or(f64::NAN, |&j| b.values()[j]),
                })
                .collect()
        }
        (_, cb) => a
            .values()
            .iter()
            .enumerate()
            .map(|(i, &va)| Aligned {
                coord: match (a.coords(), cb) {
                    (None, Some(cb)) if i < cb.len() => cb[i].clone(),
                    _ => a.coord_at(i),
                },
                a: va,
                b: b.values().get(i).copied().unwrap_or(f64::NAN),
            })
            .collect(),
    }
}

/// Positional pairs where both samples are present.
///
/// Pairs run over the common prefix of the two slices.
pub fn valid_pairs(x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<f64>) {
    x.iter()
        .zip(y)
        .filter(|(a, b)| !is_missing(**a) && !is_missing(**b))
        .map(|(a, b)| (*a, *b))
        .unzip()
}
