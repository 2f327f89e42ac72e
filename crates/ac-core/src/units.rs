// ac-core/src/units.rs

use uom::si::f64::Ratio as UomRatio;
use uom::si::ratio::{part_per_billion, part_per_million, part_per_trillion, percent, ratio};

use crate::{CoreError, CoreResult};

/// Dimensionless amount fraction (mol/mol) as a uom quantity.
pub type MixingRatio = UomRatio;

/// Mixing-ratio units that chemistry model output is commonly reported in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MixingRatioUnit {
    MolPerMol,
    Percent,
    Ppm,
    Ppb,
    Ppt,
}

impl MixingRatioUnit {
    /// Parse a unit label such as `ppbv`, `ppb`, `mol mol-1` or `v/v`.
    pub fn parse(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_lowercase();
        let normalized = normalized.replace(' ', "");
        match normalized.as_str() {
            "mol/mol" | "molmol-1" | "mol.mol-1" | "v/v" | "vv-1" | "1" => Some(Self::MolPerMol),
            "%" | "percent" => Some(Self::Percent),
            "ppm" | "ppmv" => Some(Self::Ppm),
            "ppb" | "ppbv" => Some(Self::Ppb),
            "ppt" | "pptv" => Some(Self::Ppt),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::MolPerMol => "mol/mol",
            Self::Percent => "%",
            Self::Ppm => "ppm",
            Self::Ppb => "ppb",
            Self::Ppt => "ppt",
        }
    }

    #[inline]
    pub fn quantity(self, v: f64) -> MixingRatio {
        match self {
            Self::MolPerMol => MixingRatio::new::<ratio>(v),
            Self::Percent => MixingRatio::new::<percent>(v),
            Self::Ppm => MixingRatio::new::<part_per_million>(v),
            Self::Ppb => MixingRatio::new::<part_per_billion>(v),
            Self::Ppt => MixingRatio::new::<part_per_trillion>(v),
        }
    }

    #[inline]
    pub fn value_of(self, q: MixingRatio) -> f64 {
        match self {
            Self::MolPerMol => q.get::<ratio>(),
            Self::Percent => q.get::<percent>(),
            Self::Ppm => q.get::<part_per_million>(),
            Self::Ppb => q.get::<part_per_billion>(),
            Self::Ppt => q.get::<part_per_trillion>(),
        }
    }
}

fn same_label(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Multiplicative factor taking values expressed in `from` into `to`.
///
/// Identical labels always convert with factor 1, even when the label is not a
/// known mixing-ratio unit (e.g. `molec/cm2`).
pub fn conversion_factor(from: &str, to: &str) -> CoreResult<f64> {
    if same_label(from, to) {
        return Ok(1.0);
    }
    match (MixingRatioUnit::parse(from), MixingRatioUnit::parse(to)) {
        (Some(f), Some(t)) => Ok(t.value_of(f.quantity(1.0))),
        _ => Err(CoreError::IncompatibleUnits {
            from: from.to_string(),
            to: to.to_string(),
        }),
    }
}

/// Convert one value between two unit labels.
pub fn convert(value: f64, from: &str, to: &str) -> CoreResult<f64> {
    Ok(value * conversion_factor(from, to)?)
}

pub fn parse_mixing_ratio_unit(label: &str) -> CoreResult<MixingRatioUnit> {
    MixingRatioUnit::parse(label).ok_or_else(|| CoreError::UnknownUnit {
        unit: label.to_string(),
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::{Tolerances, nearly_equal};
    use proptest::prelude::*;

    const LABELS: [&str; 6] = ["mol/mol", "%", "ppmv", "ppbv", "pptv", "ppb"];

    proptest! {
        #[test]
        fn conversion_factors_are_reciprocal(a in 0usize..6, b in 0usize..6) {
            let there = conversion_factor(LABELS[a], LABELS[b]).unwrap();
            let back = conversion_factor(LABELS[b], LABELS[a]).unwrap();
            prop_assert!(nearly_equal(there * back, 1.0, Tolerances::default()));
        }
    }
}
