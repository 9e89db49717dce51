//! Stateless unit-conversion helpers.
//!
//! Engine-test rigs in this shop log imperial units (lbf·ft torque,
//! brake-specific rates per hp·h) and actuator positions as 0–100 percent;
//! reports are published in SI with positions as fractions. Every conversion
//! here is a pure multiplicative map applied element-wise (no rounding, no
//! clamping), so composing a conversion with its inverse round-trips within
//! floating-point tolerance.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// lbf·ft → N·m.
pub const LBF_FT_TO_NM: f64 = 1.3558179483;

/// Brake-specific rate per hp·h → per kW·h (e.g. BSFC, BSPM, BSNO).
pub const PER_HP_TO_PER_KW: f64 = 1.3596216173;

/// Actuator position percent (0–100) → fraction (0–1).
pub const PERCENT_TO_FRACTION: f64 = 0.01;

/// Unit conversion applied to the compared quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Conversion {
    /// Leave values as logged.
    None,
    /// Torque lbf·ft → N·m.
    TorqueNm,
    /// Brake-specific per hp·h → per kW·h.
    BrakeSpecificKw,
    /// Position percent (0–100) → fraction (0–1).
    PositionFraction,
}

impl Conversion {
    /// Multiplicative factor from logged units to reporting units.
    pub fn factor(self) -> f64 {
        match self {
            Conversion::None => 1.0,
            Conversion::TorqueNm => LBF_FT_TO_NM,
            Conversion::BrakeSpecificKw => PER_HP_TO_PER_KW,
            Conversion::PositionFraction => PERCENT_TO_FRACTION,
        }
    }

    pub fn apply(self, value: f64) -> f64 {
        value * self.factor()
    }

    /// Invert the conversion (reporting units back to logged units).
    pub fn apply_inverse(self, value: f64) -> f64 {
        value / self.factor()
    }

    /// Suffix appended to axis labels when the conversion changes units.
    pub fn unit_suffix(self) -> Option<&'static str> {
        match self {
            Conversion::None => None,
            Conversion::TorqueNm => Some("(Nm)"),
            Conversion::BrakeSpecificKw => Some("(per kWh)"),
            Conversion::PositionFraction => Some("(fraction)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_within_tolerance() {
        for conversion in [
            Conversion::None,
            Conversion::TorqueNm,
            Conversion::BrakeSpecificKw,
            Conversion::PositionFraction,
        ] {
            for &x in &[0.0, 1.0, 37.5, 1200.0, -4.0] {
                let back = conversion.apply_inverse(conversion.apply(x));
                assert!(
                    (back - x).abs() <= 1e-12 * x.abs().max(1.0),
                    "{conversion:?}: {x} -> {back}"
                );
            }
        }
    }

    #[test]
    fn torque_factor_matches_published_constant() {
        assert!((Conversion::TorqueNm.apply(100.0) - 135.58179483).abs() < 1e-8);
    }

    #[test]
    fn position_percent_to_fraction() {
        assert!((Conversion::PositionFraction.apply(45.0) - 0.45).abs() < 1e-12);
    }
}
