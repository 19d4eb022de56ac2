//! Risk tiers derived from the global score.

use serde::Serialize;

use crate::scoring::clamp01;

/// Four ordinal severity buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Moderate,
    High,
    VeryHigh,
}

/// Visual grouping used for colouring. Carries no meaning beyond display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Ok,
    Warn,
    Bad,
    Bad2,
}

impl RiskTier {
    pub const ALL: [RiskTier; 4] = [
        RiskTier::Low,
        RiskTier::Moderate,
        RiskTier::High,
        RiskTier::VeryHigh,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "Faible",
            RiskTier::Moderate => "Modéré",
            RiskTier::High => "Élevé",
            RiskTier::VeryHigh => "Très élevé",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            RiskTier::Low => Tone::Ok,
            RiskTier::Moderate => Tone::Warn,
            RiskTier::High => Tone::Bad,
            RiskTier::VeryHigh => Tone::Bad2,
        }
    }
}

/// Map a score to its tier. Lower bounds are inclusive: `0.25` is Moderate,
/// `0.75` is Very High.
pub fn risk_level(score: f64) -> RiskTier {
    let s = clamp01(score);
    if s < 0.25 {
        RiskTier::Low
    } else if s < 0.5 {
        RiskTier::Moderate
    } else if s < 0.75 {
        RiskTier::High
    } else {
        RiskTier::VeryHigh
    }
}
