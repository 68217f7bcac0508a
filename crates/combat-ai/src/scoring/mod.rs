//! Utility scoring for arena actions.
//!
//! Every candidate action is scored independently by a hand-tuned rule
//! ([`actions`]); [`selector::ActionScorer`] then perturbs the legal scores
//! with a small multiplicative jitter and picks the best one, or samples
//! among the top few for erratic fighters.
//!
//! # Profiles
//!
//! Rules scale some scores by profile multipliers ("aggressive ×1.5",
//! "defensive ×1.3", ...). [`ProfileWeights`] expresses a profile as two blend
//! weights in `[0, 1]`; a multiplier `k` becomes `lerp(1, k, weight)`. The
//! named profiles sit at the corners, so they apply the multipliers exactly,
//! while trait-driven fighters land anywhere in between.

pub mod actions;
pub mod selector;

use crate::snapshot::Personality;

/// Scoring result for one candidate action.
///
/// A blocked action (cooldown, energy, or skill gate failed) carries the
/// sentinel [`Score::BLOCKED`] and is never jittered or selected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    /// Can this action be executed at all?
    pub is_possible: bool,
    raw: f64,
}

impl Score {
    /// Sentinel reported for blocked actions.
    pub const BLOCKED: f64 = -1000.0;

    pub const fn new(value: f64) -> Self {
        Self {
            is_possible: true,
            raw: value,
        }
    }

    pub const fn blocked() -> Self {
        Self {
            is_possible: false,
            raw: Self::BLOCKED,
        }
    }

    /// Final value; the sentinel for blocked actions.
    pub const fn value(&self) -> f64 {
        if self.is_possible {
            self.raw
        } else {
            Self::BLOCKED
        }
    }

    /// Applies a multiplicative factor to a legal score. Blocked scores are
    /// returned unchanged.
    pub fn scaled(self, factor: f64) -> Self {
        if self.is_possible {
            Self::new(self.raw * factor)
        } else {
            self
        }
    }
}

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp_f64(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Named play style selected by the engine's strategy hint.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Profile {
    Aggressive,
    Defensive,
    #[default]
    Neutral,
}

/// Profile expressed as blend weights over the scoring multipliers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileWeights {
    /// How strongly offense/approach multipliers apply (0..=1).
    pub aggressive: f64,
    /// How strongly heal/retreat multipliers apply (0..=1).
    pub defensive: f64,
    /// Points subtracted from retreating while an ally stands close by.
    pub hold_ground: f64,
}

impl ProfileWeights {
    /// Allies closer than this make a teamplay-minded fighter hold ground.
    pub const ALLY_SUPPORT_RANGE: f64 = 150.0;

    pub const NEUTRAL: Self = Self {
        aggressive: 0.0,
        defensive: 0.0,
        hold_ground: 0.0,
    };

    pub const fn of(profile: Profile) -> Self {
        match profile {
            Profile::Aggressive => Self {
                aggressive: 1.0,
                ..Self::NEUTRAL
            },
            Profile::Defensive => Self {
                defensive: 1.0,
                ..Self::NEUTRAL
            },
            Profile::Neutral => Self::NEUTRAL,
        }
    }

    /// Derives weights from personality traits.
    ///
    /// Aggression and risk taking together push toward the aggressive corner
    /// (both at 10 → fully aggressive), their absence toward the defensive
    /// one (both at 0 → fully defensive). Neutral traits give neutral weights.
    pub fn from_traits(traits: &Personality) -> Self {
        let drive = traits.aggression + traits.risk_taking;
        Self {
            aggressive: ((drive - 10.0) / 10.0).clamp(0.0, 1.0),
            defensive: ((10.0 - drive) / 10.0).clamp(0.0, 1.0),
            hold_ground: traits.teamplay * 10.0,
        }
    }

    /// Multiplier for an offense/approach modifier `k`.
    #[inline]
    pub fn offense(&self, k: f64) -> f64 {
        lerp_f64(1.0, k, self.aggressive)
    }

    /// Multiplier for a heal/retreat modifier `k`.
    #[inline]
    pub fn caution(&self, k: f64) -> f64 {
        lerp_f64(1.0, k, self.defensive)
    }
}

impl From<Profile> for ProfileWeights {
    fn from(profile: Profile) -> Self {
        Self::of(profile)
    }
}
