//! Action legality gating.
//!
//! Two snapshot flavors reach the core: a lightweight one carrying only
//! cooldowns, and a skill-aware one that also describes each slot. Legality
//! works with both: the cooldown always gates, skill metadata gates
//! additionally when present.

use crate::snapshot::SkillInfo;

/// Returns true when an action may be used this tick.
///
/// Requires `cooldown_remaining <= 0`. When `skill` is given it must also be
/// valid, ready, and affordable with `energy`.
pub fn is_legal(cooldown_remaining: f64, skill: Option<&SkillInfo>, energy: f64) -> bool {
    if cooldown_remaining > 0.0 {
        return false;
    }
    match skill {
        Some(skill) => skill.valid && skill.is_ready && energy >= skill.cost,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldown_alone_gates_without_metadata() {
        assert!(is_legal(0.0, None, 0.0));
        assert!(is_legal(-0.2, None, 0.0));
        assert!(!is_legal(0.1, None, 100.0));
    }

    #[test]
    fn metadata_adds_validity_readiness_and_cost() {
        let skill = SkillInfo::ready(60.0, 20.0);
        assert!(is_legal(0.0, Some(&skill), 20.0));
        assert!(!is_legal(0.0, Some(&skill), 19.9));
        assert!(!is_legal(1.0, Some(&skill), 100.0));

        let not_ready = SkillInfo {
            is_ready: false,
            ..skill
        };
        assert!(!is_legal(0.0, Some(&not_ready), 100.0));

        assert!(!is_legal(0.0, Some(&SkillInfo::default()), 100.0));
    }
}
