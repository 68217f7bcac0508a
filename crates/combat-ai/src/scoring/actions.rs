//! Per-action scoring rules.
//!
//! Bands are distance thresholds in world units. Weights are hand-tuned and
//! must stay exactly as they are: engine-side balance depends on them.

use super::{ProfileWeights, Score};
use crate::action::Action;
use crate::context::DecisionContext;

/// Minimum energy for the scorer to consider healing.
pub const HEAL_MIN_ENERGY: f64 = 25.0;

/// Enemies inside this distance can punish a heal.
pub const ATTACK_RANGE: f64 = 80.0;

/// HP ratio treated as "low" by several rules.
pub const LOW_HP: f64 = 0.3;

/// Scores one action for the given context and profile.
pub fn score(action: Action, ctx: &DecisionContext, weights: &ProfileWeights) -> Score {
    match action {
        Action::Heal => heal(ctx, weights),
        Action::Dash => dash(ctx, weights),
        Action::Spin => spin(ctx),
        Action::AttackHeavy => attack_heavy(ctx, weights),
        Action::AttackLight => attack_light(ctx, weights),
        Action::MoveTowards => move_towards(ctx, weights),
        Action::MoveAway => move_away(ctx, weights),
        Action::StrafeLeft | Action::StrafeRight => strafe(ctx, weights),
        Action::Idle => Score::new(-100.0),
    }
}

fn heal(ctx: &DecisionContext, weights: &ProfileWeights) -> Score {
    if !ctx.is_legal(Action::Heal) || ctx.energy() < HEAL_MIN_ENERGY {
        return Score::blocked();
    }
    let hp = ctx.hp_ratio();
    let mut score = if hp < 0.25 {
        1000.0
    } else if hp < 0.40 {
        600.0
    } else if hp < 0.60 {
        300.0
    } else {
        -500.0
    };
    score *= weights.caution(1.3);
    if ctx.distance() < ATTACK_RANGE {
        score -= 400.0;
    }
    Score::new(score)
}

fn dash(ctx: &DecisionContext, weights: &ProfileWeights) -> Score {
    if !ctx.is_legal(Action::Dash) {
        return Score::blocked();
    }
    let dist = ctx.distance();
    let score = if dist > 200.0 {
        400.0
    } else if dist > 150.0 {
        200.0
    } else {
        -200.0
    };
    Score::new(score * weights.offense(1.5))
}

fn spin(ctx: &DecisionContext) -> Score {
    if !ctx.is_legal(Action::Spin) {
        return Score::blocked();
    }
    let dist = ctx.distance();
    let mut score = if dist < 60.0 {
        800.0
    } else if dist < 100.0 {
        400.0
    } else if dist < 140.0 {
        100.0
    } else {
        -500.0
    };
    // Desperation move.
    if ctx.hp_ratio() < LOW_HP {
        score += 200.0;
    }
    Score::new(score)
}

fn attack_heavy(ctx: &DecisionContext, weights: &ProfileWeights) -> Score {
    if !ctx.is_legal(Action::AttackHeavy) {
        return Score::blocked();
    }
    let dist = ctx.distance();
    let mut score = if dist < 70.0 {
        600.0
    } else if dist < 110.0 {
        400.0
    } else {
        -200.0
    };
    // Finisher.
    if ctx.enemy_hp_ratio() < LOW_HP {
        score += 400.0;
    }
    Score::new(score * weights.offense(1.3))
}

fn attack_light(ctx: &DecisionContext, weights: &ProfileWeights) -> Score {
    // The light poke is always available on cooldown-only snapshots.
    if ctx.skills().is_some() && !ctx.is_legal(Action::AttackLight) {
        return Score::blocked();
    }
    let dist = ctx.distance();
    let score = if dist < 60.0 {
        500.0
    } else if dist < 90.0 {
        400.0
    } else if dist < 120.0 {
        200.0
    } else {
        -100.0
    };
    Score::new(score * weights.caution(1.2))
}

fn move_towards(ctx: &DecisionContext, weights: &ProfileWeights) -> Score {
    let dist = ctx.distance();
    let mut score = if dist > 150.0 {
        500.0
    } else if dist > 100.0 {
        300.0
    } else {
        50.0
    };
    score *= weights.offense(1.4);
    if ctx.hp_ratio() < LOW_HP {
        score -= 300.0;
    }
    Score::new(score)
}

fn move_away(ctx: &DecisionContext, weights: &ProfileWeights) -> Score {
    let dist = ctx.distance();
    let mut score = if ctx.hp_ratio() < LOW_HP {
        600.0
    } else if dist < 60.0 {
        400.0
    } else if dist < 100.0 {
        200.0
    } else {
        -200.0
    };
    score *= weights.caution(1.5);
    if weights.hold_ground > 0.0
        && ctx
            .ally_distance()
            .is_some_and(|d| d < ProfileWeights::ALLY_SUPPORT_RANGE)
    {
        score -= weights.hold_ground;
    }
    Score::new(score)
}

fn strafe(ctx: &DecisionContext, weights: &ProfileWeights) -> Score {
    let dist = ctx.distance();
    let score = if dist > 80.0 && dist < 160.0 {
        300.0
    } else if dist < 80.0 {
        400.0
    } else {
        100.0
    };
    Score::new(score * weights.caution(1.3))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::SkillSlot;
    use crate::scoring::Profile;
    use crate::snapshot::{Fighter, SelfState, SkillInfo, WorldSnapshot};

    fn at_distance(dist: f64, hp: f64) -> WorldSnapshot {
        WorldSnapshot::new(SelfState::new("me", 0.0, 0.0, hp, 100.0))
            .with_enemy(Fighter::at(dist, 0.0, 100.0))
    }

    fn value(action: Action, snapshot: &WorldSnapshot, profile: Profile) -> f64 {
        let ctx = DecisionContext::new(snapshot).unwrap();
        score(action, &ctx, &ProfileWeights::of(profile)).value()
    }

    #[test]
    fn heal_bands_follow_hp() {
        let far = |hp| value(Action::Heal, &at_distance(300.0, hp), Profile::Neutral);
        assert_eq!(far(20.0), 1000.0);
        assert_eq!(far(30.0), 600.0);
        assert_eq!(far(50.0), 300.0);
        assert_eq!(far(90.0), -500.0);
    }

    #[test]
    fn defensive_heal_is_boosted_before_punish_penalty() {
        let close = at_distance(50.0, 20.0);
        assert_eq!(value(Action::Heal, &close, Profile::Defensive), 1000.0 * 1.3 - 400.0);
    }

    #[test]
    fn heal_needs_cooldown_and_energy() {
        let on_cooldown = at_distance(300.0, 20.0).with_cooldown("heal", 2.0);
        assert_eq!(value(Action::Heal, &on_cooldown, Profile::Neutral), Score::BLOCKED);

        let mut drained = at_distance(300.0, 20.0);
        drained.me.energy = 24.0;
        let ctx = DecisionContext::new(&drained).unwrap();
        assert!(!score(Action::Heal, &ctx, &ProfileWeights::NEUTRAL).is_possible);
    }

    #[test]
    fn dash_closes_long_gaps() {
        assert_eq!(value(Action::Dash, &at_distance(250.0, 100.0), Profile::Aggressive), 600.0);
        assert_eq!(value(Action::Dash, &at_distance(180.0, 100.0), Profile::Neutral), 200.0);
        assert_eq!(value(Action::Dash, &at_distance(100.0, 100.0), Profile::Neutral), -200.0);
    }

    #[test]
    fn spin_rewards_point_blank_and_desperation() {
        assert_eq!(value(Action::Spin, &at_distance(50.0, 100.0), Profile::Neutral), 800.0);
        assert_eq!(value(Action::Spin, &at_distance(120.0, 20.0), Profile::Neutral), 300.0);
        assert_eq!(value(Action::Spin, &at_distance(200.0, 100.0), Profile::Neutral), -500.0);
    }

    #[test]
    fn heavy_finisher_bonus_applies_before_aggression() {
        let mut snapshot = at_distance(60.0, 100.0);
        if let Some(enemy) = snapshot.closest_enemy.as_mut() {
            enemy.hp = 20.0;
        }
        assert_eq!(
            value(Action::AttackHeavy, &snapshot, Profile::Aggressive),
            (600.0 + 400.0) * 1.3
        );
    }

    #[test]
    fn light_attack_ignores_cooldowns_without_skill_data() {
        let snapshot = at_distance(70.0, 100.0).with_cooldown("light", 5.0);
        assert_eq!(value(Action::AttackLight, &snapshot, Profile::Defensive), 400.0 * 1.2);
    }

    #[test]
    fn light_attack_respects_skill_data() {
        let snapshot = at_distance(70.0, 100.0).with_skill(SkillSlot::Heavy, SkillInfo::ready(80.0, 0.0));
        assert_eq!(value(Action::AttackLight, &snapshot, Profile::Neutral), Score::BLOCKED);
    }

    #[test]
    fn approach_penalized_on_low_hp() {
        assert_eq!(
            value(Action::MoveTowards, &at_distance(200.0, 20.0), Profile::Aggressive),
            500.0 * 1.4 - 300.0
        );
        assert_eq!(value(Action::MoveTowards, &at_distance(90.0, 100.0), Profile::Neutral), 50.0);
    }

    #[test]
    fn retreat_bands() {
        assert_eq!(value(Action::MoveAway, &at_distance(300.0, 10.0), Profile::Neutral), 600.0);
        assert_eq!(value(Action::MoveAway, &at_distance(50.0, 100.0), Profile::Defensive), 600.0);
        assert_eq!(value(Action::MoveAway, &at_distance(300.0, 100.0), Profile::Neutral), -200.0);
    }

    #[test]
    fn retreat_holds_ground_next_to_ally() {
        let snapshot = at_distance(50.0, 100.0).with_ally(Fighter::at(-40.0, 0.0, 100.0));
        let ctx = DecisionContext::new(&snapshot).unwrap();
        let weights = ProfileWeights {
            hold_ground: 80.0,
            ..ProfileWeights::NEUTRAL
        };
        assert_eq!(score(Action::MoveAway, &ctx, &weights).value(), 320.0);
    }

    #[test]
    fn strafe_band_edges() {
        assert_eq!(value(Action::StrafeLeft, &at_distance(79.0, 100.0), Profile::Neutral), 400.0);
        assert_eq!(value(Action::StrafeLeft, &at_distance(80.0, 100.0), Profile::Neutral), 100.0);
        assert_eq!(value(Action::StrafeRight, &at_distance(120.0, 100.0), Profile::Neutral), 300.0);
    }

    #[test]
    fn idle_is_constant() {
        assert_eq!(value(Action::Idle, &at_distance(10.0, 5.0), Profile::Aggressive), -100.0);
    }
}
