//! Production controller states.

use super::{FsmScope, StateId, StateLogic, Step};
use crate::action::Action;

/// Distance beyond which an approaching fighter considers dashing.
pub const DASH_DISTANCE: f64 = 200.0;

/// Share of max range inside which a kiting fighter backs off.
const KITE_BAND: f64 = 0.5;

/// Close in until within engagement distance, dashing across long gaps.
#[derive(Debug, Clone, Copy, Default)]
pub struct Approach;

impl StateLogic for Approach {
    fn execute(&self, scope: &mut FsmScope<'_>) -> Step {
        let ctx = scope.ctx;
        let dist = ctx.distance();
        let engage = ctx.best_range() * scope.tuning.engage_factor;

        if dist <= engage {
            return Step::Transition(StateId::Combat);
        }

        if dist > DASH_DISTANCE
            && scope.tuning.aggressive
            && ctx.is_legal(Action::Dash)
            && ctx.energy_ratio() > scope.tuning.low_energy_ratio
            && scope.rng.chance(scope.tuning.dash_propensity)
        {
            return Step::Act(Action::Dash);
        }

        Step::Act(Action::MoveTowards)
    }
}

/// Trade blows at range, preferring spin, then heavy, then light.
#[derive(Debug, Clone, Copy, Default)]
pub struct Combat;

impl StateLogic for Combat {
    fn enter(&self, scope: &mut FsmScope<'_>) {
        let dwell = scope.config.combat_dwell;
        scope.memory.combat_timer =
            scope.rng.range_u32(dwell.min, dwell.max) + scope.tuning.dwell_bonus;
    }

    fn execute(&self, scope: &mut FsmScope<'_>) -> Step {
        // Dwell is tracked for observers; leaving COMBAT depends on range only.
        scope.memory.combat_timer = scope.memory.combat_timer.saturating_sub(1);

        let ctx = scope.ctx;
        let dist = ctx.distance();
        let max_range = ctx.max_range();

        if dist > max_range + scope.config.combat_slack {
            return Step::Transition(StateId::Approach);
        }

        let low_energy = ctx.energy_ratio() < scope.tuning.low_energy_ratio;
        let cheap_cost = scope.config.cheap_skill_cost;
        let usable = |action: Action| {
            dist <= ctx.range(action)
                && ctx.is_legal(action)
                && (!low_energy || ctx.cost(action) <= cheap_cost)
        };

        if usable(Action::Spin) && scope.rng.chance(scope.tuning.spin_propensity) {
            return Step::Act(Action::Spin);
        }
        if usable(Action::AttackHeavy) && scope.rng.chance(scope.tuning.heavy_propensity) {
            return Step::Act(Action::AttackHeavy);
        }
        if usable(Action::AttackLight) {
            return Step::Act(Action::AttackLight);
        }

        Step::Act(reposition(scope, dist, max_range))
    }
}

fn reposition(scope: &mut FsmScope<'_>, dist: f64, max_range: f64) -> Action {
    let kite = scope.tuning.kite_bias;
    if dist > max_range {
        Action::MoveTowards
    } else if kite > 0.0 && dist < max_range * KITE_BAND {
        Action::MoveAway
    } else if kite < 0.0 {
        Action::MoveTowards
    } else if scope.rng.chance(0.5) {
        Action::StrafeLeft
    } else {
        Action::StrafeRight
    }
}

/// Break contact for a committed number of ticks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flee;

impl StateLogic for Flee {
    fn enter(&self, scope: &mut FsmScope<'_>) {
        let duration = scope.config.flee_duration;
        scope.memory.flee_timer = scope.rng.range_u32(duration.min, duration.max);
    }

    fn execute(&self, scope: &mut FsmScope<'_>) -> Step {
        scope.memory.flee_timer = scope.memory.flee_timer.saturating_sub(1);

        let ctx = scope.ctx;
        let safe = ctx.distance() >= scope.config.flee_safe_distance;
        let hurt = ctx.hp_ratio() < scope.config.heal_entry_ratio;

        if safe {
            if hurt && ctx.is_legal(Action::Heal) {
                return Step::Transition(StateId::Heal);
            }
            if scope.memory.flee_timer == 0 {
                let next = if hurt { StateId::Heal } else { StateId::Approach };
                return Step::Transition(next);
            }
        }

        if ctx.is_legal(Action::Dash) && ctx.energy() >= scope.config.dash_min_energy {
            Step::Act(Action::Dash)
        } else {
            Step::Act(Action::MoveAway)
        }
    }
}

/// Heal while it is safe to, backing off otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct Heal;

impl StateLogic for Heal {
    fn execute(&self, scope: &mut FsmScope<'_>) -> Step {
        let ctx = scope.ctx;

        if ctx.hp_ratio() >= scope.config.heal_exit_ratio
            || ctx.distance() < scope.config.heal_danger_range
        {
            return Step::Transition(StateId::Approach);
        }

        if ctx.is_legal(Action::Heal) {
            Step::Act(Action::Heal)
        } else {
            Step::Act(Action::MoveAway)
        }
    }
}
