//! Emergency pre-emption evaluated before every state execution.

use super::{FsmScope, StateId};
use crate::action::Action;

/// Returns the state an emergency forces the fighter into, if any.
///
/// - HP below the personality-adjusted flee ratio forces `FLEE`, unless
///   already fleeing or healing.
/// - HP below the heal entry ratio with a usable heal forces `HEAL`, unless
///   in `COMBAT`, `FLEE` or `HEAL`. An enemy inside the heal danger range
///   suppresses this, since `HEAL` would abort on entry.
pub fn emergency(scope: &FsmScope<'_>) -> Option<StateId> {
    let state = scope.memory.current_state;
    let hp = scope.ctx.hp_ratio();

    if hp < scope.tuning.flee_ratio && !matches!(state, StateId::Flee | StateId::Heal) {
        return Some(StateId::Flee);
    }

    if hp < scope.config.heal_entry_ratio
        && !matches!(state, StateId::Combat | StateId::Flee | StateId::Heal)
        && scope.ctx.distance() >= scope.config.heal_danger_range
        && scope.ctx.is_legal(Action::Heal)
    {
        return Some(StateId::Heal);
    }

    None
}
