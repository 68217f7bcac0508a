//! Persistent finite-state controller.
//!
//! Each fighter is always in one of four states ([`StateId`]). A state's
//! [`StateLogic::execute`] either emits an action or names the next state;
//! the controller resolves such transitions within the same call, entering
//! and executing the new state, up to a configured chain bound.
//!
//! Before every execution the controller evaluates emergency
//! [`reflexes`]: low HP forces `FLEE`, moderate HP with a ready heal forces
//! `HEAL`. Reflexes override whatever the current state would have done.
//!
//! State logic is looked up in a [`StateTable`]; [`StateTable::standard`]
//! holds the production states from [`states`], tests can substitute their
//! own.
//!
//! Persistent data lives in [`AgentMemory`], owned by [`MemoryStore`]. Only
//! this module reads or writes it.

pub mod memory;
pub mod reflexes;
pub mod states;

pub use memory::{AgentMemory, MemoryStore};

use crate::action::Action;
use crate::config::AiConfig;
use crate::context::DecisionContext;
use crate::rng::RandomSource;
use crate::snapshot::Personality;

/// Controller state names.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum StateId {
    /// Close in to engagement distance. Initial state for every fighter.
    #[default]
    Approach,
    Combat,
    Flee,
    Heal,
}

impl StateId {
    pub const COUNT: usize = 4;

    #[inline]
    pub const fn as_index(self) -> usize {
        self as usize
    }
}

/// Outcome of executing a state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Emit this action for the current tick.
    Act(Action),
    /// Switch to another state and execute it in the same call.
    Transition(StateId),
}

/// Thresholds and propensities derived from personality traits.
///
/// - aggression lowers engagement distance, raises dash/heavy propensity
///   and lengthens combat dwell;
/// - riskTaking lowers the flee threshold, raises dash/spin propensity;
/// - positioning above 5 kites, below 5 face-tanks;
/// - energyManagement raises the low-energy threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tuning {
    /// Multiplier on the best skill range giving the engagement distance.
    pub engage_factor: f64,
    /// HP ratio below which fleeing is forced.
    pub flee_ratio: f64,
    /// Energy ratio below which only cheap skills are used.
    pub low_energy_ratio: f64,
    pub dash_propensity: f64,
    pub spin_propensity: f64,
    pub heavy_propensity: f64,
    /// `-1` (face-tank) ..= `1` (kite).
    pub kite_bias: f64,
    /// Aggression above neutral.
    pub aggressive: bool,
    /// Extra COMBAT dwell ticks.
    pub dwell_bonus: u32,
}

impl Tuning {
    pub fn new(traits: &Personality, config: &AiConfig) -> Self {
        let neutral = Personality::NEUTRAL;
        let excess_aggression = (traits.aggression - neutral).max(0.0);

        Self {
            engage_factor: 0.8 * (1.0 - (traits.aggression - neutral) * 0.04),
            flee_ratio: (config.flee_hp_ratio - (traits.risk_taking - neutral) * 0.02).max(0.0),
            low_energy_ratio: 0.2 + traits.energy_management * 0.02,
            dash_propensity: (traits.aggression + traits.risk_taking) / 20.0,
            spin_propensity: 0.5 + traits.risk_taking * 0.05,
            heavy_propensity: 0.3 + traits.aggression * 0.05,
            kite_bias: (traits.positioning - neutral) / neutral,
            aggressive: traits.aggression > neutral,
            dwell_bonus: (excess_aggression * config.combat_dwell_aggression_bonus).round() as u32,
        }
    }
}

/// Everything a state sees while entering or executing.
pub struct FsmScope<'a> {
    pub ctx: &'a DecisionContext<'a>,
    pub memory: &'a mut AgentMemory,
    pub config: &'a AiConfig,
    pub tuning: Tuning,
    pub rng: &'a mut dyn RandomSource,
}

/// Behavior of one controller state.
pub trait StateLogic: Send + Sync {
    /// Called when the controller switches into this state. May initialize
    /// per-state timers in memory.
    fn enter(&self, _scope: &mut FsmScope<'_>) {}

    /// Emits an action or requests a transition.
    fn execute(&self, scope: &mut FsmScope<'_>) -> Step;
}

/// Lookup table from [`StateId`] to its logic.
pub struct StateTable {
    states: [Box<dyn StateLogic>; StateId::COUNT],
}

impl StateTable {
    pub fn new(
        approach: Box<dyn StateLogic>,
        combat: Box<dyn StateLogic>,
        flee: Box<dyn StateLogic>,
        heal: Box<dyn StateLogic>,
    ) -> Self {
        Self {
            states: [approach, combat, flee, heal],
        }
    }

    /// Production states.
    pub fn standard() -> Self {
        Self::new(
            Box::new(states::Approach),
            Box::new(states::Combat),
            Box::new(states::Flee),
            Box::new(states::Heal),
        )
    }

    #[inline]
    pub fn get(&self, id: StateId) -> &dyn StateLogic {
        self.states[id.as_index()].as_ref()
    }
}

impl Default for StateTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// The controller: resolves reflexes and transition chains for one call.
#[derive(Default)]
pub struct StateMachine {
    table: StateTable,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(table: StateTable) -> Self {
        Self { table }
    }

    /// Runs one decision for a fighter.
    ///
    /// Transitions are resolved in-process. Once `max_transition_chain`
    /// transitions have been taken, a further request is refused: the call
    /// returns idle and memory stays in the last executed state.
    pub fn run(
        &self,
        ctx: &DecisionContext,
        memory: &mut AgentMemory,
        config: &AiConfig,
        rng: &mut dyn RandomSource,
    ) -> Action {
        let tuning = Tuning::new(ctx.traits(), config);
        let mut scope = FsmScope {
            ctx,
            memory,
            config,
            tuning,
            rng,
        };
        let mut transitions = 0u32;

        loop {
            if let Some(target) = reflexes::emergency(&scope) {
                tracing::debug!(
                    from = %scope.memory.current_state,
                    to = %target,
                    hp_ratio = scope.ctx.hp_ratio(),
                    "reflex pre-empts state"
                );
                self.switch(target, &mut scope);
            }

            let current = scope.memory.current_state;
            match self.table.get(current).execute(&mut scope) {
                Step::Act(action) => {
                    tracing::debug!(state = %current, %action, transitions, "state emitted action");
                    return action;
                }
                Step::Transition(next) => {
                    if transitions >= config.max_transition_chain {
                        tracing::warn!(
                            state = %current,
                            requested = %next,
                            bound = config.max_transition_chain,
                            "transition chain exceeded bound, idling"
                        );
                        return Action::Idle;
                    }
                    transitions += 1;
                    tracing::debug!(from = %current, to = %next, "state transition");
                    self.switch(next, &mut scope);
                }
            }
        }
    }

    fn switch(&self, next: StateId, scope: &mut FsmScope<'_>) {
        scope.memory.current_state = next;
        self.table.get(next).enter(scope);
    }
}
