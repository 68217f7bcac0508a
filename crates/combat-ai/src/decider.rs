//! Strategy dispatch: the `decide` entry point.
//!
//! A call parses the snapshot, derives a [`DecisionContext`] and routes it to
//! one strategy:
//!
//! 1. skill-aware snapshots from an identified fighter go to the persistent
//!    state machine;
//! 2. snapshots carrying a personality, and skill-aware snapshots without a
//!    fighter id, are scored with trait-derived weights;
//! 3. otherwise the engine's hint picks a named profile (`aggressive`,
//!    `defensive`) or, for anything else, top-k sampling.
//!
//! No error crosses this boundary: malformed input and missing enemies both
//! yield [`Action::Idle`].

use std::fmt;
use std::sync::LazyLock;

use crate::action::Action;
use crate::config::AiConfig;
use crate::context::DecisionContext;
use crate::fsm::{MemoryStore, StateMachine, StateTable};
use crate::rng::{RandomSource, ThreadRandom};
use crate::scoring::selector::ActionScorer;
use crate::scoring::{Profile, ProfileWeights};
use crate::snapshot::{AgentId, WorldSnapshot};

/// Strategy chosen for one call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Persistent FSM, used when skill metadata and a fighter id are present.
    StateMachine,
    /// Utility scoring with weights blended from personality traits.
    Personality,
    /// Utility scoring with a named profile.
    Profile(Profile),
    /// Uniform pick among the best `top_k` candidates.
    Sampled,
}

impl Strategy {
    /// Routes a snapshot and hint to a strategy.
    ///
    /// FSM memory is keyed by fighter id, so a snapshot without one never
    /// reaches the state machine. The hint must match a profile name exactly.
    pub fn route(hint: &str, snapshot: &WorldSnapshot) -> Self {
        if snapshot.skills.is_some() {
            if !snapshot.me.id.is_empty() {
                return Strategy::StateMachine;
            }
            return Strategy::Personality;
        }
        if snapshot.personality.is_some() {
            return Strategy::Personality;
        }
        match hint.parse::<Profile>() {
            Ok(profile @ (Profile::Aggressive | Profile::Defensive)) => Strategy::Profile(profile),
            _ => Strategy::Sampled,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::StateMachine => f.write_str("state_machine"),
            Strategy::Personality => f.write_str("personality"),
            Strategy::Profile(profile) => write!(f, "profile:{profile}"),
            Strategy::Sampled => f.write_str("sampled"),
        }
    }
}

/// Decision core with its own configuration and fighter memory.
pub struct CombatAi {
    config: AiConfig,
    memory: MemoryStore,
    machine: StateMachine,
}

impl Default for CombatAi {
    fn default() -> Self {
        Self::new(AiConfig::default())
    }
}

impl CombatAi {
    pub fn new(config: AiConfig) -> Self {
        Self::with_state_table(config, StateTable::standard())
    }

    /// Builds a core whose state machine runs the given state logic.
    pub fn with_state_table(config: AiConfig, table: StateTable) -> Self {
        Self {
            config,
            memory: MemoryStore::new(),
            machine: StateMachine::with_table(table),
        }
    }

    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    /// Decides with the thread-local random source.
    pub fn decide(&self, hint: &str, snapshot_json: &str) -> Action {
        self.decide_with(hint, snapshot_json, &mut ThreadRandom::new())
    }

    /// Decides from a JSON snapshot with an explicit random source.
    pub fn decide_with(&self, hint: &str, snapshot_json: &str, rng: &mut dyn RandomSource) -> Action {
        match WorldSnapshot::from_json(snapshot_json) {
            Ok(snapshot) => self.decide_snapshot(hint, &snapshot, rng),
            Err(error) => {
                tracing::warn!(%error, "malformed snapshot, idling");
                Action::Idle
            }
        }
    }

    /// Decides from an already parsed snapshot.
    pub fn decide_snapshot(
        &self,
        hint: &str,
        snapshot: &WorldSnapshot,
        rng: &mut dyn RandomSource,
    ) -> Action {
        let _span =
            tracing::debug_span!("decide", agent = %snapshot.me.id, frame = ?snapshot.frame)
                .entered();

        let Some(ctx) = DecisionContext::new(snapshot) else {
            tracing::debug!("no enemy in view, idling");
            return Action::Idle;
        };

        let strategy = Strategy::route(hint, snapshot);
        tracing::debug!(
            %strategy,
            distance = ctx.distance(),
            hp_ratio = ctx.hp_ratio(),
            "deciding"
        );

        let action = match strategy {
            Strategy::StateMachine => self.memory.with(&snapshot.me.id, |memory| {
                self.machine.run(&ctx, memory, &self.config, rng)
            }),
            Strategy::Personality => {
                let weights = ProfileWeights::from_traits(ctx.traits());
                ActionScorer::select(&ctx, &weights, &self.config, rng).0
            }
            Strategy::Profile(profile) => {
                ActionScorer::select(&ctx, &profile.into(), &self.config, rng).0
            }
            Strategy::Sampled => {
                let weights = ProfileWeights::of(Profile::Aggressive);
                ActionScorer::select_top_k(&ctx, &weights, self.config.top_k, rng)
            }
        };

        tracing::debug!(%action, "decided");
        action
    }

    /// Drops the state machine memory of a fighter. Returns whether any was
    /// held.
    pub fn forget(&self, id: &AgentId) -> bool {
        self.memory.forget(id).is_some()
    }
}

static DEFAULT_AI: LazyLock<CombatAi> = LazyLock::new(|| {
    let config = AiConfig::default().with_env_overrides();
    tracing::debug!(?config, "initializing default combat AI");
    CombatAi::new(config)
});

/// Decides the next action for one fighter.
///
/// `hint` is the engine's strategy name; `snapshot_json` one serialized world
/// snapshot. Never fails: unusable input yields [`Action::Idle`].
pub fn decide(hint: &str, snapshot_json: &str) -> Action {
    DEFAULT_AI.decide(hint, snapshot_json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::SkillSlot;
    use crate::rng::PcgRandom;
    use crate::snapshot::{Fighter, Personality, SelfState, SkillInfo};

    fn base() -> WorldSnapshot {
        WorldSnapshot::new(SelfState::new("a", 0.0, 0.0, 100.0, 100.0))
            .with_enemy(Fighter::at(100.0, 0.0, 100.0))
    }

    #[test]
    fn routing_prefers_skills_then_personality_then_hint() {
        let with_skills = base().with_skill(SkillSlot::Light, SkillInfo::ready(60.0, 0.0));
        assert_eq!(Strategy::route("aggressive", &with_skills), Strategy::StateMachine);

        let with_traits = base().with_personality(Personality::default());
        assert_eq!(Strategy::route("aggressive", &with_traits), Strategy::Personality);

        assert_eq!(
            Strategy::route("defensive", &base()),
            Strategy::Profile(Profile::Defensive)
        );
        assert_eq!(Strategy::route("Defensive", &base()), Strategy::Sampled);
        assert_eq!(Strategy::route(" aggressive", &base()), Strategy::Sampled);
        assert_eq!(Strategy::route("random", &base()), Strategy::Sampled);
        assert_eq!(Strategy::route("neutral", &base()), Strategy::Sampled);
        assert_eq!(Strategy::route("", &base()), Strategy::Sampled);
    }

    #[test]
    fn skills_without_fighter_id_skip_the_state_machine() {
        let anonymous = WorldSnapshot::new(SelfState::new("", 0.0, 0.0, 100.0, 100.0))
            .with_enemy(Fighter::at(100.0, 0.0, 100.0))
            .with_skill(SkillSlot::Light, SkillInfo::ready(60.0, 0.0));
        assert_eq!(Strategy::route("aggressive", &anonymous), Strategy::Personality);

        let ai = CombatAi::default();
        ai.decide_snapshot("aggressive", &anonymous, &mut PcgRandom::new(3));
        assert!(ai.memory().is_empty());
    }

    #[test]
    fn strategy_names_render() {
        assert_eq!(Strategy::StateMachine.to_string(), "state_machine");
        assert_eq!(Strategy::Profile(Profile::Aggressive).to_string(), "profile:aggressive");
    }

    #[test]
    fn malformed_json_idles() {
        let ai = CombatAi::default();
        let mut rng = PcgRandom::new(1);
        assert_eq!(ai.decide_with("aggressive", "{not json", &mut rng), Action::Idle);
        assert_eq!(ai.decide_with("aggressive", r#"{"closestEnemy":{}}"#, &mut rng), Action::Idle);
    }

    #[test]
    fn missing_enemy_idles_without_memory() {
        let ai = CombatAi::default();
        let lonely = WorldSnapshot::new(SelfState::new("a", 0.0, 0.0, 100.0, 100.0))
            .with_skill(SkillSlot::Light, SkillInfo::ready(60.0, 0.0));

        let action = ai.decide_snapshot("random", &lonely, &mut PcgRandom::new(3));

        assert_eq!(action, Action::Idle);
        assert!(ai.memory().is_empty());
    }

    #[test]
    fn forget_reports_held_memory() {
        let ai = CombatAi::default();
        let armed = base().with_skill(SkillSlot::Light, SkillInfo::ready(60.0, 0.0));
        ai.decide_snapshot("random", &armed, &mut PcgRandom::new(3));

        assert!(ai.forget(&AgentId::from("a")));
        assert!(!ai.forget(&AgentId::from("a")));
    }
}
