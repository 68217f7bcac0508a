//! Per-tick combat decisions for arena fighters.
//!
//! The engine calls [`decide`] once per fighter per tick with a strategy hint
//! and a JSON [`WorldSnapshot`]; the crate answers with one [`Action`].
//!
//! Two decision makers sit behind the dispatcher:
//! - [`scoring`] scores every candidate action from the snapshot alone
//!   (stateless, optionally jittered);
//! - [`fsm`] drives a persistent four-state controller per fighter, used when
//!   the snapshot carries skill metadata.
//!
//! Supporting modules:
//! - [`snapshot`] and [`context`] model the input and per-call derived data
//! - [`legality`] and [`geometry`] hold the shared gating and vector helpers
//! - [`config`] loads tunables from TOML and the environment
//! - [`rng`] abstracts randomness so outcomes can be pinned in tests
pub mod action;
pub mod config;
pub mod context;
pub mod decider;
pub mod error;
pub mod fsm;
pub mod geometry;
pub mod legality;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use action::{Action, SkillSlot};
pub use config::{AiConfig, TickRange};
pub use context::DecisionContext;
pub use decider::{CombatAi, Strategy, decide};
pub use error::{ConfigError, SnapshotError};
pub use fsm::{AgentMemory, MemoryStore, StateId, StateLogic, StateMachine, StateTable, Step};
pub use rng::{PcgRandom, RandomSource, ThreadRandom};
pub use scoring::selector::ActionScorer;
pub use scoring::{Profile, ProfileWeights, Score};
pub use snapshot::{AgentId, Fighter, Personality, SelfState, SkillInfo, SkillTable, WorldSnapshot};
