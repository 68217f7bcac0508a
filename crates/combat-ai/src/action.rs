//! The closed set of action tokens returned to the game engine.

/// A discrete action the engine applies to a fighter for one tick.
///
/// Tokens render and parse as snake_case strings (`attack_light`,
/// `move_away`, ...), which is the wire format the engine consumes.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    /// Do nothing this tick. Also the safe fallback for every failure path.
    #[default]
    Idle,
    Heal,
    Dash,
    Spin,
    AttackHeavy,
    AttackLight,
    MoveTowards,
    MoveAway,
    StrafeLeft,
    StrafeRight,
}

impl Action {
    /// Number of action tokens.
    pub const COUNT: usize = 10;

    /// Utility scorer candidates in evaluation order.
    ///
    /// Ties between equal scores resolve to the earlier entry, so the order
    /// is part of the scoring contract.
    pub const fn candidates() -> [Action; Self::COUNT] {
        [
            Action::Heal,
            Action::Dash,
            Action::Spin,
            Action::AttackHeavy,
            Action::AttackLight,
            Action::MoveTowards,
            Action::MoveAway,
            Action::StrafeLeft,
            Action::StrafeRight,
            Action::Idle,
        ]
    }

    /// Key in the snapshot's `cooldowns` map that gates this action, if any.
    pub const fn cooldown_key(self) -> Option<&'static str> {
        match self {
            Action::Heal => Some("heal"),
            Action::Dash => Some("dash"),
            Action::Spin => Some("spin"),
            Action::AttackHeavy => Some("heavy"),
            Action::AttackLight => Some("light"),
            _ => None,
        }
    }

    /// Skill slot backing this action. Dash and movement have none.
    pub const fn skill_slot(self) -> Option<SkillSlot> {
        match self {
            Action::Heal => Some(SkillSlot::Heal),
            Action::Spin => Some(SkillSlot::Spin),
            Action::AttackHeavy => Some(SkillSlot::Heavy),
            Action::AttackLight => Some(SkillSlot::Light),
            _ => None,
        }
    }

    /// Returns true for the strafe pair.
    pub const fn is_strafe(self) -> bool {
        matches!(self, Action::StrafeLeft | Action::StrafeRight)
    }
}

/// Named skill slot in a fighter's loadout.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SkillSlot {
    Light,
    Heavy,
    Spin,
    Heal,
}

impl SkillSlot {
    pub const COUNT: usize = 4;

    /// Slots that deal damage. Range computations only look at these.
    pub const fn attacks() -> [SkillSlot; 3] {
        [SkillSlot::Light, SkillSlot::Heavy, SkillSlot::Spin]
    }

    #[inline]
    pub const fn as_index(self) -> usize {
        self as usize
    }
}
