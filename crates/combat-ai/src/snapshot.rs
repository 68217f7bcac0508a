//! World snapshot supplied by the engine every tick.
//!
//! The engine serializes one snapshot per fighter per tick. Field names are
//! camelCase on the wire; the engine's short energy names (`en`, `maxEn`) are
//! accepted as aliases. Everything except `self` is optional and resolved to
//! documented defaults.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::action::SkillSlot;
use crate::error::SnapshotError;

/// Stable identifier of a fighter, used to key persistent FSM memory.
///
/// The engine sends either strings (`"F3k9x"`) or numbers; both are kept as
/// their textual form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl<'de> Deserialize<'de> for AgentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Int(i64),
            Float(f64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => AgentId(s),
            RawId::Int(n) => AgentId(n.to_string()),
            RawId::Float(f) => AgentId(f.to_string()),
        })
    }
}

/// The deciding fighter's own state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfState {
    #[serde(default)]
    pub id: AgentId,
    pub x: f64,
    pub y: f64,
    pub hp: f64,
    #[serde(default = "default_pool")]
    pub max_hp: f64,
    #[serde(default = "default_pool", alias = "en")]
    pub energy: f64,
    #[serde(default = "default_pool", alias = "maxEn")]
    pub max_energy: f64,
}

impl SelfState {
    pub fn new(id: impl Into<AgentId>, x: f64, y: f64, hp: f64, max_hp: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            hp,
            max_hp,
            energy: DEFAULT_POOL,
            max_energy: DEFAULT_POOL,
        }
    }

    pub fn with_energy(mut self, energy: f64, max_energy: f64) -> Self {
        self.energy = energy;
        self.max_energy = max_energy;
        self
    }
}

/// Nearest enemy or ally as seen from the deciding fighter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fighter {
    #[serde(default)]
    pub id: Option<AgentId>,
    pub x: f64,
    pub y: f64,
    pub hp: f64,
    /// Distance reported by the engine. Informational only; decisions
    /// recompute it from positions.
    #[serde(default, alias = "dist")]
    pub distance: Option<f64>,
}

impl Fighter {
    pub fn at(x: f64, y: f64, hp: f64) -> Self {
        Self {
            id: None,
            x,
            y,
            hp,
            distance: None,
        }
    }
}

/// Metadata for one skill slot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SkillInfo {
    pub valid: bool,
    pub range: f64,
    pub cost: f64,
    pub is_ready: bool,
}

impl SkillInfo {
    /// Range assumed for a slot the engine did not describe.
    pub const DEFAULT_RANGE: f64 = 50.0;

    pub const fn ready(range: f64, cost: f64) -> Self {
        Self {
            valid: true,
            range,
            cost,
            is_ready: true,
        }
    }
}

impl Default for SkillInfo {
    fn default() -> Self {
        Self {
            valid: false,
            range: Self::DEFAULT_RANGE,
            cost: 0.0,
            is_ready: false,
        }
    }
}

/// Named personality traits on a 0..=10 scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Personality {
    pub aggression: f64,
    pub teamplay: f64,
    pub risk_taking: f64,
    pub positioning: f64,
    pub energy_management: f64,
}

impl Personality {
    pub const NEUTRAL: f64 = 5.0;
    pub const MAX: f64 = 10.0;

    /// Copy with every trait clamped into `[0, 10]`.
    pub fn clamped(self) -> Self {
        let c = |v: f64| v.clamp(0.0, Self::MAX);
        Self {
            aggression: c(self.aggression),
            teamplay: c(self.teamplay),
            risk_taking: c(self.risk_taking),
            positioning: c(self.positioning),
            energy_management: c(self.energy_management),
        }
    }

    fn values(&self) -> [f64; 5] {
        [
            self.aggression,
            self.teamplay,
            self.risk_taking,
            self.positioning,
            self.energy_management,
        ]
    }
}

impl Default for Personality {
    fn default() -> Self {
        Self {
            aggression: Self::NEUTRAL,
            teamplay: Self::NEUTRAL,
            risk_taking: Self::NEUTRAL,
            positioning: Self::NEUTRAL,
            energy_management: Self::NEUTRAL,
        }
    }
}

/// Resolved skill metadata for all four slots.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SkillTable {
    slots: [SkillInfo; SkillSlot::COUNT],
}

impl SkillTable {
    /// Resolves the wire map. Unknown slot names are ignored and absent
    /// slots take [`SkillInfo::default`].
    pub fn from_map(map: &HashMap<String, SkillInfo>) -> Self {
        let mut table = Self::default();
        for (name, info) in map {
            match name.parse::<SkillSlot>() {
                Ok(slot) => table.slots[slot.as_index()] = *info,
                Err(_) => tracing::trace!(slot = %name, "ignoring unknown skill slot"),
            }
        }
        table
    }

    pub fn with(mut self, slot: SkillSlot, info: SkillInfo) -> Self {
        self.slots[slot.as_index()] = info;
        self
    }

    #[inline]
    pub fn get(&self, slot: SkillSlot) -> &SkillInfo {
        &self.slots[slot.as_index()]
    }
}

/// Everything the engine reports for one fighter on one tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSnapshot {
    #[serde(rename = "self")]
    pub me: SelfState,
    #[serde(default)]
    pub closest_enemy: Option<Fighter>,
    #[serde(default)]
    pub closest_ally: Option<Fighter>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cooldowns: HashMap<String, f64>,
    #[serde(default)]
    pub skills: Option<HashMap<String, SkillInfo>>,
    #[serde(default)]
    pub personality: Option<Personality>,
    /// Engine tick counter. Logged only; the engine's counter is a signed
    /// 32-bit value and may be negative.
    #[serde(default)]
    pub frame: Option<i64>,
}

impl WorldSnapshot {
    pub fn new(me: SelfState) -> Self {
        Self {
            me,
            closest_enemy: None,
            closest_ally: None,
            cooldowns: HashMap::new(),
            skills: None,
            personality: None,
            frame: None,
        }
    }

    /// Parses and validates a serialized snapshot.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: WorldSnapshot = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn with_enemy(mut self, enemy: Fighter) -> Self {
        self.closest_enemy = Some(enemy);
        self
    }

    pub fn with_ally(mut self, ally: Fighter) -> Self {
        self.closest_ally = Some(ally);
        self
    }

    pub fn with_cooldown(mut self, key: &str, remaining: f64) -> Self {
        self.cooldowns.insert(key.to_owned(), remaining);
        self
    }

    pub fn with_skill(mut self, slot: SkillSlot, info: SkillInfo) -> Self {
        self.skills
            .get_or_insert_with(HashMap::new)
            .insert(slot.to_string(), info);
        self
    }

    pub fn with_personality(mut self, personality: Personality) -> Self {
        self.personality = Some(personality);
        self
    }

    /// Remaining cooldown for a key; missing keys are ready.
    pub fn cooldown(&self, key: &str) -> f64 {
        self.cooldowns.get(key).copied().unwrap_or(0.0)
    }

    /// Resolved skill table, or `None` when the engine sent no skill data.
    pub fn skill_table(&self) -> Option<SkillTable> {
        self.skills.as_ref().map(SkillTable::from_map)
    }

    /// Rejects values the decision logic cannot reason about.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let me = &self.me;
        finite("self", &[me.x, me.y, me.hp, me.max_hp, me.energy, me.max_energy])?;
        if me.max_hp <= 0.0 {
            return Err(SnapshotError::InvalidField {
                field: "self.maxHp",
                reason: "must be positive",
            });
        }
        if me.max_energy <= 0.0 {
            return Err(SnapshotError::InvalidField {
                field: "self.maxEnergy",
                reason: "must be positive",
            });
        }
        if let Some(enemy) = &self.closest_enemy {
            finite("closestEnemy", &[enemy.x, enemy.y, enemy.hp])?;
        }
        if let Some(ally) = &self.closest_ally {
            finite("closestAlly", &[ally.x, ally.y, ally.hp])?;
        }
        if self.cooldowns.values().any(|v| !v.is_finite()) {
            return Err(not_finite("cooldowns"));
        }
        if let Some(skills) = &self.skills {
            if skills.values().any(|s| !s.range.is_finite() || !s.cost.is_finite()) {
                return Err(not_finite("skills"));
            }
        }
        if let Some(personality) = &self.personality {
            finite("personality", &personality.values())?;
        }
        Ok(())
    }
}

const DEFAULT_POOL: f64 = 100.0;

fn default_pool() -> f64 {
    DEFAULT_POOL
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn finite(field: &'static str, values: &[f64]) -> Result<(), SnapshotError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(not_finite(field))
    }
}

fn not_finite(field: &'static str) -> SnapshotError {
    SnapshotError::InvalidField {
        field,
        reason: "contains a non-finite number",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_engine_snapshot_with_short_energy_names() {
        let raw = json!({
            "self": { "id": "F1", "teamId": 1, "x": 10, "y": 20, "vx": 0, "vy": 0,
                      "hp": 80, "maxHp": 100, "en": 40, "maxEn": 120, "state": "idle" },
            "closestEnemy": { "id": "F2", "x": 110, "y": 20, "hp": 90 },
            "closestAlly": null,
            "cooldowns": { "heal": 0, "dash": 0.5 },
            "env": { "arena": { "w": 1280 } },
            "frame": 321
        });

        let snapshot = WorldSnapshot::from_json(&raw.to_string()).unwrap();
        assert_eq!(snapshot.me.id.as_str(), "F1");
        assert_eq!(snapshot.me.energy, 40.0);
        assert_eq!(snapshot.me.max_energy, 120.0);
        assert_eq!(snapshot.cooldown("dash"), 0.5);
        assert_eq!(snapshot.cooldown("spin"), 0.0);
        assert!(snapshot.closest_ally.is_none());
        assert!(snapshot.skills.is_none());
        assert_eq!(snapshot.frame, Some(321));
    }

    #[test]
    fn null_cooldowns_and_negative_frame_are_accepted() {
        let raw = json!({
            "self": { "id": "F1", "x": 0, "y": 0, "hp": 50 },
            "closestEnemy": { "x": 80, "y": 0, "hp": 100 },
            "cooldowns": null,
            "frame": -1
        });
        let snapshot = WorldSnapshot::from_json(&raw.to_string()).unwrap();

        assert!(snapshot.cooldowns.is_empty());
        assert_eq!(snapshot.cooldown("heal"), 0.0);
        assert_eq!(snapshot.frame, Some(-1));
    }

    #[test]
    fn missing_energy_defaults_to_full_pool() {
        let raw = json!({ "self": { "x": 0, "y": 0, "hp": 50, "maxHp": 100 } });
        let snapshot = WorldSnapshot::from_json(&raw.to_string()).unwrap();
        assert_eq!(snapshot.me.energy, 100.0);
        assert_eq!(snapshot.me.max_energy, 100.0);
        assert!(snapshot.me.id.is_empty());
        assert!(snapshot.closest_enemy.is_none());
    }

    #[test]
    fn numeric_ids_keep_their_text() {
        let raw = json!({ "self": { "id": 7, "x": 0, "y": 0, "hp": 1 } });
        let snapshot = WorldSnapshot::from_json(&raw.to_string()).unwrap();
        assert_eq!(snapshot.me.id, AgentId::new("7"));
    }

    #[test]
    fn skill_table_fills_absent_slots_with_defaults() {
        let raw = json!({
            "self": { "x": 0, "y": 0, "hp": 1 },
            "skills": {
                "heavy": { "valid": true, "range": 90, "cost": 15, "isReady": true },
                "ultimate": { "valid": true, "range": 500 }
            }
        });
        let snapshot = WorldSnapshot::from_json(&raw.to_string()).unwrap();
        let table = snapshot.skill_table().unwrap();

        assert_eq!(*table.get(SkillSlot::Heavy), SkillInfo::ready(90.0, 15.0));
        assert_eq!(*table.get(SkillSlot::Light), SkillInfo::default());
        assert_eq!(table.get(SkillSlot::Spin).range, 50.0);
        assert!(!table.get(SkillSlot::Heal).valid);
    }

    #[test]
    fn partial_personality_defaults_to_neutral() {
        let raw = json!({
            "self": { "x": 0, "y": 0, "hp": 1 },
            "personality": { "aggression": 14, "riskTaking": 2 }
        });
        let snapshot = WorldSnapshot::from_json(&raw.to_string()).unwrap();
        let traits = snapshot.personality.unwrap().clamped();

        assert_eq!(traits.aggression, 10.0);
        assert_eq!(traits.risk_taking, 2.0);
        assert_eq!(traits.teamplay, 5.0);
    }

    #[test]
    fn rejects_garbage_and_missing_self() {
        assert!(matches!(
            WorldSnapshot::from_json("not json"),
            Err(SnapshotError::Parse(_))
        ));
        assert!(matches!(
            WorldSnapshot::from_json(r#"{"closestEnemy":{"x":0,"y":0,"hp":1}}"#),
            Err(SnapshotError::Parse(_))
        ));
        assert!(matches!(
            WorldSnapshot::from_json(r#"{"self":{"x":"left","y":0,"hp":1}}"#),
            Err(SnapshotError::Parse(_))
        ));
    }

    #[test]
    fn rejects_non_positive_pools() {
        let raw = json!({ "self": { "x": 0, "y": 0, "hp": 1, "maxHp": 0 } });
        assert!(matches!(
            WorldSnapshot::from_json(&raw.to_string()),
            Err(SnapshotError::InvalidField { field: "self.maxHp", .. })
        ));
    }

    #[test]
    fn validate_catches_non_finite_values() {
        let snapshot = WorldSnapshot::new(SelfState::new("a", 0.0, 0.0, 50.0, 100.0))
            .with_enemy(Fighter::at(f64::NAN, 0.0, 10.0));
        assert!(snapshot.validate().is_err());

        let snapshot = WorldSnapshot::new(SelfState::new("a", 0.0, 0.0, 50.0, 100.0))
            .with_cooldown("heal", f64::INFINITY);
        assert!(snapshot.validate().is_err());
    }
}
