//! Per-call decision context.
//!
//! [`DecisionContext`] is derived from one [`WorldSnapshot`] and discarded when
//! the call returns. It caches the values every strategy needs (distance to
//! the enemy, HP and energy ratios, resolved traits and skills) and answers
//! legality questions.
//!
//! The context deliberately holds no reference to persistent agent memory:
//! the state machine receives that as a separate `&mut` borrow, so the
//! utility scorer cannot reach it.

use crate::action::{Action, SkillSlot};
use crate::geometry::{Vector, vector_to};
use crate::legality;
use crate::snapshot::{Fighter, Personality, SkillInfo, SkillTable, WorldSnapshot};

pub struct DecisionContext<'a> {
    snapshot: &'a WorldSnapshot,
    enemy: &'a Fighter,
    to_enemy: Vector,
    hp_ratio: f64,
    energy_ratio: f64,
    traits: Personality,
    skills: Option<SkillTable>,
}

impl<'a> DecisionContext<'a> {
    /// Builds the context, or returns `None` when there is no enemy to
    /// decide against.
    pub fn new(snapshot: &'a WorldSnapshot) -> Option<Self> {
        let enemy = snapshot.closest_enemy.as_ref()?;
        let me = &snapshot.me;

        Some(Self {
            snapshot,
            enemy,
            to_enemy: vector_to(me.x, me.y, enemy.x, enemy.y),
            hp_ratio: me.hp / me.max_hp,
            energy_ratio: me.energy / me.max_energy,
            traits: snapshot.personality.unwrap_or_default().clamped(),
            skills: snapshot.skill_table(),
        })
    }

    pub fn snapshot(&self) -> &WorldSnapshot {
        self.snapshot
    }

    pub fn enemy(&self) -> &Fighter {
        self.enemy
    }

    /// Euclidean distance to the closest enemy.
    #[inline]
    pub fn distance(&self) -> f64 {
        self.to_enemy.distance
    }

    /// Bearing to the closest enemy in radians.
    #[inline]
    pub fn bearing(&self) -> f64 {
        self.to_enemy.angle
    }

    #[inline]
    pub fn hp_ratio(&self) -> f64 {
        self.hp_ratio
    }

    #[inline]
    pub fn energy_ratio(&self) -> f64 {
        self.energy_ratio
    }

    #[inline]
    pub fn energy(&self) -> f64 {
        self.snapshot.me.energy
    }

    /// Enemy HP measured against the deciding fighter's own max HP.
    ///
    /// Snapshots do not carry the enemy's max HP, so this is the ratio the
    /// finisher bonus has always used.
    pub fn enemy_hp_ratio(&self) -> f64 {
        self.enemy.hp / self.snapshot.me.max_hp
    }

    /// Resolved personality (defaults to 5 per trait, clamped to 0..=10).
    #[inline]
    pub fn traits(&self) -> &Personality {
        &self.traits
    }

    /// Resolved skill table, `None` for cooldown-only snapshots.
    pub fn skills(&self) -> Option<&SkillTable> {
        self.skills.as_ref()
    }

    /// Metadata for one slot, `None` for cooldown-only snapshots.
    pub fn skill(&self, slot: SkillSlot) -> Option<&SkillInfo> {
        self.skills.as_ref().map(|table| table.get(slot))
    }

    /// Remaining cooldown gating `action` (0 when ungated).
    pub fn cooldown(&self, action: Action) -> f64 {
        action
            .cooldown_key()
            .map(|key| self.snapshot.cooldown(key))
            .unwrap_or(0.0)
    }

    /// Full legality check: cooldown plus skill metadata when present.
    pub fn is_legal(&self, action: Action) -> bool {
        let skill = action.skill_slot().and_then(|slot| self.skill(slot));
        legality::is_legal(self.cooldown(action), skill, self.energy())
    }

    /// Energy cost of the slot backing `action`, 0 when unknown.
    pub fn cost(&self, action: Action) -> f64 {
        action
            .skill_slot()
            .and_then(|slot| self.skill(slot))
            .map(|skill| skill.cost)
            .unwrap_or(0.0)
    }

    /// Range of the slot backing `action`, falling back to the default range.
    pub fn range(&self, action: Action) -> f64 {
        action
            .skill_slot()
            .and_then(|slot| self.skill(slot))
            .map(|skill| skill.range)
            .unwrap_or(SkillInfo::DEFAULT_RANGE)
    }

    /// Longest range among attack skills that are legal right now.
    ///
    /// Falls back to the longest valid attack skill, then to the default
    /// range, so a fighter with everything on cooldown keeps a stable
    /// engagement distance.
    pub fn best_range(&self) -> f64 {
        let legal = SkillSlot::attacks()
            .into_iter()
            .filter_map(|slot| {
                let skill = self.skill(slot)?;
                let cooldown = self.snapshot.cooldown(slot.as_ref());
                legality::is_legal(cooldown, Some(skill), self.energy()).then_some(skill.range)
            })
            .reduce(f64::max);

        legal.unwrap_or_else(|| self.max_range())
    }

    /// Longest range among valid attack skills, ignoring readiness.
    pub fn max_range(&self) -> f64 {
        SkillSlot::attacks()
            .into_iter()
            .filter_map(|slot| self.skill(slot).filter(|s| s.valid).map(|s| s.range))
            .reduce(f64::max)
            .unwrap_or(SkillInfo::DEFAULT_RANGE)
    }

    /// Distance to the closest ally, if one was reported.
    pub fn ally_distance(&self) -> Option<f64> {
        let me = &self.snapshot.me;
        self.snapshot
            .closest_ally
            .as_ref()
            .map(|ally| vector_to(me.x, me.y, ally.x, ally.y).distance)
    }
}
