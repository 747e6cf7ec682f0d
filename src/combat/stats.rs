//! Combat domain: health, invincibility and knockback rules shared by every
//! combatant.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Static combat numbers, loaded from content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatStats {
    pub max_health: i32,
    /// Seconds of invincibility after taking an attack.
    pub invincibility_secs: f32,
    pub base_damage: i32,
    pub base_knockback: Vec2,
}

impl Default for CombatStats {
    fn default() -> Self {
        Self {
            max_health: 5,
            invincibility_secs: 0.25,
            base_damage: 1,
            base_knockback: Vec2::new(5.0, 1.0),
        }
    }
}

/// Runtime health state of one combatant.
#[derive(Debug, Clone, PartialEq)]
pub struct Vitals {
    pub health: i32,
    pub alive: bool,
    pub invincible: bool,
    since_hit: f32,
}

impl Vitals {
    pub fn new(stats: &CombatStats) -> Self {
        Self {
            health: stats.max_health,
            alive: stats.max_health > 0,
            invincible: false,
            since_hit: 0.0,
        }
    }

    /// Damage and knockback are both ignored while this is false.
    pub fn can_be_hit(&self) -> bool {
        self.alive && !self.invincible
    }

    pub fn start_invincibility(&mut self) {
        self.invincible = true;
        self.since_hit = 0.0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Dead or invincible; nothing happened.
    Ignored,
    Hurt { remaining: i32 },
    Killed,
}

pub fn apply_damage(vitals: &mut Vitals, damage: i32) -> DamageOutcome {
    if !vitals.can_be_hit() {
        return DamageOutcome::Ignored;
    }
    vitals.health -= damage;
    if vitals.health <= 0 {
        vitals.alive = false;
        DamageOutcome::Killed
    } else {
        DamageOutcome::Hurt {
            remaining: vitals.health,
        }
    }
}

/// Knockback always lifts, and pushes horizontally away from the source.
/// A source exactly above or below pushes toward negative x.
pub fn knockback_vector(base: Vec2, source: Vec2, target: Vec2) -> Vec2 {
    let x = if source.x - target.x >= 0.0 { -1.0 } else { 1.0 };
    base * Vec2::new(x, 1.0)
}

/// Count down the post-hit invincibility window.
pub fn tick_invincibility(vitals: &mut Vitals, stats: &CombatStats, dt: f32) {
    if !vitals.invincible {
        return;
    }
    if vitals.since_hit > stats.invincibility_secs {
        vitals.invincible = false;
        vitals.since_hit = 0.0;
    } else {
        vitals.since_hit += dt;
    }
}
