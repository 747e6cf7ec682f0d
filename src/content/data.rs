//! Data definitions for all RON content files.
//!
//! These structs mirror the structure in assets/data/*.ron and are used
//! for deserialization. The ContentRegistry provides lookup by id.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::{CombatStats, MotorTuning};

// ============================================================================
// Common wrapper for RON files with schema_version and items
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataFile<T> {
    pub schema_version: u32,
    pub items: Vec<T>,
}

// ============================================================================
// Enemies (enemies.ron)
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnemyDef {
    pub id: String,
    pub name: String,
    pub size: Vec2,
    pub color: (f32, f32, f32),
    pub stats: CombatStats,
    pub motor: MotorTuning,
}

// ============================================================================
// Gameplay defaults (gameplay_defaults.ron)
// ============================================================================

#[derive(Resource, Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GameplayDefaults {
    pub schema_version: u32,
    /// Fixed simulation rate in ticks per second.
    pub fixed_hz: f64,
    pub player_spawn: Vec2,
    pub player: CombatStats,
    /// Seconds the player stays without control after being knocked back.
    pub hit_stun_secs: f32,
    /// Size of the player's attack box.
    pub attack_box: Vec2,
    /// How far the attack box sweeps in the facing direction.
    pub attack_reach: f32,
    /// Seconds an enemy stays without control after being knocked back.
    pub enemy_disable_timeout: f32,
    pub test_level_enemy: String,
    pub sign_lines: Vec<String>,
}

impl Default for GameplayDefaults {
    fn default() -> Self {
        Self {
            schema_version: 1,
            fixed_hz: 50.0,
            player_spawn: Vec2::new(0.0, 0.5),
            player: CombatStats::default(),
            hit_stun_secs: 0.4,
            attack_box: Vec2::ONE,
            attack_reach: 2.5,
            enemy_disable_timeout: 0.75,
            test_level_enemy: "enemy_slime".to_string(),
            sign_lines: vec!["A sign. It says nothing of note.".to_string()],
        }
    }
}
