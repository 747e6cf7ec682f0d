//! Combat domain: damage, knockback and the enemies that deal it.

mod components;
mod enemy;
mod events;
mod service;
mod spawn;
mod stats;
mod systems;

#[cfg(test)]
mod tests;

pub use components::{AttackOutcome, Combatant, Enemy, EnemyCombat, HitStun, PlayerCombat};
pub use enemy::{EnemyMotor, MotorSense, MotorTuning};
pub use events::{DamageEvent, DeathEvent};
pub use service::CombatService;
pub use spawn::EnemyBundle;
pub use stats::{
    CombatStats, DamageOutcome, Vitals, apply_damage, knockback_vector, tick_invincibility,
};

use bevy::prelude::*;

use crate::combat::systems::{
    drive_enemy_motors, enemy_attacks, freeze_players, handle_deaths, player_attacks,
    recover_from_hit_stun, tick_combatants,
};
use crate::core::{GameState, install_service};
use crate::movement::simulate_controllers;

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        if let Err(err) = install_service(app, CombatService::default()) {
            warn!("{}", err);
        }

        app.add_message::<DamageEvent>()
            .add_message::<DeathEvent>()
            .add_systems(
                FixedUpdate,
                (
                    tick_combatants::<PlayerCombat>,
                    tick_combatants::<EnemyCombat>,
                    drive_enemy_motors,
                    player_attacks,
                    enemy_attacks,
                    recover_from_hit_stun,
                    handle_deaths,
                )
                    .chain()
                    .after(simulate_controllers)
                    .run_if(in_state(GameState::Alive)),
            )
            .add_systems(OnEnter(GameState::Dead), freeze_players);
    }
}
