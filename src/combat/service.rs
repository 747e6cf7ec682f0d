//! Combat domain: the single entry point for resolving attacks.

use bevy::prelude::*;

use crate::combat::components::{AttackOutcome, Combatant};
use crate::combat::stats::DamageOutcome;

/// Installed once by the combat plugin through `core::install_service`.
#[derive(Resource, Debug, Default)]
pub struct CombatService {
    attacks_dealt: u64,
}

impl CombatService {
    pub fn attacks_dealt(&self) -> u64 {
        self.attacks_dealt
    }

    /// Resolve one attack from `source` onto a receiver standing at
    /// `position`.
    pub fn deal_attack(
        &mut self,
        receiver: &mut dyn Combatant,
        damage: i32,
        knockback: Vec2,
        source: Vec2,
        position: Vec2,
    ) -> AttackOutcome {
        self.attacks_dealt += 1;
        let outcome = receiver.take_attack(damage, knockback, source, position);
        match outcome.damage {
            DamageOutcome::Hurt { remaining } => {
                info!("took {} damage, {} health remaining", damage, remaining)
            }
            DamageOutcome::Killed => info!("took {} damage and died", damage),
            DamageOutcome::Ignored => debug!("attack ignored"),
        }
        outcome
    }
}
