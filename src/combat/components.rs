//! Combat domain: combatant components and the capability they share.

use bevy::prelude::*;

use crate::combat::stats::{
    CombatStats, DamageOutcome, Vitals, apply_damage, knockback_vector, tick_invincibility,
};

/// What one attack did to its receiver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackOutcome {
    pub damage: DamageOutcome,
    /// Velocity to throw the receiver with, if it could be knocked back.
    pub knockback: Option<Vec2>,
}

/// Anything that can be hit. Implementors only expose their numbers; the
/// rules live in the provided methods.
pub trait Combatant {
    fn stats(&self) -> &CombatStats;
    fn vitals(&self) -> &Vitals;
    fn vitals_mut(&mut self) -> &mut Vitals;

    fn take_damage(&mut self, damage: i32) -> DamageOutcome {
        apply_damage(self.vitals_mut(), damage)
    }

    /// `None` when the receiver is dead or invincible.
    fn take_knockback(&self, knockback: Vec2, source: Vec2, position: Vec2) -> Option<Vec2> {
        self.vitals()
            .can_be_hit()
            .then(|| knockback_vector(knockback, source, position))
    }

    /// Damage, then knockback, then invincibility. A killing blow yields no
    /// knockback.
    fn take_attack(
        &mut self,
        damage: i32,
        knockback: Vec2,
        source: Vec2,
        position: Vec2,
    ) -> AttackOutcome {
        let damage = self.take_damage(damage);
        let knockback = self.take_knockback(knockback, source, position);
        self.vitals_mut().start_invincibility();
        AttackOutcome { damage, knockback }
    }

    fn tick(&mut self, dt: f32) {
        let stats = self.stats().clone();
        tick_invincibility(self.vitals_mut(), &stats, dt);
    }
}

macro_rules! combatant_component {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Component, Debug, Clone)]
        pub struct $name {
            stats: CombatStats,
            vitals: Vitals,
        }

        impl $name {
            pub fn new(stats: CombatStats) -> Self {
                let vitals = Vitals::new(&stats);
                Self { stats, vitals }
            }
        }

        impl Combatant for $name {
            fn stats(&self) -> &CombatStats {
                &self.stats
            }

            fn vitals(&self) -> &Vitals {
                &self.vitals
            }

            fn vitals_mut(&mut self) -> &mut Vitals {
                &mut self.vitals
            }
        }
    };
}

combatant_component!(
    /// The player's side of combat; movement is the character controller.
    PlayerCombat
);

combatant_component!(EnemyCombat);

/// Marker for enemy bodies
#[derive(Component, Debug)]
pub struct Enemy;

/// Hands control back to the player's controller once it runs out.
#[derive(Component, Debug)]
pub struct HitStun {
    pub timer: f32,
}

impl HitStun {
    pub fn new(secs: f32) -> Self {
        Self { timer: secs }
    }

    /// Returns true once the stun has run out.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.timer -= dt;
        self.timer <= 0.0
    }
}
