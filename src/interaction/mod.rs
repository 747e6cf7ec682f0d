//! Interaction domain: signs, NPCs and anything else behind the interact
//! button.

mod components;
mod systems;

#[cfg(test)]
mod tests;

pub use components::{ActiveInteraction, Interactable, InteractionTarget, Readable};

use bevy::prelude::*;

use crate::interaction::systems::{drive_interactions, start_interactions};
use crate::movement::simulate_controllers;

pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (drive_interactions, start_interactions)
                .chain()
                .after(simulate_controllers),
        );
    }
}
