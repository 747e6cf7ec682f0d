//! Core domain: game state, camera and service installation.

mod resources;
mod state;
mod systems;


pub use resources::{ServiceError, install_service};
pub use state::GameState;
pub use systems::CameraFollow;

use bevy::prelude::*;

use crate::core::systems::{follow_player, setup_camera};

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .add_systems(Startup, setup_camera)
            .add_systems(Update, follow_player);
    }
}
