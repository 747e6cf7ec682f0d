//! Movement domain: deterministic fixed-tick character controller.

mod bootstrap;
pub mod classifier;
mod components;
mod controller;
pub mod crouch;
pub mod dash;
#[cfg(feature = "dev-tools")]
mod dev;
mod events;
mod input;
pub mod jump;
pub mod ladder;
pub mod ledge;
pub mod math;
mod query;
mod resources;
mod state;
mod systems;
pub mod velocity;
pub mod wall;

#[cfg(test)]
mod tests;

pub use components::{BodyCollider, GameLayer, Ground, Ladder, LedgeClimbTimeline, Player, Wall};
pub use controller::{CharacterController, TickOutput, UnitForce};
pub use events::{MovementEvent, MovementEventMessage, TickEvents};
pub use input::{FrameInput, RawInput};
pub use query::{
    ColliderId, FrameQueryCache, OverlapHit, QueryFilter, RayHit, ShapeHit, ShapeQuery,
};
pub use resources::{ColliderShape, LatchedInput, MovementTuning, TuningWarning};
pub use state::{Facing, KinematicState};
pub use systems::{AvianShapeQuery, collider_entity};
pub(crate) use systems::{ColliderPose, capsule, simulate_controllers};

use bevy::prelude::*;

use crate::content::load_content;
use crate::movement::bootstrap::{spawn_player, spawn_test_level};
use crate::movement::systems::{
    advance_ledge_climbs, begin_ledge_climbs, log_movement_events, read_input, sync_body_pose,
};

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementTuning>()
            .init_resource::<LatchedInput>()
            .add_message::<MovementEventMessage>()
            .add_systems(Startup, (spawn_test_level, spawn_player).after(load_content))
            .add_systems(Update, read_input)
            .add_systems(
                FixedUpdate,
                (
                    simulate_controllers,
                    begin_ledge_climbs,
                    advance_ledge_climbs,
                    sync_body_pose,
                    log_movement_events,
                )
                    .chain(),
            );

        #[cfg(feature = "dev-tools")]
        app.init_resource::<dev::DetectorOverlay>().add_systems(
            Update,
            (dev::toggle_detector_overlay, dev::draw_detectors).chain(),
        );
    }
}
