//! Movement domain: system modules bridging the controller to bevy and avian.

pub(crate) mod animation;
pub(crate) mod input;
pub(crate) mod presentation;
pub(crate) mod simulation;
pub(crate) mod spatial;

pub(crate) use animation::{advance_ledge_climbs, begin_ledge_climbs};
pub(crate) use input::read_input;
pub(crate) use presentation::{log_movement_events, sync_body_pose};
pub(crate) use simulation::simulate_controllers;
pub use spatial::{AvianShapeQuery, collider_entity};
pub(crate) use spatial::{ColliderPose, capsule};
