//! Movement domain: components and physics layers for locomotion.

use avian2d::prelude::*;
use bevy::prelude::*;

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Floors, platforms and slopes
    Ground,
    /// Climbable walls; also solid
    Wall,
    /// Ladder volumes (sensors)
    Ladder,
    /// Player character
    Player,
    /// Enemy characters
    Enemy,
    /// Signs, NPCs and anything else that answers the interact button
    Interactable,
}

#[derive(Component, Debug)]
pub struct Player;

/// Marker for ground colliders
#[derive(Component, Debug)]
pub struct Ground;

/// Marker for climbable wall colliders
#[derive(Component, Debug)]
pub struct Wall;

/// Marker for ladder volumes
#[derive(Component, Debug)]
pub struct Ladder;

/// Child entity carrying the body's collider and sprite, offset from the
/// feet pivot of its parent.
#[derive(Component, Debug)]
pub struct BodyCollider {
    pub crouching: bool,
}

/// Drives the two ledge-climb callbacks while the climb animation plays.
#[derive(Component, Debug, Default)]
pub struct LedgeClimbTimeline {
    pub ticks: u32,
    pub teleported: bool,
}
