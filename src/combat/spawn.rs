//! Combat domain: enemy spawning helpers.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::combat::components::{Enemy, EnemyCombat};
use crate::combat::enemy::EnemyMotor;
use crate::content::EnemyDef;
use crate::movement::{GameLayer, capsule};

/// Bundle for spawning an enemy from its content definition
#[derive(Bundle)]
pub struct EnemyBundle {
    pub enemy: Enemy,
    pub name: Name,
    pub combat: EnemyCombat,
    pub motor: EnemyMotor,
    pub sprite: Sprite,
    pub transform: Transform,
    pub rigid_body: RigidBody,
    pub collider: Collider,
    pub collision_layers: CollisionLayers,
    pub velocity: LinearVelocity,
    pub locked_axes: LockedAxes,
    pub friction: Friction,
}

impl EnemyBundle {
    pub fn new(def: &EnemyDef, position: Vec2, disable_timeout: f32) -> Self {
        Self {
            enemy: Enemy,
            name: Name::new(def.name.clone()),
            combat: EnemyCombat::new(def.stats.clone()),
            motor: EnemyMotor::new(def.motor.clone(), disable_timeout),
            sprite: Sprite {
                color: Color::srgb(def.color.0, def.color.1, def.color.2),
                custom_size: Some(def.size),
                ..default()
            },
            transform: Transform::from_xyz(position.x, position.y, 0.5),
            rigid_body: RigidBody::Dynamic,
            collider: capsule(def.size),
            collision_layers: CollisionLayers::new(
                GameLayer::Enemy,
                [GameLayer::Ground, GameLayer::Wall],
            ),
            velocity: LinearVelocity::default(),
            locked_axes: LockedAxes::ROTATION_LOCKED,
            friction: Friction::new(0.0),
        }
    }
}
