//! Movement domain: player and test level bootstrap.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::combat::{EnemyBundle, PlayerCombat};
use crate::content::{ContentRegistry, GameplayDefaults};
use crate::interaction::{InteractionTarget, Readable};
use crate::movement::systems::capsule;
use crate::movement::{
    BodyCollider, CharacterController, GameLayer, Ground, Ladder, MovementTuning, Player, Wall,
};

pub(crate) fn spawn_player(
    mut commands: Commands,
    tuning: Res<MovementTuning>,
    defaults: Res<GameplayDefaults>,
) {
    let spawn = defaults.player_spawn;
    let shape = tuning.standing_collider;

    info!("Spawning player at {:?}", spawn);

    commands
        .spawn((
            // Identity & Movement
            (
                Player,
                Name::new("Player"),
                CharacterController::new(spawn, &tuning),
                PlayerCombat::new(defaults.player.clone()),
            ),
            Transform::from_translation(spawn.extend(1.0)),
            Visibility::default(),
            // Physics; the controller owns gravity
            (
                RigidBody::Dynamic,
                LockedAxes::ROTATION_LOCKED,
                LinearVelocity::default(),
                GravityScale(0.0),
            ),
        ))
        .with_children(|body| {
            body.spawn((
                BodyCollider { crouching: false },
                Sprite {
                    color: Color::srgb(0.9, 0.9, 0.9),
                    custom_size: Some(shape.size),
                    ..default()
                },
                Transform::from_translation(shape.offset.extend(0.0)),
                capsule(shape.size),
                Friction::new(0.0),
                CollisionLayers::new(GameLayer::Player, [GameLayer::Ground, GameLayer::Wall]),
            ));
        });
}

fn block(size: Vec2, position: Vec2, color: Color, layers: CollisionLayers) -> impl Bundle {
    (
        Sprite {
            color,
            custom_size: Some(size),
            ..default()
        },
        Transform::from_translation(position.extend(0.0)),
        RigidBody::Static,
        Collider::rectangle(size.x, size.y),
        layers,
    )
}

/// A flat floor, a slope, a climbable tower with a ledge, a wall-jump
/// chimney, a ladder, a sign and one enemy.
pub(crate) fn spawn_test_level(
    mut commands: Commands,
    registry: Res<ContentRegistry>,
    defaults: Res<GameplayDefaults>,
) {
    let wall_color = Color::srgb(0.3, 0.3, 0.4);
    let ground_color = Color::srgb(0.4, 0.5, 0.4);
    let ladder_color = Color::srgba(0.6, 0.45, 0.25, 0.6);

    let ground_layers =
        CollisionLayers::new(GameLayer::Ground, [GameLayer::Player, GameLayer::Enemy]);
    let wall_layers = CollisionLayers::new(GameLayer::Wall, [GameLayer::Player, GameLayer::Enemy]);

    // Floor, top at y = 0
    commands.spawn((
        Ground,
        block(Vec2::new(64.0, 1.0), Vec2::new(0.0, -0.5), ground_color, ground_layers),
    ));

    // Slope
    commands.spawn((
        Ground,
        Sprite {
            color: ground_color,
            custom_size: Some(Vec2::new(8.0, 0.5)),
            ..default()
        },
        Transform::from_xyz(-12.0, 1.0, 0.0).with_rotation(Quat::from_rotation_z(-0.3)),
        RigidBody::Static,
        Collider::rectangle(8.0, 0.5),
        ground_layers,
    ));

    // Outer walls
    for x in [-32.5, 32.5] {
        commands.spawn((
            Wall,
            block(Vec2::new(1.0, 20.0), Vec2::new(x, 10.0), wall_color, wall_layers),
        ));
    }

    // Tower with a ledge at y = 4
    commands.spawn((
        Wall,
        block(Vec2::new(2.0, 4.0), Vec2::new(8.0, 2.0), wall_color, wall_layers),
    ));

    // Wall-jump chimney
    for x in [14.0, 18.0] {
        commands.spawn((
            Wall,
            block(Vec2::new(1.0, 10.0), Vec2::new(x, 6.0), wall_color, wall_layers),
        ));
    }

    // Ladder up to a platform
    commands.spawn((
        Ladder,
        Sprite {
            color: ladder_color,
            custom_size: Some(Vec2::new(1.0, 6.0)),
            ..default()
        },
        Transform::from_xyz(-4.0, 3.0, -0.1),
        RigidBody::Static,
        Collider::rectangle(1.0, 6.0),
        Sensor,
        CollisionLayers::new(GameLayer::Ladder, [GameLayer::Player]),
    ));
    commands.spawn((
        Ground,
        block(Vec2::new(4.0, 0.5), Vec2::new(-6.5, 5.75), ground_color, ground_layers),
    ));

    // Sign
    commands.spawn((
        Name::new("Sign"),
        InteractionTarget::new(Readable::new(defaults.sign_lines.clone())),
        Sprite {
            color: Color::srgb(0.7, 0.6, 0.3),
            custom_size: Some(Vec2::new(1.0, 1.5)),
            ..default()
        },
        Transform::from_xyz(3.0, 0.75, -0.1),
        RigidBody::Static,
        Collider::rectangle(1.0, 1.5),
        Sensor,
        CollisionLayers::new(GameLayer::Interactable, [GameLayer::Player]),
    ));

    match registry.enemies.get(&defaults.test_level_enemy) {
        Some(def) => {
            commands.spawn(EnemyBundle::new(
                def,
                Vec2::new(-22.0, def.size.y * 0.5 + 0.1),
                defaults.enemy_disable_timeout,
            ));
        }
        None => warn!(
            "Enemy '{}' not found in registry, test level has no enemy",
            defaults.test_level_enemy
        ),
    }
}
