//! Combat domain: attack resolution, enemy motors and death handling.

use avian2d::prelude::*;
use bevy::ecs::component::Mutable;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::combat::components::{Combatant, Enemy, EnemyCombat, HitStun, PlayerCombat};
use crate::combat::enemy::{EnemyMotor, MotorSense};
use crate::combat::events::{DamageEvent, DeathEvent};
use crate::combat::service::CombatService;
use crate::combat::stats::DamageOutcome;
use crate::content::GameplayDefaults;
use crate::core::GameState;
use crate::movement::{
    AvianShapeQuery, CharacterController, ColliderPose, Facing, GameLayer, MovementEvent,
    MovementEventMessage, MovementTuning, Player, QueryFilter, ShapeQuery,
};

/// Upper bound on enemies one swing can reach.
const MAX_ATTACK_TARGETS: u32 = 8;

pub(crate) fn tick_combatants<T>(time: Res<Time>, mut query: Query<&mut T>)
where
    T: Component<Mutability = Mutable> + Combatant,
{
    let dt = time.delta_secs();
    for mut combatant in &mut query {
        combatant.tick(dt);
    }
}

pub(crate) fn drive_enemy_motors(
    time: Res<Time>,
    spatial: SpatialQuery,
    colliders: Query<ColliderPose>,
    mut enemies: Query<
        (
            Entity,
            &mut EnemyMotor,
            &Transform,
            &mut LinearVelocity,
            &mut Sprite,
        ),
        With<Enemy>,
    >,
) {
    let dt = time.delta_secs();

    for (entity, mut motor, transform, mut velocity, mut sprite) in &mut enemies {
        let position = transform.translation.truncate();
        let query = AvianShapeQuery::new(&spatial, &colliders, vec![entity]);

        let wall_side = query
            .overlap_box(position, motor.tuning().wall_detector_size, QueryFilter::Climbable)
            .first()
            .map_or(0, |wall| {
                if wall.point.x > position.x {
                    1
                } else if wall.point.x < position.x {
                    -1
                } else {
                    0
                }
            });
        let player = query
            .overlap_box(position, motor.tuning().search_size, QueryFilter::Player)
            .first()
            .map(|hit| hit.center);

        let sense = MotorSense {
            position,
            wall_side,
            player,
        };
        velocity.x = motor.step(&sense, dt);
        if let Some(lift) = motor.take_lift() {
            velocity.y = lift;
        }
        sprite.flip_x = motor.facing_left();
    }
}

/// Swing at every enemy in front of the player when its controller
/// reports an attack.
#[allow(clippy::too_many_arguments)]
pub(crate) fn player_attacks(
    mut service: ResMut<CombatService>,
    spatial: SpatialQuery,
    tuning: Res<MovementTuning>,
    defaults: Res<GameplayDefaults>,
    mut movement_events: MessageReader<MovementEventMessage>,
    players: Query<(&CharacterController, &PlayerCombat)>,
    mut enemies: Query<(&mut EnemyCombat, &mut EnemyMotor, &Transform), With<Enemy>>,
    mut damage_events: MessageWriter<DamageEvent>,
    mut death_events: MessageWriter<DeathEvent>,
) {
    for message in movement_events.read() {
        if message.event != MovementEvent::Attacked {
            continue;
        }
        let Ok((controller, combat)) = players.get(message.entity) else {
            continue;
        };

        let center = tuning.standing_collider.center(controller.position());
        let shape = Collider::rectangle(defaults.attack_box.x, defaults.attack_box.y);
        let filter = SpatialQueryFilter::from_mask(GameLayer::Enemy);
        let direction = match controller.facing() {
            Facing::Right => Dir2::X,
            Facing::Left => Dir2::NEG_X,
        };

        let mut targets = spatial.shape_intersections(&shape, center, 0.0, &filter);
        for hit in spatial.shape_hits(
            &shape,
            center,
            0.0,
            direction,
            MAX_ATTACK_TARGETS,
            &ShapeCastConfig::from_max_distance(defaults.attack_reach),
            &filter,
        ) {
            if !targets.contains(&hit.entity) {
                targets.push(hit.entity);
            }
        }

        let stats = combat.stats();
        for target in targets {
            let Ok((mut enemy, mut motor, transform)) = enemies.get_mut(target) else {
                continue;
            };
            let outcome = service.deal_attack(
                &mut *enemy,
                stats.base_damage,
                stats.base_knockback,
                center,
                transform.translation.truncate(),
            );
            if let Some(knockback) = outcome.knockback {
                motor.apply_knockback(knockback);
            }
            if outcome.damage == DamageOutcome::Ignored {
                continue;
            }
            damage_events.write(DamageEvent {
                source: message.entity,
                target,
                amount: stats.base_damage,
                knockback: outcome.knockback,
            });
            if outcome.damage == DamageOutcome::Killed {
                death_events.write(DeathEvent { entity: target });
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn enemy_attacks(
    mut commands: Commands,
    mut service: ResMut<CombatService>,
    defaults: Res<GameplayDefaults>,
    mut enemies: Query<(Entity, &mut EnemyMotor, &EnemyCombat, &Transform), With<Enemy>>,
    mut players: Query<(Entity, &mut PlayerCombat, &mut CharacterController), With<Player>>,
    mut damage_events: MessageWriter<DamageEvent>,
    mut death_events: MessageWriter<DeathEvent>,
) {
    for (source, mut motor, enemy, transform) in &mut enemies {
        let position = transform.translation.truncate();
        if !enemy.vitals().alive || !motor.try_attack(position) {
            continue;
        }
        let stats = enemy.stats();

        for (target, mut combat, mut controller) in &mut players {
            let outcome = service.deal_attack(
                &mut *combat,
                stats.base_damage,
                stats.base_knockback,
                position,
                controller.position(),
            );
            if let Some(knockback) = outcome.knockback {
                controller.apply_knockback(knockback);
                commands
                    .entity(target)
                    .insert(HitStun::new(defaults.hit_stun_secs));
            }
            if outcome.damage == DamageOutcome::Ignored {
                continue;
            }
            damage_events.write(DamageEvent {
                source,
                target,
                amount: stats.base_damage,
                knockback: outcome.knockback,
            });
            if outcome.damage == DamageOutcome::Killed {
                death_events.write(DeathEvent { entity: target });
            }
        }
    }
}

pub(crate) fn recover_from_hit_stun(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut HitStun, &mut CharacterController)>,
) {
    for (entity, mut stun, mut controller) in &mut query {
        if stun.tick(time.delta_secs()) {
            controller.return_control();
            commands.entity(entity).remove::<HitStun>();
        }
    }
}

pub(crate) fn handle_deaths(
    mut commands: Commands,
    mut death_events: MessageReader<DeathEvent>,
    players: Query<(), With<Player>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for event in death_events.read() {
        if players.contains(event.entity) {
            info!("player {:?} died", event.entity);
            next_state.set(GameState::Dead);
        } else {
            info!("enemy {:?} defeated", event.entity);
            commands.entity(event.entity).despawn();
        }
    }
}

pub(crate) fn freeze_players(mut players: Query<&mut CharacterController, With<Player>>) {
    for mut controller in &mut players {
        controller.take_away_control(true);
    }
}
