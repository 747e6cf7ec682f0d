//! Movement domain: unit tests for the controller against a canned world.

use std::cell::Cell;

use bevy::prelude::*;

use super::crouch::CrouchController;
use super::jump::JumpController;
use super::ledge::find_ledge_corner;
use super::velocity::{
    HorizontalIntent, VerticalIntent, apply_velocity, resolve_horizontal, resolve_vertical,
};
use super::*;

const DT: f32 = 0.02;

/// Canned contacts for the capsule casts and detector boxes, plus
/// axis-aligned blocks for rays and clearance checks.
#[derive(Default)]
struct StubWorld {
    ground: bool,
    ceiling: bool,
    pushing_wall: bool,
    ground_normal: Option<Vec2>,
    walls: Vec<OverlapHit>,
    ladders: Vec<OverlapHit>,
    interactables: Vec<OverlapHit>,
    blocks: Vec<Rect>,
    raycasts: Cell<usize>,
    box_overlaps: Cell<usize>,
}

impl StubWorld {
    fn floor() -> Self {
        Self {
            ground: true,
            ..default()
        }
    }
}

fn contact(id: u64, point: Vec2) -> OverlapHit {
    OverlapHit {
        collider: ColliderId(id),
        center: point,
        point,
    }
}

fn single_hit(hit: bool, direction: Vec2) -> Vec<ShapeHit> {
    if !hit {
        return Vec::new();
    }
    vec![ShapeHit {
        collider: ColliderId(0),
        point: Vec2::ZERO,
        normal: -direction,
        distance: 0.0,
    }]
}

/// Only axis-aligned rays are supported.
fn ray_block(origin: Vec2, direction: Vec2, max_distance: f32, block: &Rect) -> Option<RayHit> {
    let (distance, point, normal) = if direction.x != 0.0 {
        if origin.y < block.min.y || origin.y > block.max.y {
            return None;
        }
        let face = if direction.x > 0.0 { block.min.x } else { block.max.x };
        (
            (face - origin.x) * direction.x.signum(),
            Vec2::new(face, origin.y),
            Vec2::new(-direction.x.signum(), 0.0),
        )
    } else {
        if origin.x < block.min.x || origin.x > block.max.x {
            return None;
        }
        let face = if direction.y > 0.0 { block.min.y } else { block.max.y };
        (
            (face - origin.y) * direction.y.signum(),
            Vec2::new(origin.x, face),
            Vec2::new(0.0, -direction.y.signum()),
        )
    };
    (0.0..=max_distance).contains(&distance).then_some(RayHit {
        collider: ColliderId(100),
        point,
        normal,
        distance,
    })
}

impl ShapeQuery for StubWorld {
    fn cast_capsule(
        &self,
        _center: Vec2,
        _size: Vec2,
        direction: Vec2,
        _max_distance: f32,
        _filter: QueryFilter,
    ) -> Vec<ShapeHit> {
        if direction.y < 0.0 {
            single_hit(self.ground, direction)
        } else if direction.y > 0.0 {
            single_hit(self.ceiling, direction)
        } else {
            single_hit(self.pushing_wall, direction)
        }
    }

    fn overlap_box(&self, _center: Vec2, _size: Vec2, filter: QueryFilter) -> Vec<OverlapHit> {
        self.box_overlaps.set(self.box_overlaps.get() + 1);
        match filter {
            QueryFilter::Climbable => self.walls.clone(),
            QueryFilter::Ladder => self.ladders.clone(),
            QueryFilter::Interactable => self.interactables.clone(),
            _ => Vec::new(),
        }
    }

    fn overlap_capsule(&self, center: Vec2, size: Vec2, _filter: QueryFilter) -> bool {
        let body = Rect::from_center_size(center, size);
        self.blocks
            .iter()
            .any(|block| !block.intersect(body).is_empty())
    }

    fn raycast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Option<RayHit> {
        self.raycasts.set(self.raycasts.get() + 1);
        if filter == QueryFilter::Solid && direction.y < 0.0 && self.ground {
            return Some(RayHit {
                collider: ColliderId(0),
                point: origin,
                normal: self.ground_normal.unwrap_or(Vec2::Y),
                distance: 0.0,
            });
        }
        self.blocks
            .iter()
            .filter_map(|block| ray_block(origin, direction, max_distance, block))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

fn tuning_without_air_jumps() -> MovementTuning {
    MovementTuning {
        max_air_jumps: 0,
        ..default()
    }
}

fn jump_press() -> FrameInput {
    FrameInput {
        jump_pressed: true,
        jump_held: true,
        ..default()
    }
}

fn idle() -> FrameInput {
    FrameInput::default()
}

fn jumped(output: &TickOutput) -> bool {
    output
        .events
        .contains(&MovementEvent::Jumped { wall_jump: false })
}

/// A controller that landed on the first tick.
fn landed_controller(world: &StubWorld, tuning: &MovementTuning) -> CharacterController {
    let mut controller = CharacterController::new(Vec2::ZERO, tuning);
    controller.tick(idle(), world, tuning, DT);
    assert!(controller.grounded());
    controller
}

/// A wall on the right whose top sits at y = 3.
fn ledge_world(block_top: f32) -> StubWorld {
    StubWorld {
        walls: vec![contact(1, Vec2::new(5.0, 2.0))],
        blocks: vec![Rect::new(5.0, 0.0, 7.0, block_top)],
        ..default()
    }
}

// --- Input ---

#[test]
fn test_raw_input_maps_to_clamped_axes() {
    let both = FrameInput::from_raw(&RawInput {
        left: true,
        right: true,
        up: true,
        ..default()
    });
    assert_eq!(both.move_axis, Vec2::new(0.0, 1.0));

    let stick = FrameInput::from_raw(&RawInput {
        left: true,
        stick: Some(Vec2::new(2.0, -0.4)),
        jump_just_pressed: true,
        ..default()
    });
    assert_eq!(stick.move_axis, Vec2::new(1.0, -0.4));
    assert!(stick.jump_pressed);
}

#[test]
fn test_snapped_input_respects_deadzones() {
    let tuning = MovementTuning::default();
    let snapped = FrameInput::moving(Vec2::new(0.05, -0.5)).snapped(&tuning);
    assert_eq!(snapped.move_axis, Vec2::new(0.0, -1.0));

    let analog = MovementTuning {
        snap_input: false,
        ..default()
    };
    let raw = FrameInput::moving(Vec2::new(0.05, -0.5)).snapped(&analog);
    assert_eq!(raw.move_axis, Vec2::new(0.05, -0.5));
}

#[test]
fn test_latched_presses_survive_until_taken() {
    let mut latched = LatchedInput::default();
    latched.latch(FrameInput {
        jump_pressed: true,
        move_axis: Vec2::X,
        ..default()
    });
    latched.latch(FrameInput::moving(Vec2::NEG_X));

    let first = latched.take();
    assert!(first.jump_pressed);
    assert_eq!(first.move_axis, Vec2::NEG_X);

    let second = latched.take();
    assert!(!second.jump_pressed);
    assert_eq!(second.move_axis, Vec2::NEG_X);
}

// --- Queries and state ---

#[test]
fn test_frame_cache_memoizes_identical_queries() {
    let world = StubWorld::floor();
    let cache = FrameQueryCache::new(&world);

    cache.raycast(Vec2::ZERO, Vec2::NEG_Y, 1.0, QueryFilter::Solid);
    cache.raycast(Vec2::ZERO, Vec2::NEG_Y, 1.0, QueryFilter::Solid);
    assert_eq!(world.raycasts.get(), 1);
    cache.raycast(Vec2::ZERO, Vec2::NEG_Y, 2.0, QueryFilter::Solid);
    assert_eq!(world.raycasts.get(), 2);

    cache.overlap_box(Vec2::ZERO, Vec2::ONE, QueryFilter::Ladder);
    cache.overlap_box(Vec2::ZERO, Vec2::ONE, QueryFilter::Ladder);
    cache.overlap_box(Vec2::ZERO, Vec2::ONE, QueryFilter::Climbable);
    assert_eq!(world.box_overlaps.get(), 2);
}

#[test]
fn test_grounded_wins_over_wall() {
    let mut state = KinematicState::new(Vec2::ZERO);
    state.grounded = true;
    state.on_wall = true;
    state.wall_direction = 1;
    state.grabbing_ledge = true;

    assert!(state.enforce_exclusivity());
    assert!(state.grounded);
    assert!(!state.on_wall);
    assert_eq!(state.wall_direction, 0);
    assert!(!state.grabbing_ledge);

    state.climbing_ledge = true;
    state.dashing = true;
    assert!(state.enforce_exclusivity());
    assert!(state.climbing_ledge);
    assert!(!state.dashing);

    assert!(!state.enforce_exclusivity());
}

#[test]
fn test_landing_reports_impact_speed() {
    let tuning = MovementTuning::default();
    let mut world = StubWorld::default();
    let mut controller = CharacterController::new(Vec2::new(0.0, 5.0), &tuning);
    for _ in 0..5 {
        controller.tick(idle(), &world, &tuning, DT);
    }
    let falling = controller.speed().y;
    assert!(falling < 0.0);

    world.ground = true;
    let output = controller.tick(idle(), &world, &tuning, DT);
    assert!(output.events.contains(&MovementEvent::GroundedChanged {
        landed: true,
        impact_speed: falling.abs(),
    }));
}

// --- Jumping ---

#[test]
fn test_coyote_jump_window() {
    let tuning = tuning_without_air_jumps();
    let coyote = tuning.coyote_frames;

    for k in 0..=coyote + 2 {
        let mut world = StubWorld::floor();
        let mut controller = landed_controller(&world, &tuning);
        world.ground = false;
        for _ in 0..k {
            controller.tick(idle(), &world, &tuning, DT);
        }
        let output = controller.tick(jump_press(), &world, &tuning, DT);
        assert_eq!(jumped(&output), k <= coyote, "coyote jump after {} ticks", k);
    }
}

#[test]
fn test_coyote_jump_used_once_per_leave() {
    let tuning = tuning_without_air_jumps();
    let mut world = StubWorld::floor();
    let mut controller = landed_controller(&world, &tuning);
    world.ground = false;

    let first = controller.tick(jump_press(), &world, &tuning, DT);
    let second = controller.tick(jump_press(), &world, &tuning, DT);
    assert!(jumped(&first));
    assert!(!jumped(&second));
}

#[test]
fn test_buffered_jump_fires_on_landing() {
    let tuning = tuning_without_air_jumps();
    let buffer = tuning.jump_buffer_frames;

    for k in 1..=buffer + 2 {
        let mut world = StubWorld::default();
        let mut controller = CharacterController::new(Vec2::new(0.0, 3.0), &tuning);
        let press = controller.tick(jump_press(), &world, &tuning, DT);
        assert!(!jumped(&press));
        for _ in 1..k {
            controller.tick(idle(), &world, &tuning, DT);
        }

        world.ground = true;
        let landing = controller.tick(idle(), &world, &tuning, DT);
        assert!(landing
            .events
            .iter()
            .any(|event| matches!(event, MovementEvent::GroundedChanged { landed: true, .. })));
        assert_eq!(jumped(&landing), k <= buffer, "landing {} ticks after the press", k);

        for _ in 0..3 {
            assert!(!jumped(&controller.tick(idle(), &world, &tuning, DT)));
        }
    }
}

#[test]
fn test_jump_then_single_air_jump() {
    let tuning = MovementTuning::default();
    assert_eq!(tuning.max_air_jumps, 1);
    let mut world = StubWorld::floor();
    let mut controller = CharacterController::new(Vec2::ZERO, &tuning);

    let first = controller.tick(
        FrameInput {
            move_axis: Vec2::X,
            ..jump_press()
        },
        &world,
        &tuning,
        DT,
    );
    assert!(jumped(&first));
    let expected_y = tuning.jump_power - tuning.fall_acceleration * DT;
    assert!((first.velocity.y - expected_y).abs() < 1e-4);

    world.ground = false;
    let second = controller.tick(
        FrameInput {
            move_axis: Vec2::X,
            ..jump_press()
        },
        &world,
        &tuning,
        DT,
    );
    assert!(second.events.contains(&MovementEvent::GroundedChanged {
        landed: false,
        impact_speed: 0.0,
    }));
    let air_jumps = second
        .events
        .iter()
        .filter(|event| **event == MovementEvent::AirJumped)
        .count();
    assert_eq!(air_jumps, 1);
    assert!(!jumped(&second));
    assert_eq!(controller.air_jumps_remaining(), 0);

    let third = controller.tick(jump_press(), &world, &tuning, DT);
    assert!(!third.events.contains(&MovementEvent::AirJumped));
}

#[test]
fn test_slope_keeps_feet_on_ground() {
    let tuning = MovementTuning::default();
    let mut state = KinematicState::new(Vec2::ZERO);
    state.grounded = true;
    state.speed = Vec2::new(4.0, 0.0);
    let normal = Vec2::new(1.0, 1.0).normalize();
    let intent = VerticalIntent {
        input_y: 0.0,
        ended_jump_early: false,
        leaving_wall: false,
    };

    resolve_vertical(&mut state, &intent, &tuning, DT, || Some(normal));

    let expected = -4.0 + tuning.grounding_force;
    assert!((state.speed.y - expected).abs() < 1e-4);
    assert_eq!(state.ground_normal, normal);
}

// --- Dash ---

#[test]
fn test_repeated_dash_requests_do_not_extend_dash() {
    let tuning = MovementTuning::default();
    let world = StubWorld::floor();
    let mut controller = CharacterController::new(Vec2::ZERO, &tuning);
    let dash_right = FrameInput {
        move_axis: Vec2::X,
        dash_pressed: true,
        ..default()
    };

    let first = controller.tick(dash_right, &world, &tuning, DT);
    assert!(first.events.contains(&MovementEvent::DashingChanged {
        active: true,
        direction: Vec2::X,
    }));

    controller.apply_velocity(Vec2::new(0.0, 5.0), UnitForce::Decay);
    let mut starts = 0;
    for tick in 1..12u64 {
        let output = controller.tick(dash_right, &world, &tuning, DT);
        if tick == 1 {
            assert!(controller.state().external_velocity.y > 0.0);
        }
        starts += output
            .events
            .iter()
            .filter(|event| matches!(event, MovementEvent::DashingChanged { active: true, .. }))
            .count();
        let expected = tick <= tuning.dash_duration_frames as u64;
        assert_eq!(controller.dashing(), expected, "dashing at tick {}", tick);
    }
    assert_eq!(starts, 0);
}

#[test]
fn test_dash_without_direction_is_dropped() {
    let tuning = MovementTuning::default();
    let world = StubWorld::floor();
    let mut controller = CharacterController::new(Vec2::ZERO, &tuning);
    controller.tick(
        FrameInput {
            dash_pressed: true,
            ..default()
        },
        &world,
        &tuning,
        DT,
    );
    assert!(!controller.dashing());
}

// --- Crouch ---

#[test]
fn test_crouch_stays_while_headroom_blocked() {
    let tuning = MovementTuning::default();
    let mut world = StubWorld::floor();
    let mut controller = CharacterController::new(Vec2::ZERO, &tuning);
    let crouch = FrameInput::moving(Vec2::NEG_Y);

    controller.tick(crouch, &world, &tuning, DT);
    assert!(controller.crouching());

    world.blocks.push(Rect::new(-1.0, 1.4, 1.0, 2.5));
    for _ in 0..5 {
        controller.sync_body(Vec2::ZERO, Vec2::ZERO);
        controller.tick(idle(), &world, &tuning, DT);
        assert!(controller.crouching());
    }

    world.blocks.clear();
    controller.sync_body(Vec2::ZERO, Vec2::ZERO);
    controller.tick(idle(), &world, &tuning, DT);
    assert!(!controller.crouching());
}

// --- Walls and ledges ---

#[test]
fn test_ledge_corner_from_three_probes() {
    let tuning = MovementTuning::default();
    let position = Vec2::new(4.6, 1.5);

    let corner = find_ledge_corner(&ledge_world(3.0), position, 1, &tuning);
    assert_eq!(corner, Some(Vec2::new(5.0, 3.0)));

    // The upper probe hits as well: no ledge
    assert_eq!(find_ledge_corner(&ledge_world(4.0), position, 1, &tuning), None);
    assert_eq!(find_ledge_corner(&ledge_world(3.0), position, 0, &tuning), None);
}

#[test]
fn test_wall_grab_then_ledge_grab() {
    let tuning = MovementTuning::default();
    let world = ledge_world(3.0);
    let mut controller = CharacterController::new(Vec2::new(4.6, 1.5), &tuning);

    let output = controller.tick(idle(), &world, &tuning, DT);
    assert!(output
        .events
        .contains(&MovementEvent::WallGrabChanged { active: true }));
    assert_eq!(controller.wall_direction(), 1);
    assert!(controller.grabbing_ledge());
    assert_eq!(controller.ledge_corner(), Vec2::new(5.0, 3.0));

    let tall = ledge_world(4.0);
    let mut blocked = CharacterController::new(Vec2::new(4.6, 1.5), &tuning);
    blocked.tick(idle(), &tall, &tuning, DT);
    assert_eq!(blocked.wall_direction(), 1);
    assert!(!blocked.grabbing_ledge());
}

#[test]
fn test_ledge_climb_teleports_and_returns_control() {
    let tuning = MovementTuning::default();
    let world = ledge_world(3.0);
    let mut controller = CharacterController::new(Vec2::new(4.6, 1.5), &tuning);

    let output = controller.tick(FrameInput::moving(Vec2::X), &world, &tuning, DT);
    assert!(output
        .events
        .contains(&MovementEvent::LedgeClimbChanged { into_crouch: false }));
    assert!(controller.climbing_ledge());
    assert!(!controller.has_control());

    let top = controller.teleport_mid_ledge_climb(&tuning);
    assert!(top.is_some_and(|top| top.distance(Vec2::new(5.2, 3.0)) < 1e-5));
    controller.finish_ledge_climb();
    assert!(!controller.climbing_ledge());
    assert!(controller.has_control());

    // Leaving the wall during the teleport is reported on the next tick
    let next = controller.tick(idle(), &StubWorld::floor(), &tuning, DT);
    assert!(next
        .events
        .contains(&MovementEvent::WallGrabChanged { active: false }));
}

#[test]
fn test_ledge_climb_into_crouch_under_low_ceiling() {
    let tuning = MovementTuning::default();
    let mut world = ledge_world(3.0);
    world.blocks.push(Rect::new(4.0, 4.0, 7.0, 5.0));
    let mut controller = CharacterController::new(Vec2::new(4.6, 1.5), &tuning);

    let output = controller.tick(FrameInput::moving(Vec2::X), &world, &tuning, DT);
    assert!(output
        .events
        .contains(&MovementEvent::LedgeClimbChanged { into_crouch: true }));
    controller.teleport_mid_ledge_climb(&tuning);
    assert!(controller.crouching());
}

#[test]
fn test_climb_callbacks_without_climb_are_ignored() {
    let tuning = MovementTuning::default();
    let mut controller = CharacterController::new(Vec2::ZERO, &tuning);
    assert_eq!(controller.teleport_mid_ledge_climb(&tuning), None);
    controller.finish_ledge_climb();
    assert!(controller.has_control());
}

#[test]
fn test_wall_jump_pushes_away_from_wall() {
    let tuning = MovementTuning::default();
    let world = StubWorld {
        walls: vec![contact(1, Vec2::new(1.0, 1.0))],
        ..default()
    };
    let mut controller = CharacterController::new(Vec2::ZERO, &tuning);
    controller.tick(idle(), &world, &tuning, DT);
    assert_eq!(controller.wall_direction(), 1);

    let output = controller.tick(jump_press(), &world, &tuning, DT);
    assert!(output
        .events
        .contains(&MovementEvent::Jumped { wall_jump: true }));
    assert!(output.velocity.x < 0.0);
    assert!(output.velocity.y > 0.0);
}

// --- Ladders ---

#[test]
fn test_ladder_mount_center_and_dismount() {
    let tuning = MovementTuning::default();
    let mut world = StubWorld {
        ladders: vec![contact(2, Vec2::new(0.5, 1.0))],
        ..default()
    };
    let mut controller = CharacterController::new(Vec2::ZERO, &tuning);

    let output = controller.tick(idle(), &world, &tuning, DT);
    assert!(controller.climbing_ladder());
    assert!(output.repositioned);
    assert!(output.position.x > 0.0 && output.position.x <= 0.5);
    assert_eq!(output.velocity.y, 0.0);

    world.ladders.clear();
    controller.tick(idle(), &world, &tuning, DT);
    assert!(!controller.climbing_ladder());
}

// --- Attacks, interactions and control ---

#[test]
fn test_attack_cooldown_in_ticks() {
    let tuning = MovementTuning::default();
    let world = StubWorld::floor();
    let mut controller = CharacterController::new(Vec2::ZERO, &tuning);
    let attack = FrameInput {
        attack_pressed: true,
        ..default()
    };

    let mut attack_ticks = Vec::new();
    for tick in 0..=tuning.attack_frame_cooldown as u64 + 1 {
        let output = controller.tick(attack, &world, &tuning, DT);
        if output.events.contains(&MovementEvent::Attacked) {
            attack_ticks.push(tick);
        }
    }
    assert_eq!(attack_ticks, vec![0, tuning.attack_frame_cooldown as u64 + 1]);
}

#[test]
fn test_interact_withdraws_control() {
    let tuning = MovementTuning::default();
    let mut world = StubWorld::floor();
    let mut controller = landed_controller(&world, &tuning);
    let interact = FrameInput {
        interact_pressed: true,
        ..default()
    };

    let nothing = controller.tick(interact, &world, &tuning, DT);
    assert!(nothing.events.is_empty());
    assert!(controller.has_control());

    world.interactables.push(contact(7, Vec2::new(0.5, 0.9)));
    let output = controller.tick(interact, &world, &tuning, DT);
    assert!(output.events.contains(&MovementEvent::Interacted {
        target: ColliderId(7),
    }));
    assert!(!controller.has_control());

    controller.return_control();
    assert!(controller.has_control());
    assert_eq!(controller.speed(), Vec2::ZERO);
}

#[test]
fn test_knockback_overrides_input_until_control_returns() {
    let tuning = MovementTuning::default();
    let world = StubWorld::floor();
    let mut controller = landed_controller(&world, &tuning);

    controller.apply_knockback(Vec2::new(-6.0, 4.0));
    assert!(!controller.has_control());
    let output = controller.tick(FrameInput::moving(Vec2::X), &world, &tuning, DT);
    assert_eq!(output.velocity.x, -6.0);
    assert_eq!(controller.facing(), Facing::Right);

    controller.return_control();
    let output = controller.tick(FrameInput::moving(Vec2::X), &world, &tuning, DT);
    assert!(output.velocity.x > 0.0);
}

#[test]
fn test_knockback_cancels_dash() {
    let tuning = MovementTuning::default();
    let world = StubWorld::floor();
    let mut controller = CharacterController::new(Vec2::ZERO, &tuning);
    controller.tick(
        FrameInput {
            move_axis: Vec2::X,
            dash_pressed: true,
            ..default()
        },
        &world,
        &tuning,
        DT,
    );
    assert!(controller.dashing());

    controller.apply_knockback(Vec2::new(-3.0, 2.0));
    assert!(!controller.dashing());
    let output = controller.tick(idle(), &world, &tuning, DT);
    assert!(output.events.contains(&MovementEvent::DashingChanged {
        active: false,
        direction: Vec2::ZERO,
    }));
}

#[test]
fn test_zero_max_speed_disables_running() {
    let tuning = MovementTuning {
        max_speed: 0.0,
        ..default()
    };
    let world = StubWorld::floor();
    let mut controller = landed_controller(&world, &tuning);
    let output = controller.tick(FrameInput::moving(Vec2::X), &world, &tuning, DT);
    assert_eq!(output.velocity.x, 0.0);
    assert!(output.velocity.is_finite());
}

// --- Tuning ---

#[test]
fn test_sanitize_clamps_negative_values() {
    let (clean, warnings) = MovementTuning::default().sanitized();
    assert!(warnings.is_empty());
    assert_eq!(clean, MovementTuning::default());

    let (tuning, warnings) = MovementTuning {
        max_speed: -3.0,
        wall_detector_size: Vec2::new(-1.0, 1.0),
        grounding_force: -2.0,
        ..default()
    }
    .sanitized();
    assert_eq!(warnings.len(), 2);
    assert_eq!(tuning.max_speed, 0.0);
    assert_eq!(tuning.wall_detector_size, Vec2::new(0.0, 1.0));
    assert_eq!(tuning.grounding_force, -2.0);
}

#[test]
fn test_jump_height_helpers() {
    let tuning = MovementTuning {
        jump_power: 10.0,
        fall_acceleration: 50.0,
        max_air_jumps: 2,
        ..default()
    };
    assert!((tuning.single_jump_height() - 1.0).abs() < 1e-6);
    assert!((tuning.max_reachable_height() - 3.0).abs() < 1e-6);
}

// --- Timed windows and decay ---

fn dash_toward(axis: Vec2) -> FrameInput {
    FrameInput {
        move_axis: axis,
        dash_pressed: true,
        ..default()
    }
}

fn dash_started(output: &TickOutput) -> bool {
    output
        .events
        .iter()
        .any(|event| matches!(event, MovementEvent::DashingChanged { active: true, .. }))
}

#[test]
fn test_wall_jump_coyote_window() {
    let tuning = tuning_without_air_jumps();
    let window = tuning.wall_jump_coyote_frames as usize;
    let wall_jump = MovementEvent::Jumped { wall_jump: true };

    for k in 0..=window + 2 {
        let mut world = StubWorld {
            walls: vec![contact(1, Vec2::new(1.0, 1.0))],
            ..default()
        };
        let mut controller = CharacterController::new(Vec2::ZERO, &tuning);
        controller.tick(idle(), &world, &tuning, DT);
        assert_eq!(controller.wall_direction(), 1);

        world.walls.clear();
        for _ in 0..k {
            controller.tick(idle(), &world, &tuning, DT);
        }
        let output = controller.tick(jump_press(), &world, &tuning, DT);
        let jumped_off = output.events.contains(&wall_jump);
        assert_eq!(jumped_off, k <= window, "wall jump {} ticks after leaving", k);

        if jumped_off {
            assert!(output.velocity.x < 0.0);
            let again = controller.tick(jump_press(), &world, &tuning, DT);
            assert!(!again.events.contains(&wall_jump));
        }
    }
}

#[test]
fn test_wall_jump_influence_recovers() {
    let tuning = MovementTuning::default();
    let mut jump = JumpController::new(&tuning);
    let mut state = KinematicState::new(Vec2::ZERO);

    jump.perform_wall_jump(&mut state, -1, &tuning);
    assert_eq!(jump.horizontal_influence(), 0.0);
    assert_eq!(state.speed, tuning.wall_jump_power);

    let step = 1.0 / tuning.wall_jump_input_loss_frames as f32;
    jump.restore_influence(&tuning);
    assert!((jump.horizontal_influence() - step).abs() < 1e-6);

    for _ in 0..tuning.wall_jump_input_loss_frames {
        jump.restore_influence(&tuning);
        assert!(jump.horizontal_influence() <= 1.0);
    }
    assert_eq!(jump.horizontal_influence(), 1.0);
}

#[test]
fn test_released_jump_falls_faster() {
    let tuning = MovementTuning::default();
    let mut rising = Vec::new();
    for held in [true, false] {
        let mut world = StubWorld::floor();
        let mut controller = CharacterController::new(Vec2::ZERO, &tuning);
        controller.tick(jump_press(), &world, &tuning, DT);
        world.ground = false;
        let output = controller.tick(
            FrameInput {
                jump_held: held,
                ..default()
            },
            &world,
            &tuning,
            DT,
        );
        rising.push(output.velocity.y);
    }

    let gravity = tuning.fall_acceleration * DT;
    let after_jump = tuning.jump_power - gravity;
    assert!((rising[0] - (after_jump - gravity)).abs() < 1e-3);
    let heavy = gravity * tuning.jump_end_early_gravity_modifier;
    assert!((rising[1] - (after_jump - heavy)).abs() < 1e-3);
}

#[test]
fn test_sticky_feet_after_still_landing() {
    let tuning = MovementTuning::default();
    let world = StubWorld::floor();
    let ground_step = tuning.ground_deceleration * DT;

    let mut still = CharacterController::new(Vec2::ZERO, &tuning);
    still.set_velocity(Vec2::new(10.0, 0.0), UnitForce::Burst);
    still.tick(idle(), &world, &tuning, DT);
    let sticky_step = ground_step * tuning.sticky_feet_multiplier;
    assert!((still.speed().x - (10.0 - sticky_step)).abs() < 1e-4);
    still.tick(idle(), &world, &tuning, DT);
    assert!((still.speed().x - (10.0 - 2.0 * sticky_step)).abs() < 1e-4);

    let mut running = CharacterController::new(Vec2::ZERO, &tuning);
    running.tick(FrameInput::moving(Vec2::X), &world, &tuning, DT);
    running.set_velocity(Vec2::new(10.0, 0.0), UnitForce::Burst);
    running.tick(idle(), &world, &tuning, DT);
    assert!((running.speed().x - (10.0 - ground_step)).abs() < 1e-4);
}

#[test]
fn test_pushing_blocked_wall_zeroes_speed() {
    let tuning = MovementTuning::default();
    let step = tuning.acceleration * DT;
    let pushing = HorizontalIntent {
        input_x: 1.0,
        pushing_wall: true,
        leaving_wall: false,
        sticky_feet: false,
        influence: 1.0,
        crouch_multiplier: 1.0,
    };
    let moving_state = |measured_x: f32| {
        let mut state = KinematicState::new(Vec2::ZERO);
        state.speed.x = 8.0;
        state.velocity.x = measured_x;
        state
    };

    let mut blocked = moving_state(0.0);
    resolve_horizontal(&mut blocked, &pushing, &tuning, DT);
    assert!((blocked.speed.x - step).abs() < 1e-4);

    let mut sliding = moving_state(tuning.wall_push_velocity_epsilon * 10.0);
    resolve_horizontal(&mut sliding, &pushing, &tuning, DT);
    assert!((sliding.speed.x - (8.0 + step)).abs() < 1e-4);

    let mut leaving = moving_state(0.0);
    let leaving_intent = HorizontalIntent {
        leaving_wall: true,
        ..pushing
    };
    resolve_horizontal(&mut leaving, &leaving_intent, &tuning, DT);
    assert!((leaving.speed.x - (8.0 + step)).abs() < 1e-4);
}

#[test]
fn test_external_velocity_decays_linearly() {
    let tuning = MovementTuning::default();
    let mut state = KinematicState::new(Vec2::ZERO);
    state.external_velocity = Vec2::new(6.0, 8.0);

    let first = apply_velocity(&mut state, &tuning, DT);
    assert_eq!(first, Vec2::new(6.0, 8.0));
    assert_eq!(state.position, first * DT);

    let step = tuning.external_velocity_decay * DT;
    assert!((state.external_velocity.length() - (10.0 - step)).abs() < 1e-4);
    assert!(state.external_velocity.normalize().distance(Vec2::new(0.6, 0.8)) < 1e-5);

    for _ in 0..4 {
        apply_velocity(&mut state, &tuning, DT);
    }
    assert!(state.external_velocity.length() < 1e-4);
}

#[test]
fn test_crouch_slowdown_ramps_to_penalty() {
    let tuning = MovementTuning::default();
    let world = StubWorld::floor();
    let mut crouch = CrouchController::default();
    let mut state = KinematicState::new(Vec2::ZERO);
    state.tick = 10;

    assert!(crouch.try_toggle(&mut state, &world, true, &tuning));
    assert!(state.crouching);

    let frames = tuning.crouch_slowdown_frames as u64;
    let penalty = tuning.crouch_speed_penalty;
    assert_eq!(crouch.speed_multiplier(10, &tuning), 1.0);
    let midway = 1.0 + (penalty - 1.0) * 0.5;
    assert!((crouch.speed_multiplier(10 + frames / 2, &tuning) - midway).abs() < 1e-6);
    assert_eq!(crouch.speed_multiplier(10 + frames, &tuning), penalty);
    assert_eq!(crouch.speed_multiplier(10 + frames * 4, &tuning), penalty);
}

#[test]
fn test_airborne_dash_end_and_recharge_on_landing() {
    let tuning = MovementTuning::default();
    let mut world = StubWorld::default();
    let mut controller = CharacterController::new(Vec2::new(0.0, 10.0), &tuning);

    assert!(dash_started(&controller.tick(dash_toward(Vec2::ONE), &world, &tuning, DT)));
    for _ in 0..tuning.dash_duration_frames {
        controller.tick(idle(), &world, &tuning, DT);
        assert!(controller.dashing());
    }

    let end = controller.tick(idle(), &world, &tuning, DT);
    assert!(!controller.dashing());
    assert!(end.events.contains(&MovementEvent::DashingChanged {
        active: false,
        direction: Vec2::ZERO,
    }));
    let dash_x = tuning.dash_velocity * Vec2::ONE.normalize().x;
    let expected = Vec2::new(
        dash_x * tuning.dash_end_horizontal_multiplier - tuning.air_deceleration * DT,
        -tuning.fall_acceleration * DT,
    );
    assert!(end.velocity.distance(expected) < 1e-3);

    // No recharge in the air, even past the cooldown
    while controller.state().tick < tuning.dash_cooldown_frames as u64 + 5 {
        controller.tick(idle(), &world, &tuning, DT);
    }
    assert!(!dash_started(&controller.tick(dash_toward(Vec2::X), &world, &tuning, DT)));

    world.ground = true;
    assert!(dash_started(&controller.tick(dash_toward(Vec2::X), &world, &tuning, DT)));
}

#[test]
fn test_grounded_dash_recharges_after_cooldown() {
    let tuning = MovementTuning::default();
    let world = StubWorld::floor();
    let mut controller = CharacterController::new(Vec2::ZERO, &tuning);
    let cooldown = tuning.dash_cooldown_frames as u64;

    let mut starts = Vec::new();
    for tick in 0..=cooldown {
        if dash_started(&controller.tick(dash_toward(Vec2::X), &world, &tuning, DT)) {
            starts.push(tick);
        }
    }
    assert_eq!(starts, vec![0, cooldown]);
}

#[test]
fn test_leaving_ladder_upward_pops() {
    let tuning = MovementTuning::default();
    let mut world = StubWorld {
        ladders: vec![contact(2, Vec2::new(0.0, 1.0))],
        ..default()
    };
    let mut controller = CharacterController::new(Vec2::new(0.0, 2.0), &tuning);
    let up = FrameInput {
        move_axis: Vec2::Y,
        jump_held: true,
        ..default()
    };

    let climb = controller.tick(up, &world, &tuning, DT);
    assert!(controller.climbing_ladder());
    assert_eq!(climb.velocity.y, tuning.ladder_climb_speed);

    world.ladders.clear();
    let pop = controller.tick(up, &world, &tuning, DT);
    assert!(!controller.climbing_ladder());
    let expected =
        tuning.ladder_climb_speed + tuning.ladder_pop_force - tuning.fall_acceleration * DT;
    assert!((pop.velocity.y - expected).abs() < 1e-4);
}

#[test]
fn test_ladder_remount_waits_for_cooldown() {
    let tuning = MovementTuning {
        auto_attach_to_ladders: false,
        ..default()
    };
    let world = StubWorld {
        ground: true,
        ladders: vec![contact(2, Vec2::ZERO)],
        ..default()
    };
    let mut controller = CharacterController::new(Vec2::ZERO, &tuning);
    let up = FrameInput::moving(Vec2::Y);

    controller.tick(up, &world, &tuning, DT);
    assert!(controller.climbing_ladder());
    controller.tick(FrameInput::moving(Vec2::NEG_Y), &world, &tuning, DT);
    assert!(!controller.climbing_ladder());

    let left_tick = 1;
    let mut remounted = None;
    for tick in 2..30u64 {
        controller.tick(up, &world, &tuning, DT);
        if controller.climbing_ladder() {
            remounted = Some(tick);
            break;
        }
    }
    assert_eq!(remounted, Some(left_tick + tuning.ladder_cooldown_frames as u64 + 1));
}

#[test]
fn test_ceiling_stops_rise() {
    let tuning = MovementTuning::default();
    let mut world = StubWorld::floor();
    let mut controller = CharacterController::new(Vec2::ZERO, &tuning);
    controller.tick(jump_press(), &world, &tuning, DT);
    assert!(controller.speed().y > 0.0);

    world.ground = false;
    world.ceiling = true;
    controller.apply_velocity(Vec2::new(0.0, 5.0), UnitForce::Decay);
    let output = controller.tick(
        FrameInput {
            jump_held: true,
            ..default()
        },
        &world,
        &tuning,
        DT,
    );
    assert!((output.velocity.y + tuning.fall_acceleration * DT).abs() < 1e-4);
    assert_eq!(controller.state().external_velocity.y, 0.0);
}

// --- Withdrawn control ---

#[test]
fn test_knockback_ignores_walls_until_control_returns() {
    let tuning = MovementTuning::default();
    let mut world = StubWorld::default();
    let mut controller = CharacterController::new(Vec2::new(0.0, 5.0), &tuning);

    controller.apply_knockback(Vec2::new(-6.0, 4.0));
    for _ in 0..3 {
        controller.tick(idle(), &world, &tuning, DT);
    }

    world.walls.push(contact(1, Vec2::new(-1.0, 5.0)));
    let output = controller.tick(idle(), &world, &tuning, DT);
    assert_eq!(controller.speed().x, -6.0);
    assert_eq!(controller.wall_direction(), 0);
    assert!(!output
        .events
        .contains(&MovementEvent::WallGrabChanged { active: true }));

    controller.return_control();
    let output = controller.tick(idle(), &world, &tuning, DT);
    assert!(output
        .events
        .contains(&MovementEvent::WallGrabChanged { active: true }));
    assert_eq!(controller.wall_direction(), -1);
}

#[test]
fn test_knockback_ignores_ladders_until_control_returns() {
    let tuning = MovementTuning::default();
    let mut world = StubWorld::default();
    let mut controller = CharacterController::new(Vec2::new(0.0, 5.0), &tuning);

    controller.apply_knockback(Vec2::new(-6.0, 4.0));
    controller.tick(idle(), &world, &tuning, DT);

    world.ladders.push(contact(2, Vec2::new(-0.5, 5.0)));
    let output = controller.tick(idle(), &world, &tuning, DT);
    assert!(!controller.climbing_ladder());
    assert_eq!(output.velocity.x, -6.0);
    assert!(output.velocity.y < 4.0);

    controller.return_control();
    controller.tick(idle(), &world, &tuning, DT);
    assert!(controller.climbing_ladder());
}

#[test]
fn test_landing_during_knockback_leaves_wall() {
    let tuning = MovementTuning::default();
    let mut world = StubWorld {
        walls: vec![contact(1, Vec2::new(1.0, 1.0))],
        ..default()
    };
    let mut controller = CharacterController::new(Vec2::ZERO, &tuning);
    controller.tick(idle(), &world, &tuning, DT);
    assert_eq!(controller.wall_direction(), 1);

    controller.apply_knockback(Vec2::new(-3.0, 0.0));
    world.ground = true;
    let output = controller.tick(idle(), &world, &tuning, DT);
    assert!(controller.grounded());
    assert_eq!(controller.wall_direction(), 0);
    assert!(output
        .events
        .contains(&MovementEvent::WallGrabChanged { active: false }));
}

#[test]
fn test_ledge_climb_holds_wall_without_push() {
    let tuning = MovementTuning {
        require_input_push: true,
        ..default()
    };
    let world = ledge_world(3.0);
    let mut controller = CharacterController::new(Vec2::new(4.6, 1.5), &tuning);

    controller.tick(FrameInput::moving(Vec2::X), &world, &tuning, DT);
    assert!(controller.climbing_ledge());

    let output = controller.tick(idle(), &world, &tuning, DT);
    assert!(controller.climbing_ledge());
    assert_eq!(controller.wall_direction(), 1);
    assert!(!output
        .events
        .contains(&MovementEvent::WallGrabChanged { active: false }));
}
