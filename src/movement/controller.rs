//! Movement domain: the character controller and its fixed-tick orchestrator.

use bevy::prelude::*;

use crate::movement::MovementTuning;
use crate::movement::classifier::{ContactSnapshot, GroundTransition, classify, probe_ground_normal};
use crate::movement::crouch::CrouchController;
use crate::movement::dash::DashController;
use crate::movement::events::{MovementEvent, TickEvents};
use crate::movement::input::FrameInput;
use crate::movement::jump::{JumpController, JumpKind};
use crate::movement::ladder::LadderTracker;
use crate::movement::ledge::{LedgeClimbStart, LedgeTracker};
use crate::movement::query::{FrameQueryCache, QueryFilter, ShapeQuery};
use crate::movement::resources::ColliderShape;
use crate::movement::state::{Facing, KinematicState};
use crate::movement::velocity::{
    HorizontalIntent, VerticalIntent, apply_velocity, resolve_horizontal, resolve_vertical,
};
use crate::movement::wall::WallTracker;

/// How an externally applied velocity is absorbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitForce {
    /// Goes into the player-driven speed and is worn down by the normal
    /// deceleration.
    Burst,
    /// Goes into the external velocity, which decays on its own.
    Decay,
}

/// Result of one fixed tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutput {
    pub velocity: Vec2,
    pub position: Vec2,
    /// The controller moved the body directly (ledge nudge, ladder
    /// centering) and the new position must be written back.
    pub repositioned: bool,
    pub events: TickEvents,
}

#[derive(Component, Debug, Clone)]
pub struct CharacterController {
    state: KinematicState,
    input: FrameInput,
    jump: JumpController,
    wall: WallTracker,
    ledge: LedgeTracker,
    ladder: LadderTracker,
    dash: DashController,
    crouch: CrouchController,
    sticky_feet: bool,
    attack_to_consume: bool,
    last_attack_tick: Option<u64>,
    control_withdrawn_at: Option<u64>,
    withdrawal_warned: bool,
    /// Events raised between ticks (control withdrawal cancelling a dash,
    /// ledge teleport leaving a wall); flushed by the next tick.
    pending: TickEvents,
}

impl CharacterController {
    pub fn new(position: Vec2, tuning: &MovementTuning) -> Self {
        Self {
            state: KinematicState::new(position),
            input: FrameInput::default(),
            jump: JumpController::new(tuning),
            wall: WallTracker::default(),
            ledge: LedgeTracker::default(),
            ladder: LadderTracker::default(),
            dash: DashController::default(),
            crouch: CrouchController::default(),
            sticky_feet: false,
            attack_to_consume: false,
            last_attack_tick: None,
            control_withdrawn_at: None,
            withdrawal_warned: false,
            pending: TickEvents::default(),
        }
    }

    pub fn state(&self) -> &KinematicState {
        &self.state
    }

    /// Input of the last tick, after snapping.
    pub fn input(&self) -> &FrameInput {
        &self.input
    }

    pub fn speed(&self) -> Vec2 {
        self.state.speed
    }

    pub fn velocity(&self) -> Vec2 {
        self.state.velocity
    }

    pub fn position(&self) -> Vec2 {
        self.state.position
    }

    pub fn ground_normal(&self) -> Vec2 {
        self.state.ground_normal
    }

    pub fn wall_direction(&self) -> i8 {
        self.state.wall_direction
    }

    pub fn facing(&self) -> Facing {
        self.state.facing
    }

    pub fn grounded(&self) -> bool {
        self.state.grounded
    }

    pub fn crouching(&self) -> bool {
        self.state.crouching
    }

    pub fn climbing_ladder(&self) -> bool {
        self.state.climbing_ladder
    }

    pub fn grabbing_ledge(&self) -> bool {
        self.state.grabbing_ledge
    }

    pub fn climbing_ledge(&self) -> bool {
        self.state.climbing_ledge
    }

    pub fn dashing(&self) -> bool {
        self.state.dashing
    }

    pub fn has_control(&self) -> bool {
        self.state.has_control
    }

    pub fn air_jumps_remaining(&self) -> u8 {
        self.jump.air_jumps_remaining()
    }

    pub fn ledge_corner(&self) -> Vec2 {
        self.ledge.corner()
    }

    pub fn active_collider<'t>(&self, tuning: &'t MovementTuning) -> &'t ColliderShape {
        if self.state.crouching {
            &tuning.crouching_collider
        } else {
            &tuning.standing_collider
        }
    }

    /// Adopt the position and velocity the physics engine resolved since
    /// the last tick.
    pub fn sync_body(&mut self, position: Vec2, measured_velocity: Vec2) {
        self.state.position = position;
        self.state.velocity = measured_velocity;
    }

    pub fn apply_velocity(&mut self, velocity: Vec2, force: UnitForce) {
        match force {
            UnitForce::Burst => self.state.speed += velocity,
            UnitForce::Decay => self.state.external_velocity += velocity,
        }
    }

    pub fn set_velocity(&mut self, velocity: Vec2, force: UnitForce) {
        match force {
            UnitForce::Burst => self.state.speed = velocity,
            UnitForce::Decay => self.state.external_velocity = velocity,
        }
    }

    /// Withdraw control and throw the body along `knockback`.
    pub fn apply_knockback(&mut self, knockback: Vec2) {
        self.take_away_control(true);
        self.set_velocity(knockback, UnitForce::Burst);
    }

    /// Stop resolving player input until [`Self::return_control`] is called.
    /// Ends any dash in progress.
    pub fn take_away_control(&mut self, reset_velocity: bool) {
        self.dash.cancel(&mut self.state, &mut self.pending);
        if reset_velocity {
            self.state.speed = Vec2::ZERO;
            self.state.external_velocity = Vec2::ZERO;
        }
        if self.state.has_control {
            self.control_withdrawn_at = Some(self.state.tick);
            self.withdrawal_warned = false;
        }
        self.state.has_control = false;
    }

    pub fn return_control(&mut self) {
        self.state.speed = Vec2::ZERO;
        self.state.has_control = true;
        self.control_withdrawn_at = None;
    }

    /// Mid-climb animation callback: move onto the ledge top. Returns the
    /// new position, or `None` when no climb is in progress.
    pub fn teleport_mid_ledge_climb(&mut self, tuning: &MovementTuning) -> Option<Vec2> {
        if !self.state.climbing_ledge {
            warn!("ledge climb teleport without a climb in progress");
            return None;
        }
        self.state.position = self.ledge.stand_position(tuning);
        if self.ledge.climbing_into_crouch() {
            self.crouch.force_crouch(&mut self.state);
        }
        self.wall
            .leave(&mut self.state, &mut self.jump, tuning, &mut self.pending);
        Some(self.state.position)
    }

    pub fn finish_ledge_climb(&mut self) {
        if !self.state.climbing_ledge {
            warn!("ledge climb finish without a climb in progress");
            return;
        }
        self.state.climbing_ledge = false;
        self.return_control();
    }

    /// Run one fixed step.
    pub fn tick(
        &mut self,
        input: FrameInput,
        query: &dyn ShapeQuery,
        tuning: &MovementTuning,
        dt: f32,
    ) -> TickOutput {
        let query = FrameQueryCache::new(query);
        let mut events = std::mem::take(&mut self.pending);

        self.gather_input(input, tuning);
        let start_position = self.state.position;

        let collider = *self.active_collider(tuning);
        let contacts = ContactSnapshot::gather(
            &query,
            &self.state,
            &collider,
            self.input.move_axis.x,
            tuning,
        );
        if let GroundTransition::Landed { .. } = classify(&mut self.state, &contacts, &mut events) {
            self.dash.reset();
            self.jump.reset(tuning);
            self.wall
                .leave(&mut self.state, &mut self.jump, tuning, &mut events);
            if self.input.move_axis.x == 0.0 {
                self.sticky_feet = true;
            }
        }

        // Walls, ledges and ladders only react while the player has control
        if self.state.has_control {
            self.jump.restore_influence(tuning);
            self.wall.update(
                &mut self.state,
                &contacts,
                &self.input,
                &mut self.jump,
                tuning,
                &mut events,
            );
            if let Some(start) = self
                .ledge
                .update(&mut self.state, &query, &self.input, tuning, dt)
            {
                self.start_ledge_climb(start, tuning, &mut events);
            }
        }

        if self.state.has_control {
            self.ladder.update(
                &mut self.state,
                &contacts,
                &self.input,
                &mut self.jump,
                tuning,
                dt,
            );
            self.crouch
                .update(&mut self.state, &query, &self.input, tuning);
            self.handle_jump(&query, &contacts, tuning, &mut events);
            self.dash
                .update(&mut self.state, &self.input, tuning, &mut events);
            self.handle_attack(tuning, &mut events);
        }

        let horizontal = HorizontalIntent {
            input_x: self.input.move_axis.x,
            pushing_wall: contacts.pushing_wall,
            leaving_wall: self.wall.is_leaving(),
            sticky_feet: self.sticky_feet,
            influence: self.jump.horizontal_influence(),
            crouch_multiplier: self.crouch.speed_multiplier(self.state.tick, tuning),
        };
        resolve_horizontal(&mut self.state, &horizontal, tuning, dt);

        let vertical = VerticalIntent {
            input_y: self.input.move_axis.y,
            ended_jump_early: self.jump.ended_jump_early(),
            leaving_wall: self.wall.is_leaving(),
        };
        let feet = self.state.position;
        resolve_vertical(&mut self.state, &vertical, tuning, dt, || {
            probe_ground_normal(&query, feet, tuning)
        });

        let repositioned = self.state.position != start_position;
        let velocity = apply_velocity(&mut self.state, tuning, dt);

        self.handle_interaction(&query, tuning, &mut events);

        self.state.enforce_exclusivity();
        self.check_control_withdrawal(tuning);

        for event in std::mem::take(&mut self.pending) {
            events.push(event);
        }
        self.state.tick += 1;

        TickOutput {
            velocity,
            position: self.state.position,
            repositioned,
            events,
        }
    }

    fn gather_input(&mut self, input: FrameInput, tuning: &MovementTuning) {
        self.input = input.snapped(tuning);

        if self.input.jump_pressed {
            self.jump.request_jump(self.state.tick);
        }
        if self.input.move_axis.x != 0.0 {
            self.sticky_feet = false;
            if self.state.has_control {
                self.state.facing = if self.input.move_axis.x > 0.0 {
                    Facing::Right
                } else {
                    Facing::Left
                };
            }
        }
        if self.input.dash_pressed && tuning.allow_dash {
            self.dash.request_dash();
        }
        if self.input.attack_pressed && tuning.allow_attacks {
            self.attack_to_consume = true;
        }
    }

    fn start_ledge_climb(
        &mut self,
        start: LedgeClimbStart,
        tuning: &MovementTuning,
        events: &mut TickEvents,
    ) {
        events.push(MovementEvent::LedgeClimbChanged {
            into_crouch: start.into_crouch,
        });
        self.take_away_control(true);
        self.state.climbing_ledge = true;
        self.state.grabbing_ledge = false;
        self.state.position = self.ledge.hang_position(tuning);
        debug!(
            "tick {}: ledge climb (into crouch: {})",
            self.state.tick, start.into_crouch
        );
    }

    fn handle_jump(
        &mut self,
        query: &dyn ShapeQuery,
        contacts: &ContactSnapshot,
        tuning: &MovementTuning,
        events: &mut TickEvents,
    ) {
        let Some(kind) = self
            .jump
            .resolve(&self.state, &self.input, &self.wall, tuning)
        else {
            return;
        };

        match kind {
            JumpKind::Wall => {
                self.wall.start_leaving(&self.state);
                self.jump.perform_wall_jump(
                    &mut self.state,
                    self.wall.last_wall_direction(),
                    tuning,
                );
                events.push(MovementEvent::Jumped { wall_jump: true });
            }
            JumpKind::Normal => {
                // Stand up first; a blocked stand-up cancels the jump
                if self.state.crouching
                    && !self
                        .crouch
                        .try_toggle(&mut self.state, query, false, tuning)
                {
                    return;
                }
                self.ladder.set_climbing(
                    &mut self.state,
                    false,
                    contacts.ladder().is_some(),
                    &self.input,
                    &mut self.jump,
                    tuning,
                );
                self.jump.perform_normal_jump(&mut self.state, tuning);
                events.push(MovementEvent::Jumped { wall_jump: false });
            }
            JumpKind::Air => {
                self.jump.perform_air_jump(&mut self.state, tuning);
                events.push(MovementEvent::AirJumped);
            }
        }
    }

    fn handle_attack(&mut self, tuning: &MovementTuning, events: &mut TickEvents) {
        if !self.attack_to_consume {
            return;
        }
        let tick = self.state.tick;
        let ready = self
            .last_attack_tick
            .is_none_or(|last| tick > last + tuning.attack_frame_cooldown as u64);
        if ready {
            self.last_attack_tick = Some(tick);
            events.push(MovementEvent::Attacked);
        }
        self.attack_to_consume = false;
    }

    /// `interactable_detector_size` is the detection radius around the
    /// standing body center.
    fn handle_interaction(
        &mut self,
        query: &dyn ShapeQuery,
        tuning: &MovementTuning,
        events: &mut TickEvents,
    ) {
        if !self.input.interact_pressed || !self.state.has_control {
            return;
        }
        let center = tuning.standing_collider.center(self.state.position);
        let size = Vec2::splat(tuning.interactable_detector_size * 2.0);
        let Some(hit) = query
            .overlap_box(center, size, QueryFilter::Interactable)
            .into_iter()
            .next()
        else {
            return;
        };

        self.take_away_control(true);
        events.push(MovementEvent::Interacted {
            target: hit.collider,
        });
        debug!("tick {}: interacting with {:?}", self.state.tick, hit.collider);
    }

    fn check_control_withdrawal(&mut self, tuning: &MovementTuning) {
        let Some(since) = self.control_withdrawn_at else {
            return;
        };
        let limit = tuning.control_withdrawal_warn_frames as u64;
        if limit > 0 && !self.withdrawal_warned && self.state.tick >= since + limit {
            warn!(
                "control withdrawn at tick {} was never returned ({} ticks ago)",
                since,
                self.state.tick - since
            );
            self.withdrawal_warned = true;
        }
    }
}
