//! Movement domain: coyote time, jump buffering, wall and air jumps.

use bevy::prelude::*;

use crate::movement::MovementTuning;
use crate::movement::input::FrameInput;
use crate::movement::math::approach;
use crate::movement::state::KinematicState;
use crate::movement::wall::WallTracker;

/// Which jump a pending request resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    Wall,
    /// Ground, ladder or coyote jump.
    Normal,
    Air,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JumpController {
    jump_to_consume: bool,
    requested_tick: Option<u64>,
    buffered_jump_usable: bool,
    coyote_usable: bool,
    wall_jump_coyote_usable: bool,
    ended_jump_early: bool,
    air_jumps_remaining: u8,
    /// Horizontal input influence; 0 right after a wall jump, back to 1
    /// over `wall_jump_input_loss_frames`.
    horizontal_influence: f32,
}

impl JumpController {
    pub fn new(tuning: &MovementTuning) -> Self {
        Self {
            jump_to_consume: false,
            requested_tick: None,
            buffered_jump_usable: false,
            coyote_usable: false,
            wall_jump_coyote_usable: false,
            ended_jump_early: false,
            air_jumps_remaining: tuning.max_air_jumps,
            horizontal_influence: 1.0,
        }
    }

    pub fn request_jump(&mut self, tick: u64) {
        self.jump_to_consume = true;
        self.requested_tick = Some(tick);
    }

    pub fn air_jumps_remaining(&self) -> u8 {
        self.air_jumps_remaining
    }

    pub fn ended_jump_early(&self) -> bool {
        self.ended_jump_early
    }

    pub fn horizontal_influence(&self) -> f32 {
        self.horizontal_influence
    }

    /// Move the post-wall-jump input influence one tick back toward 1.
    pub fn restore_influence(&mut self, tuning: &MovementTuning) {
        let step = match tuning.wall_jump_input_loss_frames {
            0 => 1.0,
            frames => 1.0 / frames as f32,
        };
        self.horizontal_influence = approach(self.horizontal_influence, 1.0, step);
    }

    fn has_buffered_jump(&self, tick: u64, tuning: &MovementTuning) -> bool {
        self.buffered_jump_usable
            && self
                .requested_tick
                .is_some_and(|requested| tick <= requested + tuning.jump_buffer_frames as u64)
    }

    fn can_use_coyote(&self, state: &KinematicState, tuning: &MovementTuning) -> bool {
        self.coyote_usable
            && !state.grounded
            && state
                .last_grounded_tick
                .is_some_and(|left| state.tick <= left + tuning.coyote_frames as u64)
    }

    fn can_wall_jump(&self, state: &KinematicState, wall: &WallTracker, tuning: &MovementTuning) -> bool {
        if !tuning.allow_walls {
            return false;
        }
        let on_wall = state.on_wall && !wall.is_leaving();
        let coyote = self.wall_jump_coyote_usable
            && wall
                .left_wall_tick()
                .is_some_and(|left| state.tick <= left + tuning.wall_jump_coyote_frames as u64);
        on_wall || coyote
    }

    fn can_air_jump(&self, state: &KinematicState) -> bool {
        !state.grounded && self.air_jumps_remaining > 0
    }

    /// Decide which jump, if any, the pending request turns into this tick.
    ///
    /// A fresh press is always consumed here. A buffered press stays
    /// retryable on later ticks until its window runs out or a jump uses it.
    /// Air jumps need a fresh press; the buffer only ever lands on the
    /// ground, a wall or a ladder.
    pub fn resolve(
        &mut self,
        state: &KinematicState,
        input: &FrameInput,
        wall: &WallTracker,
        tuning: &MovementTuning,
    ) -> Option<JumpKind> {
        if !self.ended_jump_early
            && !state.grounded
            && !input.jump_held
            && state.velocity.y > 0.0
        {
            self.ended_jump_early = true;
        }

        if !self.jump_to_consume && !self.has_buffered_jump(state.tick, tuning) {
            return None;
        }

        let kind = if self.can_wall_jump(state, wall, tuning) {
            Some(JumpKind::Wall)
        } else if state.grounded || state.climbing_ladder || self.can_use_coyote(state, tuning) {
            Some(JumpKind::Normal)
        } else if self.jump_to_consume && self.can_air_jump(state) {
            Some(JumpKind::Air)
        } else {
            None
        };

        self.jump_to_consume = false;
        kind
    }

    pub fn perform_normal_jump(&mut self, state: &mut KinematicState, tuning: &MovementTuning) {
        self.ended_jump_early = false;
        // One press must not feed both this jump and a later buffered one
        self.requested_tick = None;
        self.buffered_jump_usable = false;
        self.coyote_usable = false;
        state.speed.y = tuning.jump_power;
        debug!("tick {}: jump", state.tick);
    }

    pub fn perform_wall_jump(
        &mut self,
        state: &mut KinematicState,
        last_wall_direction: i8,
        tuning: &MovementTuning,
    ) {
        self.ended_jump_early = false;
        self.buffered_jump_usable = false;
        self.wall_jump_coyote_usable = false;
        self.requested_tick = None;
        self.horizontal_influence = 0.0;
        state.speed = tuning.wall_jump_power * Vec2::new(-(last_wall_direction as f32), 1.0);
        debug!(
            "tick {}: wall jump away from {}",
            state.tick, last_wall_direction
        );
    }

    pub fn perform_air_jump(&mut self, state: &mut KinematicState, tuning: &MovementTuning) {
        self.ended_jump_early = false;
        self.requested_tick = None;
        self.air_jumps_remaining = self.air_jumps_remaining.saturating_sub(1);
        state.speed.y = tuning.jump_power;
        state.external_velocity.y = 0.0;
        debug!(
            "tick {}: air jump, {} remaining",
            state.tick, self.air_jumps_remaining
        );
    }

    /// Landing makes every kind of jump usable again.
    pub fn reset(&mut self, tuning: &MovementTuning) {
        self.coyote_usable = true;
        self.buffered_jump_usable = true;
        self.ended_jump_early = false;
        self.reset_air_jumps(tuning);
    }

    pub fn on_wall_stick(&mut self, tuning: &MovementTuning) {
        self.buffered_jump_usable = true;
        self.wall_jump_coyote_usable = true;
        self.reset_air_jumps(tuning);
    }

    pub fn reset_air_jumps(&mut self, tuning: &MovementTuning) {
        self.air_jumps_remaining = tuning.max_air_jumps;
    }
}
