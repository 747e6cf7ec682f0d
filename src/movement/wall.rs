//! Movement domain: wall stick and slide.

use bevy::prelude::*;

use crate::movement::MovementTuning;
use crate::movement::classifier::ContactSnapshot;
use crate::movement::events::{MovementEvent, TickEvents};
use crate::movement::input::FrameInput;
use crate::movement::jump::JumpController;
use crate::movement::state::KinematicState;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WallTracker {
    /// Side of the wall contact this tick, whether or not we stick to it.
    contact_direction: i8,
    /// Kept after leaving so a coyote wall jump still pushes away from it.
    last_wall_direction: i8,
    left_wall_tick: Option<u64>,
    /// Set by a wall jump so the wall we jumped off does not grab us again
    /// before we have cleared it.
    leaving: bool,
}

impl WallTracker {
    pub fn last_wall_direction(&self) -> i8 {
        self.last_wall_direction
    }

    pub fn left_wall_tick(&self) -> Option<u64> {
        self.left_wall_tick
    }

    pub fn is_leaving(&self) -> bool {
        self.leaving
    }

    /// Mark a wall jump off the wall we are on. Coyote wall jumps leave no
    /// wall behind and do not set it.
    pub fn start_leaving(&mut self, state: &KinematicState) {
        if state.on_wall {
            self.leaving = true;
        }
    }

    pub fn update(
        &mut self,
        state: &mut KinematicState,
        contacts: &ContactSnapshot,
        input: &FrameInput,
        jump: &mut JumpController,
        tuning: &MovementTuning,
        events: &mut TickEvents,
    ) {
        if !tuning.allow_walls {
            return;
        }

        self.contact_direction = contacts.wall_direction(state.position.x);
        if self.contact_direction != 0 {
            self.last_wall_direction = self.contact_direction;
        }

        let should_stick = self.should_stick(state, input, tuning);
        if !state.on_wall && should_stick && state.speed.y <= 0.0 {
            self.stick(state, jump, tuning, events);
        } else if state.on_wall && !should_stick {
            self.leave(state, jump, tuning, events);
        }

        state.wall_direction = if state.on_wall {
            self.contact_direction
        } else {
            0
        };
    }

    fn should_stick(&self, state: &KinematicState, input: &FrameInput, tuning: &MovementTuning) -> bool {
        if self.contact_direction == 0 || state.grounded {
            return false;
        }
        let x = input.move_axis.x;
        !tuning.require_input_push
            || (x.abs() > tuning.horizontal_deadzone && x.signum() as i8 == self.contact_direction)
    }

    fn stick(
        &mut self,
        state: &mut KinematicState,
        jump: &mut JumpController,
        tuning: &MovementTuning,
        events: &mut TickEvents,
    ) {
        state.on_wall = true;
        state.speed = Vec2::ZERO;
        state.external_velocity = Vec2::ZERO;
        jump.on_wall_stick(tuning);
        events.push(MovementEvent::WallGrabChanged { active: true });
        debug!("tick {}: grabbed wall on side {}", state.tick, self.contact_direction);
    }

    pub fn leave(
        &mut self,
        state: &mut KinematicState,
        jump: &mut JumpController,
        tuning: &MovementTuning,
        events: &mut TickEvents,
    ) {
        if !state.on_wall {
            return;
        }
        state.on_wall = false;
        state.wall_direction = 0;
        state.grabbing_ledge = false;
        self.left_wall_tick = Some(state.tick);
        self.leaving = false;
        // Air jumps stay available whether or not we left with a wall jump
        jump.reset_air_jumps(tuning);
        events.push(MovementEvent::WallGrabChanged { active: false });
        debug!("tick {}: left wall", state.tick);
    }
}
