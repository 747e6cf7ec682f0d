//! Movement domain: ladder mount, dismount and centering.

use bevy::prelude::*;

use crate::movement::MovementTuning;
use crate::movement::classifier::ContactSnapshot;
use crate::movement::input::FrameInput;
use crate::movement::jump::JumpController;
use crate::movement::math::smooth_damp;
use crate::movement::state::KinematicState;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LadderTracker {
    left_ladder_tick: Option<u64>,
    snap_velocity: f32,
}

impl LadderTracker {
    fn can_enter(&self, state: &KinematicState, contacts: &ContactSnapshot, tuning: &MovementTuning) -> bool {
        contacts.ladder().is_some()
            && self
                .left_ladder_tick
                .is_none_or(|left| state.tick > left + tuning.ladder_cooldown_frames as u64)
    }

    fn should_mount(state: &KinematicState, input: &FrameInput, tuning: &MovementTuning) -> bool {
        let y = input.move_axis.y;
        tuning.auto_attach_to_ladders
            || y > tuning.vertical_deadzone
            || (!state.grounded && y < -tuning.vertical_deadzone)
    }

    fn should_dismount(state: &KinematicState, input: &FrameInput, tuning: &MovementTuning) -> bool {
        !tuning.auto_attach_to_ladders
            && state.grounded
            && input.move_axis.y < -tuning.vertical_deadzone
    }

    pub fn update(
        &mut self,
        state: &mut KinematicState,
        contacts: &ContactSnapshot,
        input: &FrameInput,
        jump: &mut JumpController,
        tuning: &MovementTuning,
        dt: f32,
    ) {
        if !tuning.allow_ladders {
            return;
        }

        if !state.climbing_ladder
            && self.can_enter(state, contacts, tuning)
            && Self::should_mount(state, input, tuning)
        {
            self.set_climbing(state, true, contacts.ladder().is_some(), input, jump, tuning);
        } else if state.climbing_ladder
            && (contacts.ladder().is_none() || Self::should_dismount(state, input, tuning))
        {
            self.set_climbing(state, false, contacts.ladder().is_some(), input, jump, tuning);
        }

        let centering = tuning.snap_to_ladders && input.move_axis.x == 0.0 && state.has_control;
        if state.climbing_ladder && centering {
            if let Some(ladder) = contacts.ladder() {
                state.position.x = smooth_damp(
                    state.position.x,
                    ladder.center.x,
                    &mut self.snap_velocity,
                    tuning.ladder_snap_time,
                    dt,
                );
            }
        }
    }

    /// Mount or dismount. Dismounting while still touching the ladder starts
    /// the re-mount cooldown, and dismounting upward pops the body off the top.
    pub fn set_climbing(
        &mut self,
        state: &mut KinematicState,
        on: bool,
        touching_ladder: bool,
        input: &FrameInput,
        jump: &mut JumpController,
        tuning: &MovementTuning,
    ) {
        if state.climbing_ladder == on {
            return;
        }

        if on {
            state.speed = Vec2::ZERO;
            self.snap_velocity = 0.0;
            debug!("tick {}: mounted ladder", state.tick);
        } else {
            if touching_ladder {
                self.left_ladder_tick = Some(state.tick);
            }
            if input.move_axis.y > 0.0 {
                state.speed.y += tuning.ladder_pop_force;
            }
            debug!("tick {}: left ladder", state.tick);
        }

        state.climbing_ladder = on;
        jump.reset_air_jumps(tuning);
    }
}
