//! Movement domain: crouch toggle with a headroom veto.

use bevy::prelude::*;

use crate::movement::MovementTuning;
use crate::movement::classifier::is_position_clear;
use crate::movement::input::FrameInput;
use crate::movement::math::progress;
use crate::movement::query::ShapeQuery;
use crate::movement::state::KinematicState;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrouchController {
    started_tick: u64,
}

impl CrouchController {
    pub fn update(
        &mut self,
        state: &mut KinematicState,
        query: &dyn ShapeQuery,
        input: &FrameInput,
        tuning: &MovementTuning,
    ) {
        if !tuning.allow_crouching {
            return;
        }

        let pressed = input.move_axis.y < -tuning.vertical_deadzone;
        if !state.crouching && pressed && state.grounded {
            self.try_toggle(state, query, true, tuning);
        } else if state.crouching && (!pressed || !state.grounded) {
            self.try_toggle(state, query, false, tuning);
        }
    }

    fn can_stand(state: &KinematicState, query: &dyn ShapeQuery, tuning: &MovementTuning) -> bool {
        let probe = state.position + Vec2::new(0.0, tuning.crouch_buffer_check);
        is_position_clear(query, probe, &tuning.standing_collider, tuning)
    }

    /// Returns false when standing up is blocked; the body stays crouched.
    pub fn try_toggle(
        &mut self,
        state: &mut KinematicState,
        query: &dyn ShapeQuery,
        crouch: bool,
        tuning: &MovementTuning,
    ) -> bool {
        if state.crouching && !Self::can_stand(state, query, tuning) {
            return false;
        }
        self.set(state, crouch);
        true
    }

    /// Crouch without a headroom check; used when climbing into a low gap.
    pub fn force_crouch(&mut self, state: &mut KinematicState) {
        self.set(state, true);
    }

    fn set(&mut self, state: &mut KinematicState, crouch: bool) {
        if crouch && !state.crouching {
            self.started_tick = state.tick;
            debug!("tick {}: crouch", state.tick);
        } else if !crouch && state.crouching {
            debug!("tick {}: stand", state.tick);
        }
        state.crouching = crouch;
    }

    /// Max speed multiplier: eases from 1 to the crouch penalty over
    /// `crouch_slowdown_frames`, then holds.
    pub fn speed_multiplier(&self, tick: u64, tuning: &MovementTuning) -> f32 {
        let elapsed = tick.saturating_sub(self.started_tick) as f32;
        let t = progress(0.0, tuning.crouch_slowdown_frames as f32, elapsed);
        1.0 + (tuning.crouch_speed_penalty - 1.0) * t
    }
}
