//! Movement domain: directional dash with a fixed duration and cooldown.

use bevy::prelude::*;

use crate::movement::MovementTuning;
use crate::movement::events::{MovementEvent, TickEvents};
use crate::movement::input::FrameInput;
use crate::movement::state::KinematicState;

#[derive(Debug, Clone, PartialEq)]
pub struct DashController {
    dash_to_consume: bool,
    /// Cleared by a dash, restored on landing (or at the end of a grounded dash).
    can_dash: bool,
    velocity: Vec2,
    started_tick: u64,
    next_dash_tick: u64,
}

impl Default for DashController {
    fn default() -> Self {
        Self {
            dash_to_consume: false,
            can_dash: true,
            velocity: Vec2::ZERO,
            started_tick: 0,
            next_dash_tick: 0,
        }
    }
}

impl DashController {
    pub fn request_dash(&mut self) {
        self.dash_to_consume = true;
    }

    pub fn can_dash(&self) -> bool {
        self.can_dash
    }

    pub fn reset(&mut self) {
        self.can_dash = true;
    }

    pub fn update(
        &mut self,
        state: &mut KinematicState,
        input: &FrameInput,
        tuning: &MovementTuning,
        events: &mut TickEvents,
    ) {
        let ready = self.dash_to_consume
            && self.can_dash
            && !state.crouching
            && !state.dashing
            && state.tick >= self.next_dash_tick
            && tuning.allow_dash
            && tuning.dash_velocity > 0.0;

        if ready {
            let axis = input.move_axis;
            let direction = Vec2::new(axis.x, axis.y.max(0.0)).normalize_or_zero();
            if direction == Vec2::ZERO {
                // No direction held: drop the request, keep the dash
                self.dash_to_consume = false;
                return;
            }

            self.velocity = direction * tuning.dash_velocity;
            self.can_dash = false;
            self.started_tick = state.tick;
            self.next_dash_tick = state.tick + tuning.dash_cooldown_frames as u64;
            state.dashing = true;
            state.external_velocity = Vec2::ZERO;
            events.push(MovementEvent::DashingChanged {
                active: true,
                direction,
            });
            debug!("tick {}: dash {:?}", state.tick, direction);
        }

        if state.dashing {
            state.speed = self.velocity;
            if state.tick > self.started_tick + tuning.dash_duration_frames as u64 {
                state.dashing = false;
                state.speed.y = state.speed.y.min(0.0);
                state.speed.x *= tuning.dash_end_horizontal_multiplier;
                if state.grounded {
                    self.reset();
                }
                events.push(MovementEvent::DashingChanged {
                    active: false,
                    direction: Vec2::ZERO,
                });
                debug!("tick {}: dash ended", state.tick);
            }
        }

        self.dash_to_consume = false;
    }

    /// End a dash early without the end-of-dash speed shaping.
    pub fn cancel(&mut self, state: &mut KinematicState, events: &mut TickEvents) {
        if state.dashing {
            state.dashing = false;
            events.push(MovementEvent::DashingChanged {
                active: false,
                direction: Vec2::ZERO,
            });
        }
    }
}
