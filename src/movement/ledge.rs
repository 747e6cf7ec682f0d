//! Movement domain: ledge corner detection, grab assist and climb.

use bevy::prelude::*;

use crate::movement::MovementTuning;
use crate::movement::classifier::is_position_clear;
use crate::movement::input::FrameInput;
use crate::movement::math::approach_vec;
use crate::movement::query::{QueryFilter, ShapeQuery};
use crate::movement::state::KinematicState;

/// Find the top corner of the wall on side `wall_direction` with three rays:
/// one just below the grab height that must hit the wall, one just above it
/// that must miss, and one dropped onto the top from above the corner.
pub fn find_ledge_corner(
    query: &dyn ShapeQuery,
    position: Vec2,
    wall_direction: i8,
    tuning: &MovementTuning,
) -> Option<Vec2> {
    if wall_direction == 0 {
        return None;
    }
    let dir = wall_direction as f32;
    let grab_height = position + Vec2::new(0.0, tuning.ledge_grab_point.y);
    let spacing = tuning.ledge_raycast_spacing;
    let reach = tuning.ledge_probe_distance;
    let across = Vec2::new(dir, 0.0);

    let below = query.raycast(
        grab_height - Vec2::new(0.0, spacing),
        across,
        reach,
        QueryFilter::Climbable,
    )?;

    if query
        .raycast(grab_height + Vec2::new(0.0, spacing), across, reach, QueryFilter::Climbable)
        .is_some()
    {
        return None;
    }

    let top = query.raycast(
        grab_height + Vec2::new(dir * reach, spacing),
        Vec2::NEG_Y,
        reach,
        QueryFilter::Climbable,
    )?;

    Some(Vec2::new(below.point.x, top.point.y))
}

/// Request to start a ledge climb, returned to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgeClimbStart {
    pub into_crouch: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgeTracker {
    corner: Vec2,
    direction: i8,
    into_crouch: bool,
}

impl LedgeTracker {
    pub fn corner(&self) -> Vec2 {
        self.corner
    }

    pub fn climbing_into_crouch(&self) -> bool {
        self.into_crouch
    }

    fn side(&self) -> Vec2 {
        Vec2::new(self.direction as f32, 1.0)
    }

    /// Where the body hangs from the current corner.
    pub fn hang_position(&self, tuning: &MovementTuning) -> Vec2 {
        self.corner - tuning.ledge_grab_point * self.side()
    }

    /// Where the body ends up on top of the ledge.
    pub fn stand_position(&self, tuning: &MovementTuning) -> Vec2 {
        self.corner + tuning.stand_up_offset * self.side()
    }

    pub fn update(
        &mut self,
        state: &mut KinematicState,
        query: &dyn ShapeQuery,
        input: &FrameInput,
        tuning: &MovementTuning,
        dt: f32,
    ) -> Option<LedgeClimbStart> {
        if !tuning.allow_ledges || state.climbing_ledge {
            return None;
        }
        if !state.on_wall {
            state.grabbing_ledge = false;
            return None;
        }

        match find_ledge_corner(query, state.position, state.wall_direction, tuning) {
            Some(corner) => {
                if !state.grabbing_ledge {
                    debug!("tick {}: grabbing ledge at {:?}", state.tick, corner);
                }
                self.corner = corner;
                self.direction = state.wall_direction;
                state.grabbing_ledge = true;
            }
            None => {
                state.grabbing_ledge = false;
                return None;
            }
        }

        if input.move_axis.x == 0.0 {
            let target = self.hang_position(tuning);
            state.position =
                approach_vec(state.position, target, tuning.ledge_grab_deceleration * dt);
        }

        let climb_input = input.move_axis.y > tuning.vertical_deadzone
            || input.move_axis.x == state.wall_direction as f32;
        if !climb_input {
            return None;
        }

        let stand = self.stand_position(tuning);
        if is_position_clear(query, stand, &tuning.standing_collider, tuning) {
            self.into_crouch = false;
        } else if tuning.allow_crouching
            && is_position_clear(query, stand, &tuning.crouching_collider, tuning)
        {
            self.into_crouch = true;
        } else {
            return None;
        }
        Some(LedgeClimbStart {
            into_crouch: self.into_crouch,
        })
    }
}
