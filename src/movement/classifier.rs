//! Movement domain: turns raw shape queries into contact facts.

use bevy::prelude::*;

use crate::movement::MovementTuning;
use crate::movement::events::{MovementEvent, TickEvents};
use crate::movement::math::approx_eq;
use crate::movement::query::{OverlapHit, QueryFilter, ShapeQuery};
use crate::movement::resources::ColliderShape;
use crate::movement::state::KinematicState;

/// What the world looked like around the character at the start of a tick.
/// Built fresh every tick and discarded at its end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactSnapshot {
    pub ground_hits: usize,
    pub ceiling_hits: usize,
    pub wall_hits: Vec<OverlapHit>,
    pub ladder_hits: Vec<OverlapHit>,
    /// The active collider is blocked in the direction of horizontal input.
    pub pushing_wall: bool,
}

impl ContactSnapshot {
    pub fn gather(
        query: &dyn ShapeQuery,
        state: &KinematicState,
        collider: &ColliderShape,
        move_x: f32,
        tuning: &MovementTuning,
    ) -> Self {
        let center = collider.center(state.position);
        let size = collider.size;

        let ground_hits = query
            .cast_capsule(center, size, Vec2::NEG_Y, tuning.grounder_distance, QueryFilter::Solid)
            .len();
        let ceiling_hits = query
            .cast_capsule(center, size, Vec2::Y, tuning.grounder_distance, QueryFilter::Solid)
            .len();

        // Walls and ladders share one detector box around the standing body
        let detector_center = tuning.standing_collider.center(state.position);
        let wall_hits =
            query.overlap_box(detector_center, tuning.wall_detector_size, QueryFilter::Climbable);
        let ladder_hits =
            query.overlap_box(detector_center, tuning.wall_detector_size, QueryFilter::Ladder);

        let pushing_wall = move_x != 0.0
            && !query
                .cast_capsule(
                    center,
                    size,
                    Vec2::new(move_x.signum(), 0.0),
                    tuning.grounder_distance,
                    QueryFilter::Solid,
                )
                .is_empty();

        Self {
            ground_hits,
            ceiling_hits,
            wall_hits,
            ladder_hits,
            pushing_wall,
        }
    }

    /// Side of the first wall contact relative to `x`: -1, 0 or 1.
    pub fn wall_direction(&self, x: f32) -> i8 {
        match self.wall_hits.first() {
            Some(hit) if hit.point.x > x => 1,
            Some(hit) if hit.point.x < x => -1,
            _ => 0,
        }
    }

    pub fn ladder(&self) -> Option<&OverlapHit> {
        self.ladder_hits.first()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroundTransition {
    None,
    Landed { impact_speed: f32 },
    Left,
}

/// Apply this tick's ground and ceiling contacts to the state.
pub fn classify(
    state: &mut KinematicState,
    contacts: &ContactSnapshot,
    events: &mut TickEvents,
) -> GroundTransition {
    if contacts.ceiling_hits > 0 {
        // Moving upward into a ceiling must not stick to it
        state.external_velocity.y = state.external_velocity.y.min(0.0);
        state.speed.y = state.speed.y.min(0.0);
    }

    if !state.grounded && contacts.ground_hits > 0 {
        state.grounded = true;
        let impact_speed = state.speed.y.abs();
        events.push(MovementEvent::GroundedChanged {
            landed: true,
            impact_speed,
        });
        debug!("tick {}: landed, impact {:.2}", state.tick, impact_speed);
        GroundTransition::Landed { impact_speed }
    } else if state.grounded && contacts.ground_hits == 0 {
        state.grounded = false;
        state.last_grounded_tick = Some(state.tick);
        events.push(MovementEvent::GroundedChanged {
            landed: false,
            impact_speed: 0.0,
        });
        debug!("tick {}: left ground", state.tick);
        GroundTransition::Left
    } else {
        GroundTransition::None
    }
}

/// Short downward probe from the feet. Returns the surface normal if any.
pub fn probe_ground_normal(
    query: &dyn ShapeQuery,
    position: Vec2,
    tuning: &MovementTuning,
) -> Option<Vec2> {
    query
        .raycast(position, Vec2::NEG_Y, tuning.grounder_distance * 2.0, QueryFilter::Solid)
        .map(|hit| hit.normal)
}

/// A ground normal whose vertical component is not ~1 means a slope.
pub fn is_slope(normal: Vec2) -> bool {
    !approx_eq(normal.y, 1.0)
}

/// True when `collider` placed at `position` (shrunk by the skin width)
/// overlaps nothing solid.
pub fn is_position_clear(
    query: &dyn ShapeQuery,
    position: Vec2,
    collider: &ColliderShape,
    tuning: &MovementTuning,
) -> bool {
    let size = (collider.size - Vec2::splat(tuning.skin_width)).max(Vec2::ZERO);
    !query.overlap_capsule(collider.center(position), size, QueryFilter::Solid)
}
