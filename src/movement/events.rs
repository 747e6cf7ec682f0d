//! Movement domain: one-shot events produced by a controller tick.

use bevy::ecs::message::Message;
use bevy::prelude::*;

use crate::movement::query::ColliderId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MovementEvent {
    /// `landed` is false when leaving the ground; `impact_speed` is the
    /// vertical speed at touchdown and 0 on leaving.
    GroundedChanged { landed: bool, impact_speed: f32 },
    /// `direction` is zero when the dash ends.
    DashingChanged { active: bool, direction: Vec2 },
    WallGrabChanged { active: bool },
    LedgeClimbChanged { into_crouch: bool },
    Jumped { wall_jump: bool },
    AirJumped,
    Attacked,
    /// Control has been withdrawn; the interactable must hand it back.
    Interacted { target: ColliderId },
}

/// Events of a single tick, in the order they happened.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickEvents(Vec<MovementEvent>);

impl TickEvents {
    pub fn push(&mut self, event: MovementEvent) {
        self.0.push(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &MovementEvent> {
        self.0.iter()
    }

    pub fn contains(&self, event: &MovementEvent) -> bool {
        self.0.contains(event)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl IntoIterator for TickEvents {
    type Item = MovementEvent;
    type IntoIter = std::vec::IntoIter<MovementEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A controller event tagged with the body that produced it.
#[derive(Debug)]
pub struct MovementEventMessage {
    pub entity: Entity,
    pub event: MovementEvent,
}

impl Message for MovementEventMessage {}
