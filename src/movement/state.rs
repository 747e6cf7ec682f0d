//! Movement domain: the kinematic state shared by every sub-controller.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }
}

/// State owned by one character controller.
///
/// Only the tick orchestrator mutates it. Sub-controllers receive it by
/// reference for the duration of a tick and never hold on to it.
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicState {
    pub position: Vec2,
    /// Player-driven speed.
    pub speed: Vec2,
    /// Impulse-driven velocity that decays on its own.
    pub external_velocity: Vec2,
    /// Last velocity handed to the body, or the one the physics engine
    /// measured when the body is synced.
    pub velocity: Vec2,
    /// Index of the tick being simulated. The first tick is 0.
    pub tick: u64,
    pub last_grounded_tick: Option<u64>,
    pub ground_normal: Vec2,
    pub facing: Facing,
    pub has_control: bool,

    pub grounded: bool,
    pub on_wall: bool,
    /// -1 or 1 while on a wall, 0 otherwise.
    pub wall_direction: i8,
    pub climbing_ladder: bool,
    pub grabbing_ledge: bool,
    pub climbing_ledge: bool,
    pub crouching: bool,
    pub dashing: bool,
}

impl KinematicState {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            speed: Vec2::ZERO,
            external_velocity: Vec2::ZERO,
            velocity: Vec2::ZERO,
            tick: 0,
            last_grounded_tick: None,
            ground_normal: Vec2::Y,
            facing: Facing::default(),
            has_control: true,
            grounded: false,
            on_wall: false,
            wall_direction: 0,
            climbing_ladder: false,
            grabbing_ledge: false,
            climbing_ledge: false,
            crouching: false,
            dashing: false,
        }
    }

    /// Repair states that correct transitions never produce. Grounded wins
    /// over on-wall, and a ledge climb ends any dash. Returns true when
    /// something had to be repaired.
    pub fn enforce_exclusivity(&mut self) -> bool {
        let mut repaired = false;

        if self.grounded && self.on_wall {
            warn!(
                "tick {}: grounded and on-wall at once, clearing on-wall",
                self.tick
            );
            self.on_wall = false;
            self.wall_direction = 0;
            self.grabbing_ledge = false;
            repaired = true;
        }

        if self.on_wall == (self.wall_direction == 0) {
            warn!(
                "tick {}: wall direction {} disagrees with on-wall {}",
                self.tick, self.wall_direction, self.on_wall
            );
            if !self.on_wall {
                self.wall_direction = 0;
            } else {
                self.on_wall = false;
                self.grabbing_ledge = false;
            }
            repaired = true;
        }

        if self.climbing_ledge && self.dashing {
            warn!("tick {}: dashing during a ledge climb, ending dash", self.tick);
            self.dashing = false;
            repaired = true;
        }

        repaired
    }
}
