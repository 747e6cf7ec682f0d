//! Combat domain: the enemy motor.
//!
//! A much smaller sibling of the player's character controller: walk, turn
//! at walls, chase a nearby player, attack inside a box, and get knocked
//! around with control returning on a timer.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::movement::math::approach;

/// Movement numbers of one enemy kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorTuning {
    /// World units per second.
    pub walk_speed: f32,
    /// Horizontal slowdown while knocked back, units per second squared.
    pub deceleration: f32,
    pub wall_detector_size: Vec2,
    pub search_size: Vec2,
    /// Half extents of the box the player must be inside to be attacked.
    pub attack_size: Vec2,
    pub attack_cooldown_secs: f32,
}

impl Default for MotorTuning {
    fn default() -> Self {
        Self {
            walk_speed: 2.0,
            deceleration: 4.0,
            wall_detector_size: Vec2::new(0.75, 0.25),
            search_size: Vec2::new(15.0, 5.0),
            attack_size: Vec2::new(1.5, 1.0),
            attack_cooldown_secs: 1.0,
        }
    }
}

/// What the enemy perceived this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotorSense {
    pub position: Vec2,
    /// Side of a wall touching the detector box: -1, 0 or 1.
    pub wall_side: i8,
    /// Position of a player inside the search box.
    pub player: Option<Vec2>,
}

#[derive(Component, Debug, Clone)]
pub struct EnemyMotor {
    tuning: MotorTuning,
    disable_timeout: f32,
    direction: f32,
    speed_x: f32,
    has_control: bool,
    disabled_for: f32,
    pending_lift: Option<f32>,
    attack_ready: bool,
    attack_timer: f32,
    tracking: Option<Vec2>,
}

impl EnemyMotor {
    pub fn new(tuning: MotorTuning, disable_timeout: f32) -> Self {
        Self {
            tuning,
            disable_timeout,
            direction: 1.0,
            speed_x: 0.0,
            has_control: true,
            disabled_for: 0.0,
            pending_lift: None,
            attack_ready: true,
            attack_timer: 0.0,
            tracking: None,
        }
    }

    pub fn tuning(&self) -> &MotorTuning {
        &self.tuning
    }

    pub fn has_control(&self) -> bool {
        self.has_control
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking.is_some()
    }

    pub fn facing_left(&self) -> bool {
        self.direction < 0.0
    }

    pub fn apply_knockback(&mut self, knockback: Vec2) {
        self.has_control = false;
        self.disabled_for = 0.0;
        self.speed_x = knockback.x;
        self.pending_lift = Some(knockback.y);
    }

    /// Vertical velocity the last knockback asked for, taken once.
    pub fn take_lift(&mut self) -> Option<f32> {
        self.pending_lift.take()
    }

    fn return_control(&mut self) {
        self.speed_x = 0.0;
        self.has_control = true;
        self.disabled_for = 0.0;
    }

    /// Advance one step and return the horizontal velocity to apply.
    pub fn step(&mut self, sense: &MotorSense, dt: f32) -> f32 {
        if !self.attack_ready {
            if self.attack_timer > self.tuning.attack_cooldown_secs {
                self.attack_ready = true;
                self.attack_timer = 0.0;
            } else {
                self.attack_timer += dt;
            }
        }

        if !self.has_control {
            if self.disabled_for >= self.disable_timeout {
                self.return_control();
            } else {
                self.disabled_for += dt;
            }
        }

        self.tracking = sense.player;
        match self.tracking {
            Some(player) => {
                self.direction = if player.x - sense.position.x > 0.0 {
                    1.0
                } else {
                    -1.0
                };
            }
            // Only turn at a wall we are walking into
            None if sense.wall_side as f32 == self.direction => self.direction = -self.direction,
            None => {}
        }

        if self.has_control {
            self.speed_x = self.direction * self.tuning.walk_speed;
        } else {
            self.speed_x = approach(self.speed_x, 0.0, self.tuning.deceleration * dt);
        }
        self.speed_x
    }

    /// True once per cooldown while the tracked player is inside the
    /// attack box.
    pub fn try_attack(&mut self, position: Vec2) -> bool {
        let Some(player) = self.tracking else {
            return false;
        };
        if !self.attack_ready {
            return false;
        }
        let distance = (player - position).abs();
        if distance.x <= self.tuning.attack_size.x && distance.y <= self.tuning.attack_size.y {
            self.attack_ready = false;
            self.attack_timer = 0.0;
            return true;
        }
        false
    }
}
