//! Movement domain: scalar helpers for frame-rate independent easing.

use bevy::prelude::*;

/// Step `current` toward `target` by at most `max_delta`, never overshooting.
pub fn approach(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

pub fn approach_vec(current: Vec2, target: Vec2, max_delta: f32) -> Vec2 {
    let delta = target - current;
    let distance = delta.length();
    if distance <= max_delta || distance == 0.0 {
        target
    } else {
        current + delta / distance * max_delta
    }
}

/// Where `value` sits between `a` and `b`, clamped to [0, 1].
/// A zero-width range counts as fully traversed.
pub fn progress(a: f32, b: f32, value: f32) -> f32 {
    if a == b {
        return 1.0;
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

/// Critically damped spring toward `target` (the classic game-engine
/// `SmoothDamp`). `velocity` carries the spring state between calls.
pub fn smooth_damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    if smooth_time <= 0.0 || dt <= 0.0 {
        *velocity = 0.0;
        return target;
    }

    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);
    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * exp;
    let mut output = target + (change + temp) * exp;

    // Prevent overshooting
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = (output - target) / dt;
    }
    output
}

pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= 1e-5_f32.max(1e-6 * a.abs().max(b.abs()))
}
