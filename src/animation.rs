use bevy::platform::collections::HashMap;
use bevy::prelude::*;

/// Names of the parameters the controller writes to [`StrafeAnimationParameters`].
pub mod parameter_names {
    /// Damped float: how much of the movement is along the character's right axis (`-1..=1`).
    pub const X_VELOCITY: &str = "x_velocity";
    /// Damped float: how much of the movement is along the character's forward axis (`-1..=1`).
    pub const Z_VELOCITY: &str = "z_velocity";
    /// Bool: the character is running (and not just holding the run button).
    pub const IS_RUNNING: &str = "is_running";
    /// Trigger: the fire action was performed.
    pub const FIRE: &str = "fire";
}

/// The animation parameters of a character.
///
/// Strafe does not play animations. It writes parameters here - named floats, named bools and
/// named one-shot triggers - and it is up to a user system to read them and drive Bevy's
/// `AnimationPlayer` (or anything else). See [`parameter_names`] for the parameters the
/// controller writes.
///
/// Triggers are queued: every time a trigger is set it must be consumed separately, so two
/// shots fired in the same tick are two `"fire"` triggers.
#[derive(Component, Default, Debug)]
pub struct StrafeAnimationParameters {
    floats: HashMap<&'static str, DampedFloat>,
    bools: HashMap<&'static str, bool>,
    triggers: Vec<&'static str>,
}

#[derive(Default, Debug, Clone, Copy)]
struct DampedFloat {
    value: f32,
    velocity: f32,
}

impl StrafeAnimationParameters {
    /// Set a float parameter immediately.
    pub fn set_float(&mut self, name: &'static str, value: f32) {
        self.floats.insert(name, DampedFloat { value, velocity: 0.0 });
    }

    /// Move a float parameter toward `target`, reaching it after roughly `damp_time` seconds.
    pub fn set_float_damped(
        &mut self,
        name: &'static str,
        target: f32,
        damp_time: f32,
        frame_duration: f32,
    ) {
        let entry = self.floats.entry(name).or_default();
        entry.value = smooth_damp(
            entry.value,
            target,
            &mut entry.velocity,
            damp_time,
            frame_duration,
        );
    }

    /// The current value of a float parameter. Parameters that were never set are `0.0`.
    pub fn float(&self, name: &str) -> f32 {
        self.floats.get(name).map_or(0.0, |entry| entry.value)
    }

    pub fn set_bool(&mut self, name: &'static str, value: bool) {
        self.bools.insert(name, value);
    }

    /// The current value of a bool parameter. Parameters that were never set are `false`.
    pub fn bool(&self, name: &str) -> bool {
        self.bools.get(name).copied().unwrap_or(false)
    }

    /// Queue a one-shot trigger.
    pub fn set_trigger(&mut self, name: &'static str) {
        self.triggers.push(name);
    }

    /// How many times the trigger was set and not yet consumed.
    pub fn pending_triggers(&self, name: &str) -> usize {
        self.triggers
            .iter()
            .filter(|trigger| **trigger == name)
            .count()
    }

    /// Consume one pending occurrence of the trigger. Returns `false` if there was none.
    pub fn take_trigger(&mut self, name: &str) -> bool {
        if let Some(index) = self.triggers.iter().position(|trigger| *trigger == name) {
            self.triggers.remove(index);
            true
        } else {
            false
        }
    }

    /// Consume all the pending triggers, in the order they were set.
    pub fn drain_triggers(&mut self) -> impl Iterator<Item = &'static str> + '_ {
        self.triggers.drain(..)
    }
}

/// Critically damped approach of `current` toward `target`.
///
/// `velocity` carries the rate of change between calls and should start at `0.0`.
/// `smooth_time` is approximately the time it takes to reach the target. The result never
/// overshoots the target.
pub fn smooth_damp(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    frame_duration: f32,
) -> f32 {
    if frame_duration <= 0.0 {
        return current;
    }
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;

    let x = omega * frame_duration;
    // Approximation of exp(-x)
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * frame_duration;
    *velocity = (*velocity - omega * temp) * exp;
    let output = target + (change + temp) * exp;

    if (target - current > 0.0) == (output > target) {
        *velocity = 0.0;
        target
    } else {
        output
    }
}

/// Project the horizontal movement direction onto the body's right and forward axes.
///
/// Returns `(x, z)` - the inputs of [`parameter_names::X_VELOCITY`] and
/// [`parameter_names::Z_VELOCITY`]. Only the direction of the movement matters, not its
/// magnitude.
pub fn project_onto_body(horizontal_intent: Vec3, rotation: Quat) -> (f32, f32) {
    let direction = horizontal_intent.with_y(0.0).normalize_or_zero();
    let right = rotation * Vec3::X;
    let forward = rotation * Vec3::NEG_Z;
    (direction.dot(right), direction.dot(forward))
}
