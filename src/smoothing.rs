//! Scalar smoothing helpers shared by the camera, spread and animation code.

/// Squared distance below which [`interp_to`] settles exactly on its target.
const SETTLE_EPSILON_SQ: f32 = 1.0e-8;

/// Move `current` toward `target` by the fraction `dt * speed` of the gap.
///
/// This is a time-constant (exponential) approach: every call strictly shrinks
/// the remaining distance and never crosses the target, because the step
/// fraction is clamped to `[0, 1]`. A non-positive `speed` snaps to the target,
/// and gaps smaller than `1e-4` settle exactly so callers can compare against
/// the target value.
///
/// # Example
/// ```
/// use bevy_shooter_combat::smoothing::interp_to;
///
/// let next = interp_to(0.0, 1.0, 0.01, 30.0);
/// assert!(next > 0.0 && next < 1.0);
/// ```
pub fn interp_to(current: f32, target: f32, dt: f32, speed: f32) -> f32 {
    if speed <= 0.0 {
        return target;
    }

    let gap = target - current;
    if gap * gap < SETTLE_EPSILON_SQ {
        return target;
    }

    current + gap * (dt * speed).clamp(0.0, 1.0)
}

/// Linearly remap `value` from `input` to `output`, clamped to `output`.
///
/// A degenerate input range maps everything to the start of `output`.
pub fn map_range_clamped(value: f32, input: (f32, f32), output: (f32, f32)) -> f32 {
    let span = input.1 - input.0;
    if span.abs() <= f32::EPSILON {
        return output.0;
    }

    let alpha = ((value - input.0) / span).clamp(0.0, 1.0);
    output.0 + (output.1 - output.0) * alpha
}

/// Wrap an angle in degrees into `(-180, 180]`.
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}
