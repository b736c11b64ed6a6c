use bevy::prelude::*;

use crate::components::{AimState, AnimationProperties, ControlRotation, MovementSample, Shooter};
use crate::smoothing::normalize_degrees;

/// Refresh the values the animation layer blends on.
pub fn update_animation_properties(
    mut shooters: Query<
        (
            &MovementSample,
            &ControlRotation,
            &AimState,
            &mut AnimationProperties,
        ),
        With<Shooter>,
    >,
) {
    for (movement, rotation, aim, mut properties) in shooters.iter_mut() {
        properties.refresh(movement, rotation, aim.is_aiming());
    }
}

impl AnimationProperties {
    /// Recompute every property from this frame's motion and aim.
    ///
    /// `last_movement_offset_yaw` keeps its value while the character stands
    /// still so stop animations can blend from the last direction of travel.
    pub fn refresh(
        &mut self,
        movement: &MovementSample,
        rotation: &ControlRotation,
        aiming: bool,
    ) {
        self.speed = movement.horizontal_speed();
        self.is_in_air = movement.airborne;
        self.is_accelerating = movement.acceleration.length_squared() > 0.0;
        self.aiming = aiming;

        self.movement_offset_yaw =
            normalize_degrees(movement_yaw(movement.velocity) - rotation.yaw);
        if movement.velocity.length_squared() > 0.0 {
            self.last_movement_offset_yaw = self.movement_offset_yaw;
        }
    }
}

/// Heading of `velocity` in degrees, positive to the right of -Z.
fn movement_yaw(velocity: Vec3) -> f32 {
    let heading = Vec2::new(velocity.x, -velocity.z);
    if heading == Vec2::ZERO {
        return 0.0;
    }
    heading.x.atan2(heading.y).to_degrees()
}
