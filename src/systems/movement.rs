//! Motion sampling for physics-driven shooters.

use bevy::prelude::*;

use crate::components::MovementSample;

impl MovementSample {
    /// Record a new velocity and derive acceleration from the previous one.
    ///
    /// A zero `dt` keeps the previous acceleration.
    pub fn record_velocity(&mut self, velocity: Vec3, dt: f32) {
        if dt > 0.0 {
            self.acceleration = (velocity - self.velocity) / dt;
        }
        self.velocity = velocity;
    }
}

/// Copy avian's rigid-body velocity into [`MovementSample`].
///
/// The airborne flag is left to the character controller, which owns ground
/// detection.
#[cfg(feature = "dim3")]
pub fn sample_rigid_body_velocity(
    time: Res<Time>,
    mut shooters: Query<
        (&avian3d::prelude::LinearVelocity, &mut MovementSample),
        With<crate::components::Shooter>,
    >,
) {
    let dt = time.delta_secs();
    for (velocity, mut sample) in shooters.iter_mut() {
        sample.record_velocity(velocity.0, dt);
    }
}
