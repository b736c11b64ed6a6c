//! Aim-state driven camera zoom and look sensitivity.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::components::{
    AimState, CameraZoom, ControlRotation, LookRates, Shooter, ShooterCamera,
};
use crate::events::{LookInput, LookSource};
use crate::resources::ShooterCombatConfig;

/// Interpolate each shooter's FOV toward the zoomed or default value.
pub fn update_camera_zoom(
    time: Res<Time>,
    config: Res<ShooterCombatConfig>,
    mut shooters: Query<(&AimState, &mut CameraZoom), With<Shooter>>,
) {
    let dt = time.delta_secs();
    for (aim, mut zoom) in shooters.iter_mut() {
        zoom.update(dt, aim.is_aiming(), &config.camera);
    }
}

/// Switch look rates between hip and aiming values. Not interpolated.
pub fn update_look_rates(
    config: Res<ShooterCombatConfig>,
    mut shooters: Query<(&AimState, &mut LookRates), With<Shooter>>,
) {
    for (aim, mut rates) in shooters.iter_mut() {
        rates.set_if_neq(LookRates::for_aim_state(aim.is_aiming(), &config.look));
    }
}

/// Accumulate look messages into the controller rotation.
///
/// Gamepad values are rates and are scaled by the frame time; mouse values
/// are already per-frame deltas.
pub fn apply_look_input(
    time: Res<Time>,
    config: Res<ShooterCombatConfig>,
    mut looks: MessageReader<LookInput>,
    mut shooters: Query<(&LookRates, &mut ControlRotation), With<Shooter>>,
) {
    let dt = time.delta_secs();
    for look in looks.read() {
        let Ok((rates, mut rotation)) = shooters.get_mut(look.shooter) else {
            continue;
        };
        let delta = match look.source {
            LookSource::Gamepad => rates.gamepad_delta(look.value, dt),
            LookSource::Mouse => rates.mouse_delta(look.value, &config.look),
        };
        rotation.apply(delta, &config.look);
    }
}

/// Push the current FOV into the shooter's perspective camera.
pub fn sync_camera_fov(
    shooters: Query<(&CameraZoom, &ShooterCamera), With<Shooter>>,
    mut cameras: Query<&mut Projection>,
) {
    for (zoom, camera) in shooters.iter() {
        let Ok(mut projection) = cameras.get_mut(camera.0) else {
            continue;
        };
        if let Projection::Perspective(perspective) = &mut *projection {
            perspective.fov = zoom.current_fov.to_radians();
        }
    }
}
