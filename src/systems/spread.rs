use bevy::prelude::*;

use crate::components::{
    AimState, CrosshairSpread, FireCadence, MovementSample, Shooter, SpreadInputs,
};
use crate::resources::ShooterCombatConfig;

/// Recompute the crosshair spread multiplier of every shooter.
///
/// Samples motion, aim state and the post-shot pulse as they stand after
/// this frame's cadence tick.
pub fn update_crosshair_spread(
    time: Res<Time>,
    config: Res<ShooterCombatConfig>,
    mut shooters: Query<
        (&MovementSample, &AimState, &FireCadence, &mut CrosshairSpread),
        With<Shooter>,
    >,
) {
    let dt = time.delta_secs();
    for (movement, aim, cadence, mut spread) in shooters.iter_mut() {
        spread.update(dt, spread_inputs(movement, aim, cadence), &config.spread);
    }
}

pub(crate) fn spread_inputs(
    movement: &MovementSample,
    aim: &AimState,
    cadence: &FireCadence,
) -> SpreadInputs {
    SpreadInputs {
        speed: movement.horizontal_speed(),
        airborne: movement.airborne,
        aiming: aim.is_aiming(),
        pulse_active: cadence.is_bullet_pulse_active(),
    }
}
