use bevy::prelude::*;

use crate::components::{LastShot, Shooter};

/// Draw debug gizmos for the most recent shot of every shooter.
///
/// Yellow marks the crosshair target, green the confirmed beam. A shot whose
/// weapon trace missed shows a red line from the muzzle to the target.
pub fn draw_last_shot_debug(
    mut gizmos: Gizmos,
    query: Query<&LastShot, With<Shooter>>,
    config: Res<crate::resources::ShooterCombatConfig>,
) {
    if !config.debug_draw {
        return;
    }

    for shot in query.iter() {
        if let Some(aim_point) = shot.aim_point {
            gizmos.sphere(aim_point, 0.1, Color::srgb(1.0, 1.0, 0.0));
        }

        match (shot.impact, shot.aim_point) {
            (Some(impact), _) => {
                gizmos.sphere(impact, 0.05, Color::srgb(0.0, 1.0, 0.0));
                gizmos.line(shot.muzzle, impact, Color::srgb(0.0, 1.0, 0.0));
            }
            (None, Some(aim_point)) => {
                gizmos.line(shot.muzzle, aim_point, Color::srgb(1.0, 0.0, 0.0));
            }
            (None, None) => {}
        }
    }
}
