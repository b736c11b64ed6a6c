use bevy::prelude::*;

use crate::components::{FireCadence, Shooter};
use crate::resources::ShooterCombatConfig;

/// Advance every shooter's cooldown and pulse countdowns.
///
/// Runs after input. A cooldown armed by this frame's press starts counting
/// down on the next frame, so it lasts the full interval after the shot.
pub fn tick_fire_cadence(
    time: Res<Time>,
    config: Res<ShooterCombatConfig>,
    mut shooters: Query<(Entity, &mut FireCadence), With<Shooter>>,
) {
    let dt = time.delta_secs();
    for (entity, mut cadence) in shooters.iter_mut() {
        let scheduled = cadence.tick(dt, &config.fire);
        if scheduled > 0 {
            trace!("shooter {entity}: automatic fire scheduled {scheduled} shot(s)");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::components::{CadencePhase, FireCadence};
    use crate::resources::FireTuning;

    const DT: f32 = 1.0 / 64.0;

    fn tuning() -> FireTuning {
        FireTuning {
            automatic_fire_interval: 1.0 / 8.0,
            bullet_pulse_duration: 1.0 / 16.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_single_shot_per_press() {
        let tuning = tuning();
        let mut cadence = FireCadence::default();

        assert!(cadence.on_fire_pressed(&tuning));
        assert_eq!(cadence.phase(), CadencePhase::Armed);
        assert_eq!(cadence.take_pending_shots(), 1);
        assert_eq!(cadence.phase(), CadencePhase::Cooling);
        assert!(!cadence.can_fire());

        cadence.on_fire_released();
        for _ in 0..33 {
            assert_eq!(cadence.tick(DT, &tuning), 0);
        }
        assert_eq!(cadence.take_pending_shots(), 0);
        assert_eq!(cadence.phase(), CadencePhase::Idle);
        assert!(cadence.can_fire());
    }

    #[test]
    fn test_tap_blocks_fire_for_full_interval() {
        let tuning = tuning();
        let mut cadence = FireCadence::default();

        // Press frame.
        assert!(cadence.on_fire_pressed(&tuning));
        cadence.on_fire_released();
        cadence.tick(DT, &tuning);
        assert!(!cadence.can_fire());

        for _ in 1..8 {
            cadence.tick(DT, &tuning);
            assert!(!cadence.can_fire());
        }
        cadence.tick(DT, &tuning);
        assert!(cadence.can_fire());
    }

    #[test]
    fn test_press_while_cooling_is_dropped() {
        let tuning = tuning();
        let mut cadence = FireCadence::default();

        assert!(cadence.on_fire_pressed(&tuning));
        cadence.on_fire_released();
        cadence.tick(DT, &tuning);

        assert!(!cadence.on_fire_pressed(&tuning));
        cadence.on_fire_released();
        assert_eq!(cadence.take_pending_shots(), 1);

        // Nothing was queued for when the cooldown ends.
        for _ in 0..16 {
            cadence.tick(DT, &tuning);
        }
        assert_eq!(cadence.take_pending_shots(), 0);
    }

    #[test]
    fn test_held_fire_is_spaced_one_interval_apart() {
        let tuning = tuning();
        let mut cadence = FireCadence::default();
        let mut shot_times = Vec::new();

        // Frame 0 takes the press, then ticks like every frame after it.
        assert!(cadence.on_fire_pressed(&tuning));
        shot_times.push(0.0);
        for frame in 0..64 {
            if cadence.tick(DT, &tuning) > 0 {
                shot_times.push(frame as f32 * DT);
            }
        }

        assert_eq!(shot_times.len(), 8);
        for pair in shot_times.windows(2) {
            assert_eq!(pair[1] - pair[0], tuning.automatic_fire_interval);
        }
        assert_eq!(cadence.take_pending_shots(), 8);
    }

    #[test]
    fn test_large_frame_schedules_every_elapsed_shot() {
        let tuning = tuning();
        let mut cadence = FireCadence::default();

        cadence.on_fire_pressed(&tuning);
        cadence.take_pending_shots();
        assert_eq!(cadence.tick(DT, &tuning), 0);
        assert_eq!(cadence.tick(3.0 / 8.0, &tuning), 3);
        assert_eq!(cadence.take_pending_shots(), 3);
    }

    #[test]
    fn test_release_stops_automatic_fire() {
        let tuning = tuning();
        let mut cadence = FireCadence::default();

        cadence.on_fire_pressed(&tuning);
        for _ in 0..9 {
            cadence.tick(DT, &tuning);
        }
        assert_eq!(cadence.take_pending_shots(), 2);

        cadence.on_fire_released();
        for _ in 0..64 {
            cadence.tick(DT, &tuning);
        }
        assert_eq!(cadence.take_pending_shots(), 0);
        assert_eq!(cadence.phase(), CadencePhase::Idle);
    }

    #[test]
    fn test_pulse_lasts_pulse_duration() {
        let tuning = tuning();
        let mut cadence = FireCadence::default();

        cadence.register_shot(&tuning);
        assert!(cadence.is_bullet_pulse_active());
        for _ in 0..3 {
            cadence.tick(DT, &tuning);
            assert!(cadence.is_bullet_pulse_active());
        }
        cadence.tick(DT, &tuning);
        assert!(!cadence.is_bullet_pulse_active());
        assert_eq!(cadence.shots_fired(), 1);
    }

    #[test]
    fn test_pulse_is_independent_of_button() {
        let tuning = tuning();
        let mut cadence = FireCadence::default();

        cadence.on_fire_pressed(&tuning);
        cadence.register_shot(&tuning);
        cadence.on_fire_released();
        assert!(cadence.is_bullet_pulse_active());
        assert!(!cadence.is_fire_held());
    }
}
