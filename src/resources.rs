//! Global resources for the combat core.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Camera zoom tuning.
///
/// # Fields
/// * `default_fov` - Hip-fire field of view in degrees
/// * `zoomed_fov` - Aiming field of view in degrees
/// * `zoom_interp_speed` - Interpolation speed shared by zoom-in and zoom-out
#[derive(Reflect, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    pub default_fov: f32,
    pub zoomed_fov: f32,
    pub zoom_interp_speed: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            default_fov: 90.0,
            zoomed_fov: 35.0,
            zoom_interp_speed: 20.0,
        }
    }
}

impl CameraTuning {
    /// FOV the camera is heading toward for the given aim state.
    pub fn target_fov(&self, aiming: bool) -> f32 {
        if aiming {
            self.zoomed_fov
        } else {
            self.default_fov
        }
    }
}

/// Look sensitivity tuning.
///
/// Gamepad rates are in degrees per second at full stick deflection. Mouse
/// scales multiply `mouse_degrees_per_unit` and are meant to stay in `[0, 1]`.
#[derive(Reflect, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookTuning {
    pub hip_turn_rate: f32,
    pub hip_look_up_rate: f32,
    pub aiming_turn_rate: f32,
    pub aiming_look_up_rate: f32,
    pub mouse_hip_turn_scale: f32,
    pub mouse_hip_look_up_scale: f32,
    pub mouse_aiming_turn_scale: f32,
    pub mouse_aiming_look_up_scale: f32,
    /// Degrees of rotation per unit of raw mouse motion
    pub mouse_degrees_per_unit: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
}

impl Default for LookTuning {
    fn default() -> Self {
        Self {
            hip_turn_rate: 90.0,
            hip_look_up_rate: 90.0,
            aiming_turn_rate: 20.0,
            aiming_look_up_rate: 20.0,
            mouse_hip_turn_scale: 1.0,
            mouse_hip_look_up_scale: 1.0,
            mouse_aiming_turn_scale: 0.2,
            mouse_aiming_look_up_scale: 0.2,
            mouse_degrees_per_unit: 0.1,
            min_pitch: -89.0,
            max_pitch: 89.0,
        }
    }
}

/// Crosshair spread tuning.
///
/// Each dynamic factor approaches its target with [`interp_to`](crate::smoothing::interp_to)
/// at the listed speed.
#[derive(Reflect, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadTuning {
    /// Constant floor of the multiplier
    pub base: f32,
    /// Horizontal speed mapped to a velocity factor of 1.0
    pub max_walk_speed: f32,
    pub airborne_target: f32,
    pub airborne_rise_speed: f32,
    pub airborne_recover_speed: f32,
    pub aim_target: f32,
    pub aim_interp_speed: f32,
    pub shooting_target: f32,
    pub shooting_interp_speed: f32,
}

impl Default for SpreadTuning {
    fn default() -> Self {
        Self {
            base: 0.5,
            max_walk_speed: 600.0,
            airborne_target: 2.25,
            airborne_rise_speed: 2.25,
            airborne_recover_speed: 30.0,
            aim_target: 0.6,
            aim_interp_speed: 30.0,
            shooting_target: 0.3,
            shooting_interp_speed: 60.0,
        }
    }
}

/// Weapon fire tuning.
///
/// # Fields
/// * `automatic_fire_interval` - Seconds between automatic shots
/// * `bullet_pulse_duration` - Seconds the post-shot spread pulse stays active
/// * `trace_range` - Length of the screen-centre trace
/// * `weapon_trace_overshoot` - Scale applied to the muzzle-to-target segment
/// * `start_fire_section` - Montage section jumped to on every shot
#[derive(Reflect, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireTuning {
    pub automatic_fire_interval: f32,
    pub bullet_pulse_duration: f32,
    pub trace_range: f32,
    pub weapon_trace_overshoot: f32,
    pub start_fire_section: String,
}

impl Default for FireTuning {
    fn default() -> Self {
        Self {
            automatic_fire_interval: 0.1,
            bullet_pulse_duration: 0.05,
            trace_range: 50_000.0,
            weapon_trace_overshoot: 1.25,
            start_fire_section: "StartFire".to_string(),
        }
    }
}

/// Global tuning for every shooter in the world.
///
/// Defaults reproduce the classic third-person rifle feel. Load overrides from
/// RON with [`ShooterCombatConfig::from_ron_str`] or [`ShooterCombatConfig::load`];
/// omitted fields keep their defaults.
///
/// # Example
/// ```
/// use bevy_shooter_combat::resources::ShooterCombatConfig;
///
/// let source = "(fire: (automatic_fire_interval: 0.2))";
/// let config = ShooterCombatConfig::from_ron_str(source).unwrap();
/// assert_eq!(config.fire.automatic_fire_interval, 0.2);
/// assert_eq!(config.camera.zoomed_fov, 35.0);
/// ```
#[derive(Resource, Reflect, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[reflect(Resource)]
#[serde(default)]
pub struct ShooterCombatConfig {
    pub camera: CameraTuning,
    pub look: LookTuning,
    pub spread: SpreadTuning,
    pub fire: FireTuning,
    /// Draw aim points and beams with gizmos
    pub debug_draw: bool,
}

impl ShooterCombatConfig {
    /// Parse and validate a RON document.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&source)
    }

    /// Serialize to pretty RON.
    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Reject tuning the cadence and trace logic cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid { field, reason })
        }

        if self.fire.automatic_fire_interval <= 0.0 {
            return invalid("fire.automatic_fire_interval", "must be positive");
        }
        if self.fire.bullet_pulse_duration <= 0.0 {
            return invalid("fire.bullet_pulse_duration", "must be positive");
        }
        if self.fire.trace_range <= 0.0 {
            return invalid("fire.trace_range", "must be positive");
        }
        if self.fire.weapon_trace_overshoot < 1.0 {
            return invalid("fire.weapon_trace_overshoot", "must be at least 1.0");
        }
        if self.camera.default_fov <= 0.0 || self.camera.zoomed_fov <= 0.0 {
            return invalid("camera.fov", "must be positive");
        }
        if self.look.min_pitch > self.look.max_pitch {
            return invalid("look.min_pitch", "must not exceed look.max_pitch");
        }
        if self.spread.max_walk_speed <= 0.0 {
            return invalid("spread.max_walk_speed", "must be positive");
        }
        Ok(())
    }
}
