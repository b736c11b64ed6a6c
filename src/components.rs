//! Core components for the shooter combat system.
//!
//! Every piece of combat state lives on the shooter entity and is owned by it
//! alone. The per-tick models (spread, cadence, zoom, look rates) are plain
//! methods on these components so they can be driven by the Bevy systems in
//! [`crate::systems`] or by [`CombatCharacter`](crate::character::CombatCharacter)
//! without a world.

use bevy::prelude::*;

use crate::resources::{CameraTuning, FireTuning, LookTuning, SpreadTuning};
use crate::smoothing::{interp_to, map_range_clamped, normalize_degrees};
use crate::types::{MontageId, ParticleEffect, SoundCue};

/// Shortest automatic fire interval the cadence will schedule (seconds).
const MIN_FIRE_INTERVAL: f32 = 1.0e-3;

/// Marker for a character that runs the combat core.
///
/// Inserting it pulls in every piece of per-shooter state with default values.
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_shooter_combat::prelude::*;
///
/// fn spawn_player(mut commands: Commands, camera: Single<Entity, With<Camera3d>>) {
///     commands.spawn((
///         Shooter,
///         PlayerControlled,
///         ShooterCamera(*camera),
///         WeaponCosmetics::default().with_muzzle_flash(effects::muzzle_flash()),
///     ));
/// }
/// ```
#[derive(Component, Reflect, Clone, Copy, Default)]
#[reflect(Component)]
#[require(
    Transform,
    AimState,
    CameraZoom,
    LookRates,
    ControlRotation,
    CrosshairSpread,
    FireCadence,
    MovementSample,
    AnimationProperties,
    WeaponCosmetics,
    LastShot
)]
pub struct Shooter;

/// Marker for shooters driven by the default input bindings.
#[derive(Component, Reflect, Clone, Copy, Default)]
#[reflect(Component)]
pub struct PlayerControlled;

/// Camera entity the shooter aims through and zooms.
#[derive(Component, Reflect, Clone, Copy)]
#[reflect(Component)]
pub struct ShooterCamera(pub Entity);

/// Entity whose global transform is the weapon's barrel socket.
///
/// Shooters without one fire from their own transform.
#[derive(Component, Reflect, Clone, Copy)]
#[reflect(Component)]
pub struct MuzzleSocket(pub Entity);

/// Aim-down-sights mode.
///
/// Written only by aim press/release input; read by camera zoom, look rates,
/// spread and animation.
#[derive(Component, Reflect, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[reflect(Component)]
pub struct AimState {
    aiming: bool,
}

impl AimState {
    pub fn set_aiming(&mut self, aiming: bool) {
        self.aiming = aiming;
    }

    pub fn is_aiming(&self) -> bool {
        self.aiming
    }
}

/// Camera field of view, interpolated every tick toward the aim-state target.
///
/// # Fields
/// * `current_fov` - Field of view this frame, in degrees
#[derive(Component, Reflect, Clone, Copy, Debug, PartialEq)]
#[reflect(Component)]
pub struct CameraZoom {
    pub current_fov: f32,
}

impl Default for CameraZoom {
    fn default() -> Self {
        Self::new(CameraTuning::default().default_fov)
    }
}

impl CameraZoom {
    pub fn new(fov: f32) -> Self {
        Self { current_fov: fov }
    }

    /// Advance the zoom by `dt` seconds and return the new FOV.
    pub fn update(&mut self, dt: f32, aiming: bool, tuning: &CameraTuning) -> f32 {
        self.current_fov = interp_to(
            self.current_fov,
            tuning.target_fov(aiming),
            dt,
            tuning.zoom_interp_speed,
        );
        self.current_fov
    }
}

/// Look sensitivity in effect this tick.
///
/// Switched directly (not interpolated) between hip and aiming values.
#[derive(Component, Reflect, Clone, Copy, Debug, PartialEq)]
#[reflect(Component)]
pub struct LookRates {
    /// Gamepad yaw rate (deg/s)
    pub turn_rate: f32,
    /// Gamepad pitch rate (deg/s)
    pub look_up_rate: f32,
    pub mouse_turn_scale: f32,
    pub mouse_look_up_scale: f32,
}

impl Default for LookRates {
    fn default() -> Self {
        Self::for_aim_state(false, &LookTuning::default())
    }
}

impl LookRates {
    pub fn for_aim_state(aiming: bool, tuning: &LookTuning) -> Self {
        if aiming {
            Self {
                turn_rate: tuning.aiming_turn_rate,
                look_up_rate: tuning.aiming_look_up_rate,
                mouse_turn_scale: tuning.mouse_aiming_turn_scale,
                mouse_look_up_scale: tuning.mouse_aiming_look_up_scale,
            }
        } else {
            Self {
                turn_rate: tuning.hip_turn_rate,
                look_up_rate: tuning.hip_look_up_rate,
                mouse_turn_scale: tuning.mouse_hip_turn_scale,
                mouse_look_up_scale: tuning.mouse_hip_look_up_scale,
            }
        }
    }

    /// Yaw/pitch delta in degrees for a gamepad stick held at `rate` for `dt`.
    pub fn gamepad_delta(&self, rate: Vec2, dt: f32) -> Vec2 {
        Vec2::new(rate.x * self.turn_rate * dt, rate.y * self.look_up_rate * dt)
    }

    /// Yaw/pitch delta in degrees for a raw mouse motion.
    pub fn mouse_delta(&self, motion: Vec2, tuning: &LookTuning) -> Vec2 {
        Vec2::new(
            motion.x * self.mouse_turn_scale * tuning.mouse_degrees_per_unit,
            motion.y * self.mouse_look_up_scale * tuning.mouse_degrees_per_unit,
        )
    }
}

/// Controller aim rotation in degrees.
///
/// Yaw is wrapped to `(-180, 180]`, pitch clamped to the configured range.
/// The camera rig reads [`ControlRotation::rotation`] to orient itself.
#[derive(Component, Reflect, Clone, Copy, Debug, Default, PartialEq)]
#[reflect(Component)]
pub struct ControlRotation {
    pub yaw: f32,
    pub pitch: f32,
}

impl ControlRotation {
    /// Apply a yaw/pitch delta in degrees.
    pub fn apply(&mut self, delta: Vec2, tuning: &LookTuning) {
        self.yaw = normalize_degrees(self.yaw + delta.x);
        self.pitch = (self.pitch + delta.y).clamp(tuning.min_pitch, tuning.max_pitch);
    }

    /// World rotation of the aim. Positive yaw turns right (clockwise seen
    /// from above), positive pitch looks up.
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            -self.yaw.to_radians(),
            self.pitch.to_radians(),
            0.0,
        )
    }
}

/// Inputs the spread model samples once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpreadInputs {
    /// Horizontal speed of the character
    pub speed: f32,
    pub airborne: bool,
    pub aiming: bool,
    /// Whether the post-shot pulse window is open
    pub pulse_active: bool,
}

/// Dynamic crosshair spread.
///
/// The multiplier is `base + velocity + airborne - aim + shooting` and is not
/// clamped; UI code mapping it to a radius has to tolerate values above 1.
///
/// # Fields
/// * `velocity_factor` - Horizontal speed remapped to `[0, 1]`, not smoothed
/// * `airborne_factor` - Widening while falling
/// * `aim_factor` - Tightening while aiming (subtracted)
/// * `shooting_factor` - Brief widening after each shot
#[derive(Component, Reflect, Clone, Copy, Debug, PartialEq)]
#[reflect(Component)]
pub struct CrosshairSpread {
    pub velocity_factor: f32,
    pub airborne_factor: f32,
    pub aim_factor: f32,
    pub shooting_factor: f32,
    multiplier: f32,
}

impl Default for CrosshairSpread {
    fn default() -> Self {
        Self {
            velocity_factor: 0.0,
            airborne_factor: 0.0,
            aim_factor: 0.0,
            shooting_factor: 0.0,
            multiplier: SpreadTuning::default().base,
        }
    }
}

impl CrosshairSpread {
    /// Advance every factor by `dt` seconds and recompute the multiplier.
    pub fn update(&mut self, dt: f32, inputs: SpreadInputs, tuning: &SpreadTuning) -> f32 {
        self.velocity_factor = map_range_clamped(
            inputs.speed,
            (0.0, tuning.max_walk_speed),
            (0.0, 1.0),
        );

        self.airborne_factor = if inputs.airborne {
            interp_to(
                self.airborne_factor,
                tuning.airborne_target,
                dt,
                tuning.airborne_rise_speed,
            )
        } else {
            interp_to(self.airborne_factor, 0.0, dt, tuning.airborne_recover_speed)
        };

        let aim_target = if inputs.aiming { tuning.aim_target } else { 0.0 };
        self.aim_factor = interp_to(self.aim_factor, aim_target, dt, tuning.aim_interp_speed);

        let shooting_target = if inputs.pulse_active {
            tuning.shooting_target
        } else {
            0.0
        };
        self.shooting_factor = interp_to(
            self.shooting_factor,
            shooting_target,
            dt,
            tuning.shooting_interp_speed,
        );

        self.multiplier = tuning.base + self.velocity_factor + self.airborne_factor
            - self.aim_factor
            + self.shooting_factor;
        self.multiplier
    }

    /// Spread multiplier consumed by the crosshair widget.
    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }
}

/// Where the cadence state machine currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CadencePhase {
    /// Ready to accept a press
    Idle,
    /// A shot was accepted and is waiting for the fire sequence
    Armed,
    /// Cooldown pending; presses are dropped
    Cooling,
}

/// Automatic fire gate.
///
/// The cooldown and the post-shot pulse are independent countdowns advanced
/// by [`FireCadence::tick`]. A cooldown armed by a press starts counting on
/// the tick after the one in the press frame. Accepted shots are queued as pending until the
/// fire sequence consumes them with [`FireCadence::take_pending_shots`] and
/// reports back through [`FireCadence::register_shot`].
#[derive(Component, Reflect, Clone, Debug, Default, PartialEq)]
#[reflect(Component)]
pub struct FireCadence {
    fire_held: bool,
    cooldown_remaining: Option<f32>,
    just_armed: bool,
    pulse_remaining: Option<f32>,
    pending_shots: u32,
    shots_fired: u64,
}

impl FireCadence {
    /// Fire button down. Returns `true` if a shot was accepted.
    ///
    /// A press during the cooldown is dropped, not queued.
    pub fn on_fire_pressed(&mut self, tuning: &FireTuning) -> bool {
        self.fire_held = true;
        if !self.can_fire() {
            return false;
        }
        self.arm(tuning);
        true
    }

    pub fn on_fire_released(&mut self) {
        self.fire_held = false;
    }

    /// Advance both countdowns by `dt` seconds.
    ///
    /// When the cooldown expires with the button still held the gate re-arms
    /// immediately and schedules another shot; the overshoot carries into the
    /// next cooldown so held fire stays exactly one interval apart. Returns the
    /// number of shots scheduled by this tick.
    pub fn tick(&mut self, dt: f32, tuning: &FireTuning) -> u32 {
        if let Some(remaining) = self.pulse_remaining {
            let remaining = remaining - dt;
            self.pulse_remaining = (remaining > 0.0).then_some(remaining);
        }

        let Some(mut remaining) = self.cooldown_remaining else {
            return 0;
        };
        // The press frame's time was spent before the shot.
        if std::mem::take(&mut self.just_armed) {
            return 0;
        }
        remaining -= dt;

        let interval = tuning.automatic_fire_interval.max(MIN_FIRE_INTERVAL);
        let mut scheduled = 0;
        while remaining <= 0.0 && self.fire_held {
            remaining += interval;
            self.pending_shots += 1;
            scheduled += 1;
        }

        self.cooldown_remaining = (remaining > 0.0).then_some(remaining);
        scheduled
    }

    /// Hand the accepted shots to the fire sequence.
    pub fn take_pending_shots(&mut self) -> u32 {
        std::mem::take(&mut self.pending_shots)
    }

    /// A shot went out: open the pulse window and count it.
    pub fn register_shot(&mut self, tuning: &FireTuning) {
        self.pulse_remaining = Some(tuning.bullet_pulse_duration);
        self.shots_fired += 1;
    }

    pub fn can_fire(&self) -> bool {
        self.cooldown_remaining.is_none()
    }

    pub fn is_fire_held(&self) -> bool {
        self.fire_held
    }

    /// "Just fired" flag: true while the post-shot pulse window is open.
    pub fn is_bullet_pulse_active(&self) -> bool {
        self.pulse_remaining.is_some()
    }

    pub fn shots_fired(&self) -> u64 {
        self.shots_fired
    }

    pub fn phase(&self) -> CadencePhase {
        if self.pending_shots > 0 {
            CadencePhase::Armed
        } else if self.cooldown_remaining.is_some() {
            CadencePhase::Cooling
        } else {
            CadencePhase::Idle
        }
    }

    fn arm(&mut self, tuning: &FireTuning) {
        self.cooldown_remaining = Some(tuning.automatic_fire_interval.max(MIN_FIRE_INTERVAL));
        self.just_armed = true;
        self.pending_shots += 1;
    }
}

/// Character motion sampled each frame by the movement layer.
#[derive(Component, Reflect, Clone, Copy, Debug, Default, PartialEq)]
#[reflect(Component)]
pub struct MovementSample {
    pub velocity: Vec3,
    pub acceleration: Vec3,
    pub airborne: bool,
}

impl MovementSample {
    /// Speed ignoring the vertical axis.
    pub fn horizontal_speed(&self) -> f32 {
        Vec2::new(self.velocity.x, self.velocity.z).length()
    }
}

/// Values the animation layer blends on each frame.
///
/// # Fields
/// * `speed` - Horizontal speed
/// * `is_in_air` - Whether the character is falling
/// * `is_accelerating` - Whether the movement input produces acceleration
/// * `movement_offset_yaw` - Movement direction relative to aim, degrees
/// * `last_movement_offset_yaw` - Offset from the last frame the character moved
/// * `aiming` - Mirror of [`AimState`]
#[derive(Component, Reflect, Clone, Copy, Debug, Default, PartialEq)]
#[reflect(Component)]
pub struct AnimationProperties {
    pub speed: f32,
    pub is_in_air: bool,
    pub is_accelerating: bool,
    pub movement_offset_yaw: f32,
    pub last_movement_offset_yaw: f32,
    pub aiming: bool,
}

/// Optional cosmetic assets for the equipped weapon.
///
/// Every field may be left unset; the fire sequence skips exactly the effects
/// whose asset is missing.
#[derive(Component, Reflect, Clone, Debug, Default)]
#[reflect(Component)]
pub struct WeaponCosmetics {
    pub fire_sound: Option<SoundCue>,
    pub muzzle_flash: Option<ParticleEffect>,
    pub impact_particles: Option<ParticleEffect>,
    pub beam_particles: Option<ParticleEffect>,
    pub hip_fire_montage: Option<MontageId>,
}

impl WeaponCosmetics {
    pub fn with_fire_sound(mut self, cue: SoundCue) -> Self {
        self.fire_sound = Some(cue);
        self
    }

    pub fn with_muzzle_flash(mut self, effect: ParticleEffect) -> Self {
        self.muzzle_flash = Some(effect);
        self
    }

    pub fn with_impact_particles(mut self, effect: ParticleEffect) -> Self {
        self.impact_particles = Some(effect);
        self
    }

    pub fn with_beam_particles(mut self, effect: ParticleEffect) -> Self {
        self.beam_particles = Some(effect);
        self
    }

    pub fn with_hip_fire_montage(mut self, montage: MontageId) -> Self {
        self.hip_fire_montage = Some(montage);
        self
    }
}

/// Outcome of the most recent shot, kept for debug drawing.
#[derive(Component, Reflect, Clone, Copy, Debug, Default, PartialEq)]
#[reflect(Component)]
pub struct LastShot {
    pub muzzle: Vec3,
    /// Screen-centre trace result, `None` if deprojection failed
    pub aim_point: Option<Vec3>,
    /// Weapon-trace impact, `None` if unconfirmed
    pub impact: Option<Vec3>,
}

/// Particle-style cosmetic that shrinks away over its lifetime.
#[derive(Component, Default)]
pub struct CosmeticBurst {
    pub lifetime: f32,
    pub initial_lifetime: f32,
    pub scale: f32,
}

/// Trail stretched from the muzzle to a confirmed impact.
#[derive(Component, Default)]
pub struct BeamTrail {
    pub lifetime: f32,
    pub initial_lifetime: f32,
    pub thickness: f32,
    pub length: f32,
}
