//! World-free aggregate of one shooter's combat state.
//!
//! [`CombatCharacter`] bundles the same components the ECS plugin stores on a
//! shooter entity and drives them in the same per-frame order, talking to the
//! world only through its ports. Games that do not run the Bevy plugin (or
//! tests that want the whole loop without an `App`) use it directly.

use bevy::prelude::*;

use crate::components::{
    AimState, AnimationProperties, CameraZoom, ControlRotation, CrosshairSpread, FireCadence,
    LookRates, MovementSample, SpreadInputs, WeaponCosmetics,
};
use crate::events::{CombatAction, LookSource};
use crate::resources::ShooterCombatConfig;
use crate::systems::firing::{fire_weapon, FirePorts, ShotReport};
use crate::systems::spread::spread_inputs;
use crate::types::{AnimationPort, CosmeticSpawner, RayCastPort, ViewportProjector};

/// One shooter and the ports it fires through.
///
/// Call [`handle_input`](Self::handle_input) and [`look`](Self::look) as
/// input arrives, then [`update`](Self::update) once per frame.
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_shooter_combat::prelude::*;
///
/// struct NoCamera;
/// impl ViewportProjector for NoCamera {
///     fn screen_center_ray(&self) -> Option<AimRay> {
///         None
///     }
/// }
///
/// struct EmptyWorld;
/// impl RayCastPort for EmptyWorld {
///     fn cast(&self, _start: Vec3, _end: Vec3) -> Option<TraceHit> {
///         None
///     }
/// }
///
/// #[derive(Default)]
/// struct Silent;
/// impl AnimationPort for Silent {
///     fn play_montage(&mut self, _montage: &MontageId) {}
///     fn jump_to_section(&mut self, _section: &str, _montage: &MontageId) {}
/// }
///
/// let mut character = CombatCharacter::new(
///     ShooterCombatConfig::default(),
///     NoCamera,
///     EmptyWorld,
///     Vec::<CosmeticRequest>::new(),
///     Silent,
/// );
/// character.handle_input(CombatAction::FirePressed);
/// let shots = character.update(1.0 / 60.0, &MovementSample::default(), Transform::IDENTITY);
/// assert_eq!(shots.len(), 1);
/// assert_eq!(shots[0].impact, None);
/// ```
pub struct CombatCharacter<P, R, C, A> {
    config: ShooterCombatConfig,
    projector: P,
    ray_caster: R,
    cosmetics: C,
    animation: A,
    weapon: WeaponCosmetics,
    aim: AimState,
    zoom: CameraZoom,
    rates: LookRates,
    rotation: ControlRotation,
    spread: CrosshairSpread,
    cadence: FireCadence,
    animation_properties: AnimationProperties,
}

impl<P, R, C, A> CombatCharacter<P, R, C, A>
where
    P: ViewportProjector,
    R: RayCastPort,
    C: CosmeticSpawner,
    A: AnimationPort,
{
    pub fn new(
        config: ShooterCombatConfig,
        projector: P,
        ray_caster: R,
        cosmetics: C,
        animation: A,
    ) -> Self {
        let zoom = CameraZoom::new(config.camera.default_fov);
        let rates = LookRates::for_aim_state(false, &config.look);
        let mut spread = CrosshairSpread::default();
        spread.update(0.0, SpreadInputs::default(), &config.spread);

        Self {
            config,
            projector,
            ray_caster,
            cosmetics,
            animation,
            weapon: WeaponCosmetics::default(),
            aim: AimState::default(),
            zoom,
            rates,
            rotation: ControlRotation::default(),
            spread,
            cadence: FireCadence::default(),
            animation_properties: AnimationProperties::default(),
        }
    }

    pub fn with_weapon(mut self, weapon: WeaponCosmetics) -> Self {
        self.weapon = weapon;
        self
    }

    /// Apply a button event. Fire presses while cooling are dropped.
    pub fn handle_input(&mut self, action: CombatAction) {
        match action {
            CombatAction::FirePressed => {
                self.cadence.on_fire_pressed(&self.config.fire);
            }
            CombatAction::FireReleased => self.cadence.on_fire_released(),
            CombatAction::AimPressed => self.aim.set_aiming(true),
            CombatAction::AimReleased => self.aim.set_aiming(false),
        }
    }

    /// Apply an analog look value with the rates currently in effect.
    pub fn look(&mut self, source: LookSource, value: Vec2, dt: f32) {
        let delta = match source {
            LookSource::Gamepad => self.rates.gamepad_delta(value, dt),
            LookSource::Mouse => self.rates.mouse_delta(value, &self.config.look),
        };
        self.rotation.apply(delta, &self.config.look);
    }

    /// Advance one frame and fire every shot the cadence accepted.
    ///
    /// Order: cadence timers, camera zoom, look rates, spread, animation
    /// properties, then the fire sequence for each pending shot.
    pub fn update(
        &mut self,
        dt: f32,
        movement: &MovementSample,
        muzzle: Transform,
    ) -> Vec<ShotReport> {
        let aiming = self.aim.is_aiming();

        self.cadence.tick(dt, &self.config.fire);
        self.zoom.update(dt, aiming, &self.config.camera);
        self.rates = LookRates::for_aim_state(aiming, &self.config.look);
        self.spread.update(
            dt,
            spread_inputs(movement, &self.aim, &self.cadence),
            &self.config.spread,
        );
        self.animation_properties
            .refresh(movement, &self.rotation, aiming);

        let pending = self.cadence.take_pending_shots();
        let mut ports = FirePorts {
            projector: &self.projector,
            ray_caster: &self.ray_caster,
            cosmetics: &mut self.cosmetics,
            animation: &mut self.animation,
        };
        (0..pending)
            .map(|_| {
                fire_weapon(
                    muzzle,
                    &self.weapon,
                    &mut ports,
                    &mut self.cadence,
                    &self.config.fire,
                )
            })
            .collect()
    }

    pub fn crosshair_spread_multiplier(&self) -> f32 {
        self.spread.multiplier()
    }

    pub fn is_aiming(&self) -> bool {
        self.aim.is_aiming()
    }

    /// Current camera field of view in degrees.
    pub fn camera_fov(&self) -> f32 {
        self.zoom.current_fov
    }

    pub fn look_rates(&self) -> &LookRates {
        &self.rates
    }

    pub fn control_rotation(&self) -> &ControlRotation {
        &self.rotation
    }

    pub fn spread(&self) -> &CrosshairSpread {
        &self.spread
    }

    pub fn cadence(&self) -> &FireCadence {
        &self.cadence
    }

    pub fn animation_properties(&self) -> &AnimationProperties {
        &self.animation_properties
    }

    pub fn config(&self) -> &ShooterCombatConfig {
        &self.config
    }

    pub fn cosmetics(&self) -> &C {
        &self.cosmetics
    }

    pub fn cosmetics_mut(&mut self) -> &mut C {
        &mut self.cosmetics
    }

    pub fn animation(&self) -> &A {
        &self.animation
    }
}
