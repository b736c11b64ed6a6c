//! # Bevy Shooter Combat
//!
//! Combat-feel core of a third-person shooter character for Bevy 0.18.
//!
//! ## Features
//! - Two-stage hit-scan firing: screen-centre trace, then a muzzle trace that must confirm
//! - Aim-down-sights camera zoom and look sensitivity
//! - Dynamic crosshair spread from speed, falling, aiming and firing
//! - Automatic fire cadence with a post-shot pulse window
//! - Physics queries through avian3d (`dim3` feature, on by default)
//! - World-free [`CombatCharacter`](character::CombatCharacter) for use without the ECS
//!
//! ## Quick Start
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_shooter_combat::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(ShooterCombatPluginGroup)
//!         .run();
//! }
//! ```

pub mod character;
pub mod components;
pub mod error;
pub mod events;
pub mod resources;
pub mod smoothing;
pub mod systems;
pub mod types;

#[cfg(test)]
mod plugin_tests;
#[cfg(test)]
mod testing;

pub mod prelude {
    pub use crate::character::CombatCharacter;
    pub use crate::components::*;
    pub use crate::error::ConfigError;
    pub use crate::events::*;
    pub use crate::resources::*;
    pub use crate::systems::firing::ShotReport;
    pub use crate::types::*;
    pub use crate::CombatSet;
    pub use crate::ShooterCombatPluginGroup;
    pub use crate::{
        ShooterCombatCorePlugin, ShooterCombatDebugPlugin, ShooterCombatInputPlugin,
        ShooterCombatVfxPlugin,
    };
}

use bevy::prelude::*;

/// Ordered phases of the per-frame combat update.
///
/// Input handling, then the per-tick update, then the fire sequence.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombatSet {
    /// Button and motion input applied to aim state and cadence
    Input,
    /// Timers, zoom, look rates, spread and animation properties
    Tick,
    /// Ray traces and cosmetic requests for accepted shots
    Fire,
}

/// Main plugin group that includes all combat subsystems.
///
/// # Example
/// ```no_run
/// use bevy::prelude::*;
/// use bevy_shooter_combat::prelude::*;
///
/// fn main() {
///     App::new()
///         .add_plugins(DefaultPlugins)
///         .add_plugins(ShooterCombatPluginGroup)
///         .run();
/// }
/// ```
#[derive(Default)]
pub struct ShooterCombatPluginGroup;

impl PluginGroup for ShooterCombatPluginGroup {
    fn build(self) -> bevy::app::PluginGroupBuilder {
        bevy::app::PluginGroupBuilder::start::<Self>()
            .add(ShooterCombatCorePlugin)
            .add(ShooterCombatInputPlugin)
            .add(ShooterCombatVfxPlugin)
            .add(ShooterCombatDebugPlugin)
    }
}

/// Core combat state machine: aim, zoom, spread, cadence and firing.
///
/// Registers the combat components, the [`ShooterCombatConfig`](resources::ShooterCombatConfig)
/// resource and every combat message, and runs the update chain in
/// [`CombatSet`] order.
///
/// # Systems
/// - `handle_combat_input` - Applies fire and aim buttons
/// - `tick_fire_cadence` - Advances cooldown and pulse countdowns
/// - `update_camera_zoom` / `sync_camera_fov` - Interpolates and applies the FOV
/// - `update_look_rates` / `apply_look_input` - Look sensitivity and rotation
/// - `update_crosshair_spread` - Recomputes the spread multiplier
/// - `update_animation_properties` - Speed, air and movement offset for animation
/// - `fire_pending_shots` - Two-stage trace and cosmetic requests (needs avian3d)
/// - `fire_pending_shots_without_physics` - Same sequence when no physics is
///   installed; no impact is ever confirmed
pub struct ShooterCombatCorePlugin;

impl Plugin for ShooterCombatCorePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<components::Shooter>()
            .register_type::<components::PlayerControlled>()
            .register_type::<components::ShooterCamera>()
            .register_type::<components::MuzzleSocket>()
            .register_type::<components::AimState>()
            .register_type::<components::CameraZoom>()
            .register_type::<components::LookRates>()
            .register_type::<components::ControlRotation>()
            .register_type::<components::CrosshairSpread>()
            .register_type::<components::FireCadence>()
            .register_type::<components::MovementSample>()
            .register_type::<components::AnimationProperties>()
            .register_type::<components::WeaponCosmetics>()
            .register_type::<components::LastShot>()
            .register_type::<resources::ShooterCombatConfig>()
            .init_resource::<resources::ShooterCombatConfig>()
            .add_message::<events::CombatInput>()
            .add_message::<events::LookInput>()
            .add_message::<events::CosmeticRequest>()
            .add_message::<events::MontageRequest>()
            .add_message::<events::ShotFired>()
            .configure_sets(
                Update,
                (CombatSet::Input, CombatSet::Tick, CombatSet::Fire).chain(),
            )
            .add_systems(
                Update,
                systems::input::handle_combat_input.in_set(CombatSet::Input),
            )
            .add_systems(
                Update,
                (
                    systems::cadence::tick_fire_cadence,
                    systems::aim::update_camera_zoom,
                    systems::aim::update_look_rates,
                    systems::aim::apply_look_input,
                    systems::spread::update_crosshair_spread,
                    systems::animation::update_animation_properties,
                    systems::aim::sync_camera_fov,
                )
                    .chain()
                    .in_set(CombatSet::Tick),
            );

        // 3D Physics Systems
        #[cfg(feature = "dim3")]
        {
            use avian3d::prelude::SpatialQueryPipeline;
            app.add_systems(
                Update,
                systems::movement::sample_rigid_body_velocity.in_set(CombatSet::Input),
            )
            .add_systems(
                Update,
                (
                    systems::firing::fire_pending_shots
                        .run_if(resource_exists::<SpatialQueryPipeline>),
                    systems::firing::fire_pending_shots_without_physics
                        .run_if(not(resource_exists::<SpatialQueryPipeline>)),
                )
                    .in_set(CombatSet::Fire),
            );
        }

        #[cfg(not(feature = "dim3"))]
        app.add_systems(
            Update,
            systems::firing::fire_pending_shots_without_physics.in_set(CombatSet::Fire),
        );
    }
}

/// Default bindings: mouse buttons, mouse motion and the first gamepad.
///
/// Drives every shooter tagged [`PlayerControlled`](components::PlayerControlled).
/// Leave it out when the game has its own input layer writing
/// [`CombatInput`](events::CombatInput) and [`LookInput`](events::LookInput).
pub struct ShooterCombatInputPlugin;

impl Plugin for ShooterCombatInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            systems::input::read_default_bindings.before(CombatSet::Input),
        );
    }
}

/// VFX plugin (muzzle flashes, impact bursts, beams, fire sounds).
///
/// Realizes [`CosmeticRequest`](events::CosmeticRequest) messages as
/// emissive meshes and one-shot audio, then fades and despawns them.
///
/// # Systems
/// - `spawn_cosmetic_visuals` - Spawns bursts and beams
/// - `play_fire_sounds` - Plays a random variant of each sound cue
/// - `fade_cosmetic_bursts` / `fade_beam_trails` - Shrinks and despawns expired cosmetics
pub struct ShooterCombatVfxPlugin;

impl Plugin for ShooterCombatVfxPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<systems::vfx::CombatVfxAssets>()
            .add_systems(Startup, systems::vfx::setup_vfx_assets)
            .add_systems(
                Update,
                (
                    systems::vfx::spawn_cosmetic_visuals,
                    systems::vfx::play_fire_sounds,
                    systems::vfx::fade_cosmetic_bursts,
                    systems::vfx::fade_beam_trails,
                )
                    .after(CombatSet::Fire),
            );
    }
}

/// Debug plugin drawing each shooter's last shot.
pub struct ShooterCombatDebugPlugin;

impl Plugin for ShooterCombatDebugPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            systems::debug::draw_last_shot_debug.after(CombatSet::Fire),
        );
    }
}
