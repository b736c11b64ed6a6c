//! Common types and the capability ports the combat core talks through.
//!
//! The combat core never reaches into the physics world, the camera, the
//! animation graph or the audio mixer directly. It goes through the small
//! traits defined here, which keeps the firing pipeline testable with plain
//! structs and lets the Bevy systems plug in avian3d and `Camera` adapters.

use bevy::prelude::*;

/// World-space aim ray derived from the viewport centre.
///
/// Never stored: it is rebuilt each time an aim point is resolved.
///
/// # Fields
/// * `origin` - Deprojected world-space position of the screen point
/// * `direction` - Normalized world-space direction through the screen point
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_shooter_combat::types::AimRay;
///
/// let ray = AimRay::new(Vec3::ZERO, Dir3::NEG_Z);
/// assert_eq!(ray.point_at(10.0), Vec3::new(0.0, 0.0, -10.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AimRay {
    pub origin: Vec3,
    pub direction: Dir3,
}

impl AimRay {
    pub fn new(origin: Vec3, direction: Dir3) -> Self {
        Self { origin, direction }
    }

    /// Point `distance` units along the ray.
    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.origin + *self.direction * distance
    }
}

impl From<Ray3d> for AimRay {
    fn from(ray: Ray3d) -> Self {
        Self {
            origin: ray.origin,
            direction: ray.direction,
        }
    }
}

/// Nearest blocking hit reported by a [`RayCastPort`].
///
/// # Fields
/// * `point` - World-space impact location
/// * `normal` - Surface normal at the impact location
/// * `entity` - Entity that blocked the ray, if the world knows it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceHit {
    pub point: Vec3,
    pub normal: Vec3,
    pub entity: Option<Entity>,
}

impl TraceHit {
    /// Hit at `point` with an up-facing normal and no entity.
    pub fn at(point: Vec3) -> Self {
        Self {
            point,
            normal: Vec3::Y,
            entity: None,
        }
    }
}

/// Single-ray visibility query against the physical world.
///
/// Implemented for avian3d's `SpatialQuery` by
/// [`AvianRayCaster`](crate::systems::targeting::AvianRayCaster). A miss is not
/// an error: it is simply `None`.
pub trait RayCastPort {
    /// Cast from `start` to `end` and return the nearest blocking hit.
    fn cast(&self, start: Vec3, end: Vec3) -> Option<TraceHit>;
}

/// Screen-to-world deprojection of the viewport centre.
///
/// Returns `None` when there is nothing to project through (no active camera,
/// no viewport). That is a precondition failure, not a miss.
pub trait ViewportProjector {
    fn screen_center_ray(&self) -> Option<AimRay>;
}

/// Gunshot sound with one or more interchangeable variants.
///
/// One variant is picked at random every time the cue is played.
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_shooter_combat::types::SoundCue;
///
/// let cue = SoundCue::new(vec![Handle::default(), Handle::default()]).with_volume(0.8);
/// assert_eq!(cue.variants.len(), 2);
/// ```
#[derive(Clone, Debug, Reflect)]
pub struct SoundCue {
    /// Interchangeable audio clips
    pub variants: Vec<Handle<AudioSource>>,
    /// Linear playback volume
    pub volume: f32,
}

impl SoundCue {
    pub fn new(variants: Vec<Handle<AudioSource>>) -> Self {
        Self {
            variants,
            volume: 1.0,
        }
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }
}

/// Description of a short-lived particle-style cosmetic.
///
/// The VFX plugin realizes these as emissive meshes; a game with its own
/// particle system can read the same data from
/// [`CosmeticRequest`](crate::events::CosmeticRequest) messages instead.
///
/// # Fields
/// * `color` - Emissive tint
/// * `scale` - Uniform scale for bursts, beam thickness for beams
/// * `lifetime` - Seconds before the cosmetic is despawned
/// * `material` - Optional material overriding the tint
#[derive(Clone, Debug, Reflect)]
pub struct ParticleEffect {
    pub color: Color,
    pub scale: f32,
    pub lifetime: f32,
    pub material: Option<Handle<StandardMaterial>>,
}

impl Default for ParticleEffect {
    fn default() -> Self {
        Self {
            color: Color::srgb(1.0, 0.9, 0.5),
            scale: 0.1,
            lifetime: 0.1,
            material: None,
        }
    }
}

/// Stock cosmetics matching a typical assault rifle.
pub mod effects {
    use super::*;

    /// Bright, very short flash at the barrel.
    pub fn muzzle_flash() -> ParticleEffect {
        ParticleEffect {
            color: Color::srgb(1.0, 0.85, 0.4),
            scale: 0.12,
            lifetime: 0.05,
            material: None,
        }
    }

    /// Spark burst at the impact point.
    pub fn impact_sparks() -> ParticleEffect {
        ParticleEffect {
            color: Color::srgb(1.0, 0.6, 0.2),
            scale: 0.08,
            lifetime: 0.25,
            material: None,
        }
    }

    /// Thin smoke trail from the muzzle to the impact.
    pub fn smoke_beam() -> ParticleEffect {
        ParticleEffect {
            color: Color::srgba(0.8, 0.8, 0.8, 0.6),
            scale: 0.01,
            lifetime: 0.3,
            material: None,
        }
    }
}

/// Identifier of an animation montage owned by the animation layer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Reflect)]
pub struct MontageId(pub String);

impl MontageId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Fire-and-forget spawns of audio and particle cosmetics.
pub trait CosmeticSpawner {
    fn play_sound(&mut self, cue: &SoundCue, location: Vec3);
    fn spawn_particles(&mut self, effect: &ParticleEffect, at: Transform);
    /// Beam anchored at `origin` whose target parameter is `target`.
    fn spawn_beam(&mut self, effect: &ParticleEffect, origin: Transform, target: Vec3);
}

/// Montage playback on the character's animation player.
pub trait AnimationPort {
    fn play_montage(&mut self, montage: &MontageId);
    fn jump_to_section(&mut self, section: &str, montage: &MontageId);
}
