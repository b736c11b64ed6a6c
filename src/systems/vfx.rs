//! VFX system - realizes cosmetic requests as short-lived meshes and one-shot sounds.

use bevy::audio::Volume;
use bevy::color::ColorToPacked;
use bevy::ecs::message::MessageReader;
use bevy::platform::collections::HashMap;
use bevy::prelude::*;
use rand::seq::IndexedRandom;

use crate::components::{BeamTrail, CosmeticBurst};
use crate::events::CosmeticRequest;
use crate::types::ParticleEffect;

/// Shared meshes and tinted materials for combat cosmetics.
#[derive(Resource, Default)]
pub struct CombatVfxAssets {
    pub burst_mesh: Handle<Mesh>,
    /// Unit cylinder along +Y, stretched per beam
    pub beam_mesh: Handle<Mesh>,
    tinted: HashMap<[u8; 4], Handle<StandardMaterial>>,
}

impl CombatVfxAssets {
    fn material_for(
        &mut self,
        effect: &ParticleEffect,
        materials: &mut Assets<StandardMaterial>,
    ) -> Handle<StandardMaterial> {
        if let Some(material) = &effect.material {
            return material.clone();
        }
        let key = effect.color.to_srgba().to_u8_array();
        self.tinted
            .entry(key)
            .or_insert_with(|| {
                let linear = effect.color.to_linear();
                materials.add(StandardMaterial {
                    base_color: effect.color,
                    emissive: LinearRgba::rgb(linear.red, linear.green, linear.blue) * 4.0,
                    alpha_mode: if linear.alpha < 1.0 {
                        AlphaMode::Blend
                    } else {
                        AlphaMode::Opaque
                    },
                    unlit: true,
                    ..default()
                })
            })
            .clone()
    }
}

/// Create the shared cosmetic meshes.
pub fn setup_vfx_assets(
    mut assets: ResMut<CombatVfxAssets>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    assets.burst_mesh = meshes.add(Sphere::new(1.0));
    assets.beam_mesh = meshes.add(Cylinder::new(1.0, 1.0));
}

/// Spawn flashes, impact bursts and beams for this frame's requests.
pub fn spawn_cosmetic_visuals(
    mut commands: Commands,
    mut requests: MessageReader<CosmeticRequest>,
    mut assets: ResMut<CombatVfxAssets>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for request in requests.read() {
        match request {
            CosmeticRequest::Particles { effect, transform } => {
                let material = assets.material_for(effect, &mut materials);
                commands.spawn((
                    Mesh3d(assets.burst_mesh.clone()),
                    MeshMaterial3d(material),
                    transform.with_scale(Vec3::splat(effect.scale)),
                    CosmeticBurst {
                        lifetime: effect.lifetime,
                        initial_lifetime: effect.lifetime,
                        scale: effect.scale,
                    },
                ));
            }
            CosmeticRequest::Beam {
                effect,
                origin,
                target,
            } => {
                let Some(transform) = beam_transform(origin.translation, *target, effect.scale)
                else {
                    continue;
                };
                let material = assets.material_for(effect, &mut materials);
                commands.spawn((
                    Mesh3d(assets.beam_mesh.clone()),
                    MeshMaterial3d(material),
                    transform,
                    BeamTrail {
                        lifetime: effect.lifetime,
                        initial_lifetime: effect.lifetime,
                        thickness: effect.scale,
                        length: transform.scale.y,
                    },
                ));
            }
            CosmeticRequest::Sound { .. } => {}
        }
    }
}

/// Play one random variant of each requested sound cue.
pub fn play_fire_sounds(mut commands: Commands, mut requests: MessageReader<CosmeticRequest>) {
    let mut rng = rand::rng();
    for request in requests.read() {
        let CosmeticRequest::Sound { cue, location } = request else {
            continue;
        };
        let Some(clip) = cue.variants.choose(&mut rng) else {
            continue;
        };
        commands.spawn((
            AudioPlayer::new(clip.clone()),
            PlaybackSettings::DESPAWN.with_volume(Volume::Linear(cue.volume)),
            Transform::from_translation(*location),
        ));
    }
}

/// Shrink bursts over their lifetime and despawn them when it runs out.
pub fn fade_cosmetic_bursts(
    mut commands: Commands,
    time: Res<Time>,
    mut bursts: Query<(Entity, &mut CosmeticBurst, &mut Transform)>,
) {
    let dt = time.delta_secs();

    for (entity, mut burst, mut transform) in bursts.iter_mut() {
        burst.lifetime -= dt;

        if burst.lifetime <= 0.0 {
            commands.entity(entity).despawn();
        } else {
            let fraction = remaining_fraction(burst.lifetime, burst.initial_lifetime);
            transform.scale = Vec3::splat(burst.scale * fraction);
        }
    }
}

/// Thin beams out over their lifetime, keeping their length.
pub fn fade_beam_trails(
    mut commands: Commands,
    time: Res<Time>,
    mut beams: Query<(Entity, &mut BeamTrail, &mut Transform)>,
) {
    let dt = time.delta_secs();

    for (entity, mut beam, mut transform) in beams.iter_mut() {
        beam.lifetime -= dt;

        if beam.lifetime <= 0.0 {
            commands.entity(entity).despawn();
        } else {
            let fraction = remaining_fraction(beam.lifetime, beam.initial_lifetime);
            let thickness = beam.thickness * fraction;
            transform.scale = Vec3::new(thickness, beam.length, thickness);
        }
    }
}

/// Transform stretching the unit beam cylinder from `start` to `end`.
///
/// `None` for a zero-length beam.
pub fn beam_transform(start: Vec3, end: Vec3, thickness: f32) -> Option<Transform> {
    let span = end - start;
    let direction = Dir3::new(span).ok()?;
    let length = span.length();

    Some(Transform {
        translation: start + span * 0.5,
        rotation: Quat::from_rotation_arc(Vec3::Y, *direction),
        scale: Vec3::new(thickness, length, thickness),
    })
}

fn remaining_fraction(lifetime: f32, initial: f32) -> f32 {
    if initial <= 0.0 {
        return 0.0;
    }
    (lifetime / initial).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beam_spans_muzzle_to_impact() {
        let start = Vec3::new(0.0, 1.0, 0.0);
        let end = Vec3::new(0.0, 1.0, -10.0);

        let transform = beam_transform(start, end, 0.02).unwrap();
        assert!(transform.translation.abs_diff_eq(Vec3::new(0.0, 1.0, -5.0), 1e-5));
        assert!((transform.scale.y - 10.0).abs() < 1e-5);
        assert_eq!(transform.scale.x, 0.02);

        // The cylinder's +Y axis points at the impact.
        let tip = transform.transform_point(Vec3::new(0.0, 0.5, 0.0));
        assert!(tip.abs_diff_eq(end, 1e-4));
    }

    #[test]
    fn test_zero_length_beam_is_skipped() {
        assert!(beam_transform(Vec3::ONE, Vec3::ONE, 0.02).is_none());
    }

    #[test]
    fn test_remaining_fraction_is_clamped() {
        assert_eq!(remaining_fraction(0.05, 0.1), 0.5);
        assert_eq!(remaining_fraction(0.2, 0.1), 1.0);
        assert_eq!(remaining_fraction(0.1, 0.0), 0.0);
    }
}
