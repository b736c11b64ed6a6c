//! Weapon fire sequence - cosmetics, two-stage hit-scan trace, montage, cadence.

use bevy::ecs::entity::EntityHashSet;
use bevy::ecs::message::MessageWriter;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::components::{
    FireCadence, LastShot, MuzzleSocket, Shooter, ShooterCamera, WeaponCosmetics,
};
use crate::events::{CosmeticRequest, MontageCommand, MontageRequest, ShotFired};
use crate::resources::{FireTuning, ShooterCombatConfig};
use crate::systems::targeting::{resolve_aim_point, CameraProjector, EmptyWorld};
use crate::types::{
    AnimationPort, CosmeticSpawner, MontageId, ParticleEffect, RayCastPort, SoundCue,
    ViewportProjector,
};

#[cfg(feature = "dim3")]
use crate::systems::targeting::AvianRayCaster;

/// The world-facing collaborators one shot needs.
pub struct FirePorts<'a, P, R, C, A> {
    pub projector: &'a P,
    pub ray_caster: &'a R,
    pub cosmetics: &'a mut C,
    pub animation: &'a mut A,
}

/// What one fire sequence resolved.
///
/// # Fields
/// * `aim_point` - Screen-centre target, `None` if deprojection failed
/// * `impact` - Weapon-trace impact, `None` if the weapon trace did not confirm
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShotReport {
    pub aim_point: Option<Vec3>,
    pub impact: Option<Vec3>,
}

/// Run the fire sequence for one accepted shot.
///
/// Sound, muzzle flash, montage and the cadence pulse happen on every shot.
/// Impact particles and the beam need the weapon trace, cast from the muzzle
/// through the crosshair target and `weapon_trace_overshoot` times as far, to
/// confirm a blocking hit. Each cosmetic is skipped when its asset is unset.
///
/// # Arguments
/// * `muzzle` - World transform of the barrel socket
/// * `weapon` - Cosmetic assets of the equipped weapon
/// * `ports` - Projector, ray caster, cosmetic spawner and animation player
/// * `cadence` - Fire gate to notify once the shot went out
/// * `tuning` - Trace range, overshoot and montage section
pub fn fire_weapon<P, R, C, A>(
    muzzle: Transform,
    weapon: &WeaponCosmetics,
    ports: &mut FirePorts<'_, P, R, C, A>,
    cadence: &mut FireCadence,
    tuning: &FireTuning,
) -> ShotReport
where
    P: ViewportProjector,
    R: RayCastPort,
    C: CosmeticSpawner,
    A: AnimationPort,
{
    if let Some(cue) = &weapon.fire_sound {
        ports.cosmetics.play_sound(cue, muzzle.translation);
    }
    if let Some(flash) = &weapon.muzzle_flash {
        ports.cosmetics.spawn_particles(flash, muzzle);
    }

    let aim_point = resolve_aim_point(ports.projector, ports.ray_caster, tuning.trace_range);
    let impact = aim_point.and_then(|target| {
        let start = muzzle.translation;
        let end = start + (target - start) * tuning.weapon_trace_overshoot;
        ports.ray_caster.cast(start, end).map(|hit| hit.point)
    });
    trace!("shot resolved: aim point {aim_point:?}, impact {impact:?}");

    if let Some(point) = impact {
        if let Some(particles) = &weapon.impact_particles {
            ports
                .cosmetics
                .spawn_particles(particles, Transform::from_translation(point));
        }
        if let Some(beam) = &weapon.beam_particles {
            ports.cosmetics.spawn_beam(beam, muzzle, point);
        }
    }

    if let Some(montage) = &weapon.hip_fire_montage {
        ports.animation.play_montage(montage);
        ports
            .animation
            .jump_to_section(&tuning.start_fire_section, montage);
    }

    cadence.register_shot(tuning);

    ShotReport { aim_point, impact }
}

impl CosmeticSpawner for Vec<CosmeticRequest> {
    fn play_sound(&mut self, cue: &SoundCue, location: Vec3) {
        self.push(CosmeticRequest::Sound {
            cue: cue.clone(),
            location,
        });
    }

    fn spawn_particles(&mut self, effect: &ParticleEffect, at: Transform) {
        self.push(CosmeticRequest::Particles {
            effect: effect.clone(),
            transform: at,
        });
    }

    fn spawn_beam(&mut self, effect: &ParticleEffect, origin: Transform, target: Vec3) {
        self.push(CosmeticRequest::Beam {
            effect: effect.clone(),
            origin,
            target,
        });
    }
}

/// [`AnimationPort`] that turns montage calls into [`MontageRequest`] messages.
pub struct MontageQueue {
    shooter: Entity,
    pub requests: Vec<MontageRequest>,
}

impl MontageQueue {
    pub fn new(shooter: Entity) -> Self {
        Self {
            shooter,
            requests: Vec::new(),
        }
    }

    /// Re-target the queue at another shooter, keeping queued requests.
    pub fn set_shooter(&mut self, shooter: Entity) {
        self.shooter = shooter;
    }
}

impl AnimationPort for MontageQueue {
    fn play_montage(&mut self, montage: &MontageId) {
        self.requests.push(MontageRequest {
            shooter: self.shooter,
            montage: montage.clone(),
            command: MontageCommand::Play,
        });
    }

    fn jump_to_section(&mut self, section: &str, montage: &MontageId) {
        self.requests.push(MontageRequest {
            shooter: self.shooter,
            montage: montage.clone(),
            command: MontageCommand::JumpToSection(section.to_string()),
        });
    }
}

/// Shooter state and message writers shared by the fire systems.
#[derive(SystemParam)]
pub struct PendingShots<'w, 's> {
    config: Res<'w, ShooterCombatConfig>,
    cameras: Query<'w, 's, (&'static Camera, &'static GlobalTransform)>,
    sockets: Query<'w, 's, &'static GlobalTransform>,
    shooters: Query<
        'w,
        's,
        (
            Entity,
            &'static GlobalTransform,
            &'static WeaponCosmetics,
            &'static mut FireCadence,
            &'static mut LastShot,
            Option<&'static ShooterCamera>,
            Option<&'static MuzzleSocket>,
        ),
        With<Shooter>,
    >,
    cosmetic_requests: MessageWriter<'w, CosmeticRequest>,
    montage_requests: MessageWriter<'w, MontageRequest>,
    shots: MessageWriter<'w, ShotFired>,
    warned_missing_camera: Local<'s, EntityHashSet>,
}

impl PendingShots<'_, '_> {
    /// Fire every pending shot. `ray_caster_for` builds the caster for one
    /// shooter from the entities its traces must ignore.
    fn fire_all<R: RayCastPort>(&mut self, ray_caster_for: impl Fn(Vec<Entity>) -> R) {
        let Self {
            config,
            cameras,
            sockets,
            shooters,
            cosmetic_requests,
            montage_requests,
            shots,
            warned_missing_camera,
        } = self;
        let mut cosmetics: Vec<CosmeticRequest> = Vec::new();
        let mut montages = MontageQueue::new(Entity::PLACEHOLDER);

        for (entity, transform, weapon, mut cadence, mut last_shot, camera, socket) in
            shooters.iter_mut()
        {
            let pending = cadence.take_pending_shots();
            if pending == 0 {
                continue;
            }

            let projector = camera.and_then(|camera| match cameras.get(camera.0) {
                Ok((camera, camera_transform)) => {
                    Some(CameraProjector::new(camera, camera_transform))
                }
                Err(_) => {
                    if warned_missing_camera.insert(entity) {
                        warn!("shooter {entity} references a camera that does not exist");
                    }
                    None
                }
            });

            let mut excluded = vec![entity];
            let socket = socket
                .and_then(|socket| sockets.get(socket.0).ok().map(|at| (socket.0, at)));
            let muzzle = match socket {
                Some((socket_entity, socket_transform)) => {
                    excluded.push(socket_entity);
                    socket_transform.compute_transform()
                }
                None => transform.compute_transform(),
            };

            let ray_caster = ray_caster_for(excluded);
            montages.set_shooter(entity);

            for _ in 0..pending {
                let mut ports = FirePorts {
                    projector: &projector,
                    ray_caster: &ray_caster,
                    cosmetics: &mut cosmetics,
                    animation: &mut montages,
                };
                let report = fire_weapon(muzzle, weapon, &mut ports, &mut cadence, &config.fire);

                *last_shot = LastShot {
                    muzzle: muzzle.translation,
                    aim_point: report.aim_point,
                    impact: report.impact,
                };
                shots.write(ShotFired {
                    shooter: entity,
                    muzzle: muzzle.translation,
                    aim_point: report.aim_point,
                    impact: report.impact,
                    shot_index: cadence.shots_fired(),
                });
                debug!(
                    "shooter {entity} fired shot {} (impact confirmed: {})",
                    cadence.shots_fired(),
                    report.impact.is_some()
                );
            }
        }

        cosmetic_requests.write_batch(cosmetics);
        montage_requests.write_batch(montages.requests);
    }
}

/// Run the fire sequence for every shot the cadence accepted this frame.
///
/// Runs after input handling and the per-tick update so both traces see
/// this frame's camera. Shooters whose camera is missing still fire; they
/// just never confirm an impact.
#[cfg(feature = "dim3")]
pub fn fire_pending_shots(
    spatial_query: avian3d::prelude::SpatialQuery,
    mut pending: PendingShots,
) {
    pending.fire_all(|excluded| AvianRayCaster::new(&spatial_query).excluding(excluded));
}

/// Fire sequence for apps without a collision world.
///
/// Sound, flash, montage and the cadence update still happen on every shot;
/// no trace ever confirms an impact.
pub fn fire_pending_shots_without_physics(mut pending: PendingShots) {
    pending.fire_all(|_| EmptyWorld);
}
