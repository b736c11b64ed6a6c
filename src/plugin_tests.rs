//! App-level tests for the core plugin's system chain.
//!
//! Most tests run without physics, where shots fire through the collision-free
//! fallback. The `physics` module installs avian3d.

use std::time::Duration;

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy::transform::TransformPlugin;

use crate::prelude::*;
use crate::types::effects;

const FRAME: f32 = 1.0 / 64.0;

/// Messages written during the frames a test ran.
#[derive(Resource, Default)]
struct Captured {
    shots: Vec<ShotFired>,
    cosmetics: Vec<CosmeticRequest>,
    montages: Vec<MontageRequest>,
}

fn capture_messages(
    mut captured: ResMut<Captured>,
    mut shots: MessageReader<ShotFired>,
    mut cosmetics: MessageReader<CosmeticRequest>,
    mut montages: MessageReader<MontageRequest>,
) {
    captured.shots.extend(shots.read().copied());
    captured.cosmetics.extend(cosmetics.read().cloned());
    captured.montages.extend(montages.read().cloned());
}

fn add_test_harness(app: &mut App) {
    app.init_resource::<Captured>()
        .add_systems(Update, capture_messages.after(CombatSet::Fire))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
            FRAME,
        )));
}

fn test_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, TransformPlugin))
        .add_plugins(ShooterCombatCorePlugin);
    add_test_harness(&mut app);
    // The first update only primes the clock.
    app.update();
    app
}

fn full_kit() -> WeaponCosmetics {
    WeaponCosmetics::default()
        .with_fire_sound(SoundCue::new(vec![Handle::default()]))
        .with_muzzle_flash(effects::muzzle_flash())
        .with_impact_particles(effects::impact_sparks())
        .with_beam_particles(effects::smoke_beam())
        .with_hip_fire_montage(MontageId::new("HipFire"))
}

fn spawn_shooter(app: &mut App) -> Entity {
    app.world_mut().spawn(Shooter).id()
}

fn send(app: &mut App, shooter: Entity, action: CombatAction) {
    app.world_mut()
        .write_message(CombatInput::new(shooter, action));
}

fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

#[test]
fn test_shooter_pulls_in_combat_state() {
    let mut app = test_app();
    let shooter = spawn_shooter(&mut app);

    let entity = app.world().entity(shooter);
    assert!(entity.contains::<AimState>());
    assert!(entity.contains::<CameraZoom>());
    assert!(entity.contains::<CrosshairSpread>());
    assert!(entity.contains::<FireCadence>());
    assert!(entity.contains::<LastShot>());
}

#[test]
fn test_aim_input_zooms_and_switches_rates() {
    let mut app = test_app();
    let shooter = spawn_shooter(&mut app);

    send(&mut app, shooter, CombatAction::AimPressed);
    run_frames(&mut app, 1);

    let world = app.world();
    assert!(world.get::<AimState>(shooter).unwrap().is_aiming());
    let fov = world.get::<CameraZoom>(shooter).unwrap().current_fov;
    assert!(fov < 90.0 && fov > 35.0);
    assert_eq!(world.get::<LookRates>(shooter).unwrap().turn_rate, 20.0);

    send(&mut app, shooter, CombatAction::AimReleased);
    run_frames(&mut app, 200);

    let world = app.world();
    assert!(!world.get::<AimState>(shooter).unwrap().is_aiming());
    assert_eq!(world.get::<CameraZoom>(shooter).unwrap().current_fov, 90.0);
    assert_eq!(world.get::<LookRates>(shooter).unwrap().turn_rate, 90.0);
}

#[test]
fn test_held_fire_schedules_shots_each_interval() {
    let mut app = test_app();
    app.world_mut()
        .resource_mut::<ShooterCombatConfig>()
        .fire
        .automatic_fire_interval = 1.0 / 8.0;
    let shooter = spawn_shooter(&mut app);

    send(&mut app, shooter, CombatAction::FirePressed);
    run_frames(&mut app, 1);
    let cadence = app.world().get::<FireCadence>(shooter).unwrap();
    assert_eq!(cadence.phase(), CadencePhase::Cooling);
    assert_eq!(cadence.shots_fired(), 1);

    // One second in total: the press shot plus one every eighth of a second.
    run_frames(&mut app, 63);
    assert_eq!(
        app.world().get::<FireCadence>(shooter).unwrap().shots_fired(),
        8
    );

    send(&mut app, shooter, CombatAction::FireReleased);
    run_frames(&mut app, 32);
    let cadence = app.world().get::<FireCadence>(shooter).unwrap();
    assert_eq!(cadence.shots_fired(), 8);
    assert_eq!(cadence.phase(), CadencePhase::Idle);

    let indices: Vec<u64> = app
        .world()
        .resource::<Captured>()
        .shots
        .iter()
        .map(|shot| shot.shot_index)
        .collect();
    assert_eq!(indices, (1..=8).collect::<Vec<u64>>());
}

#[test]
fn test_shots_fire_without_physics() {
    let mut app = test_app();
    let shooter = app
        .world_mut()
        .spawn((Shooter, full_kit(), Transform::from_xyz(1.0, 0.0, 0.0)))
        .id();
    // Propagate the global transform.
    run_frames(&mut app, 1);

    send(&mut app, shooter, CombatAction::FirePressed);
    run_frames(&mut app, 1);

    let world = app.world();
    let cadence = world.get::<FireCadence>(shooter).unwrap();
    assert_eq!(cadence.phase(), CadencePhase::Cooling);
    assert!(cadence.is_bullet_pulse_active());

    let captured = world.resource::<Captured>();
    assert_eq!(captured.shots.len(), 1);
    assert_eq!(captured.shots[0].impact, None);
    assert_eq!(captured.shots[0].muzzle, Vec3::new(1.0, 0.0, 0.0));
    // Sound and flash; nothing confirms an impact.
    assert_eq!(captured.cosmetics.len(), 2);
    assert!(matches!(captured.cosmetics[0], CosmeticRequest::Sound { .. }));
    assert_eq!(captured.montages.len(), 2);
    assert!(captured.montages.iter().all(|request| request.shooter == shooter));
    assert_eq!(
        world.get::<LastShot>(shooter).unwrap().muzzle,
        Vec3::new(1.0, 0.0, 0.0)
    );
}

#[test]
fn test_aim_toggle_in_one_frame_keeps_fov() {
    let mut app = test_app();
    let camera = app
        .world_mut()
        .spawn(Projection::Perspective(PerspectiveProjection::default()))
        .id();
    let shooter = app.world_mut().spawn((Shooter, ShooterCamera(camera))).id();
    run_frames(&mut app, 1);
    let fov_before = match app.world().get::<Projection>(camera).unwrap() {
        Projection::Perspective(perspective) => perspective.fov,
        _ => panic!("camera projection is no longer perspective"),
    };

    send(&mut app, shooter, CombatAction::AimPressed);
    send(&mut app, shooter, CombatAction::AimReleased);
    run_frames(&mut app, 1);

    let world = app.world();
    assert!(!world.get::<AimState>(shooter).unwrap().is_aiming());
    assert_eq!(world.get::<CameraZoom>(shooter).unwrap().current_fov, 90.0);
    let Projection::Perspective(perspective) = world.get::<Projection>(camera).unwrap() else {
        panic!("camera projection is no longer perspective");
    };
    assert_eq!(perspective.fov, fov_before);
    assert_eq!(fov_before, 90.0_f32.to_radians());
}

#[test]
fn test_spread_follows_movement_sample() {
    let mut app = test_app();
    let shooter = spawn_shooter(&mut app);

    run_frames(&mut app, 1);
    assert_eq!(
        app.world().get::<CrosshairSpread>(shooter).unwrap().multiplier(),
        0.5
    );

    app.world_mut()
        .get_mut::<MovementSample>(shooter)
        .unwrap()
        .velocity = Vec3::new(600.0, 0.0, 0.0);
    run_frames(&mut app, 1);

    let world = app.world();
    assert_eq!(world.get::<CrosshairSpread>(shooter).unwrap().multiplier(), 1.5);
    assert_eq!(world.get::<AnimationProperties>(shooter).unwrap().speed, 600.0);
}

#[test]
fn test_look_input_turns_control_rotation() {
    let mut app = test_app();
    let shooter = spawn_shooter(&mut app);

    app.world_mut().write_message(LookInput {
        shooter,
        source: LookSource::Gamepad,
        value: Vec2::new(1.0, 0.0),
    });
    app.world_mut().write_message(LookInput {
        shooter,
        source: LookSource::Mouse,
        value: Vec2::new(0.0, 10.0),
    });
    run_frames(&mut app, 1);

    let rotation = app.world().get::<ControlRotation>(shooter).unwrap();
    assert!((rotation.yaw - 90.0 * FRAME).abs() < 1e-4);
    assert!((rotation.pitch - 1.0).abs() < 1e-4);
}

#[test]
fn test_camera_projection_follows_zoom() {
    let mut app = test_app();
    let camera = app
        .world_mut()
        .spawn(Projection::Perspective(PerspectiveProjection::default()))
        .id();
    let shooter = app.world_mut().spawn((Shooter, ShooterCamera(camera))).id();

    send(&mut app, shooter, CombatAction::AimPressed);
    run_frames(&mut app, 200);

    let Projection::Perspective(perspective) = app.world().get::<Projection>(camera).unwrap()
    else {
        panic!("camera projection is no longer perspective");
    };
    assert!((perspective.fov - 35.0_f32.to_radians()).abs() < 1e-6);
}

#[test]
fn test_input_for_unknown_entity_is_ignored() {
    let mut app = test_app();
    let bystander = app.world_mut().spawn_empty().id();

    send(&mut app, bystander, CombatAction::FirePressed);
    run_frames(&mut app, 1);

    assert!(app.world().get::<FireCadence>(bystander).is_none());
}

#[cfg(feature = "dim3")]
mod physics {
    use avian3d::prelude::{
        Collider, PhysicsPlugins, RigidBody, SpatialQuery, SpatialQueryPipeline,
    };
    use bevy::asset::AssetPlugin;
    use bevy::ecs::system::RunSystemOnce;

    use super::*;
    use crate::systems::firing::{fire_weapon, FirePorts};
    use crate::systems::targeting::AvianRayCaster;
    use crate::testing::{FixedProjector, RecordingAnimation};

    const SOCKET: Vec3 = Vec3::new(0.3, 1.5, -0.2);

    fn physics_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, TransformPlugin, AssetPlugin::default()))
            .init_asset::<Mesh>()
            .add_plugins(PhysicsPlugins::default())
            .add_plugins(ShooterCombatCorePlugin);
        add_test_harness(&mut app);
        app.update();
        app
    }

    /// Wall whose front face sits at z = -19.5, plus a shooter with a body
    /// collider and a socket collider that traces must ignore.
    fn spawn_range(app: &mut App) -> (Entity, Entity) {
        let world = app.world_mut();
        world.spawn((
            RigidBody::Static,
            Collider::cuboid(40.0, 40.0, 1.0),
            Transform::from_xyz(0.0, 1.5, -20.0),
        ));
        let socket = world
            .spawn((
                RigidBody::Static,
                Collider::sphere(0.1),
                Transform::from_translation(SOCKET),
            ))
            .id();
        let shooter = world
            .spawn((
                Shooter,
                full_kit(),
                RigidBody::Static,
                Collider::sphere(0.5),
                Transform::default(),
                MuzzleSocket(socket),
            ))
            .id();
        // Let transforms propagate and the pipeline pick up the colliders.
        run_frames(app, 4);
        (shooter, socket)
    }

    #[test]
    fn test_weapon_trace_confirms_wall_through_avian() {
        let mut app = physics_app();
        let (shooter, socket) = spawn_range(&mut app);

        let (report, cosmetics, unfiltered) = app
            .world_mut()
            .run_system_once(move |spatial_query: SpatialQuery| {
                let muzzle = Transform::from_translation(SOCKET);
                let ray_caster =
                    AvianRayCaster::new(&spatial_query).excluding([shooter, socket]);
                let mut cosmetics: Vec<CosmeticRequest> = Vec::new();
                let mut ports = FirePorts {
                    projector: &FixedProjector::looking_forward(Vec3::new(0.0, 1.5, 0.0)),
                    ray_caster: &ray_caster,
                    cosmetics: &mut cosmetics,
                    animation: &mut RecordingAnimation::default(),
                };
                let report = fire_weapon(
                    muzzle,
                    &full_kit(),
                    &mut ports,
                    &mut FireCadence::default(),
                    &FireTuning::default(),
                );
                let unfiltered = AvianRayCaster::new(&spatial_query)
                    .cast(SOCKET, SOCKET + Vec3::NEG_Z * 50.0)
                    .map(|hit| hit.point);
                (report, cosmetics, unfiltered)
            })
            .unwrap();

        let aim_point = report.aim_point.unwrap();
        assert!((aim_point.z + 19.5).abs() < 1e-3);
        let impact = report.impact.unwrap();
        assert!((impact.z + 19.5).abs() < 1e-3);
        assert!(impact.x.abs() < 1e-3);

        let beam = cosmetics.iter().find_map(|request| match request {
            CosmeticRequest::Beam { origin, target, .. } => Some((*origin, *target)),
            _ => None,
        });
        assert_eq!(beam, Some((Transform::from_translation(SOCKET), impact)));

        // Without exclusions the socket's own collider stops the trace.
        assert!(unfiltered.unwrap().distance(SOCKET) < 0.2);
    }

    #[test]
    fn test_fire_system_uses_socket_and_numbers_shots() {
        let mut app = physics_app();
        assert!(app.world().contains_resource::<SpatialQueryPipeline>());
        let (shooter, _) = spawn_range(&mut app);
        let gone = app.world_mut().spawn_empty().id();
        app.world_mut().despawn(gone);
        app.world_mut()
            .entity_mut(shooter)
            .insert(ShooterCamera(gone));

        send(&mut app, shooter, CombatAction::FirePressed);
        send(&mut app, shooter, CombatAction::FireReleased);
        run_frames(&mut app, 40);
        send(&mut app, shooter, CombatAction::FirePressed);
        send(&mut app, shooter, CombatAction::FireReleased);
        run_frames(&mut app, 1);

        let world = app.world();
        let captured = world.resource::<Captured>();
        let indices: Vec<u64> = captured.shots.iter().map(|shot| shot.shot_index).collect();
        assert_eq!(indices, vec![1, 2]);
        for shot in &captured.shots {
            assert_eq!(shot.shooter, shooter);
            assert!(shot.muzzle.distance(SOCKET) < 1e-5);
            // The camera is gone, so nothing is deprojected.
            assert_eq!(shot.aim_point, None);
            assert_eq!(shot.impact, None);
        }

        let flash = captured.cosmetics.iter().find_map(|request| match request {
            CosmeticRequest::Particles { transform, .. } => Some(transform.translation),
            _ => None,
        });
        assert!(flash.unwrap().distance(SOCKET) < 1e-5);
        assert_eq!(captured.montages.len(), 4);

        let last_shot = world.get::<LastShot>(shooter).unwrap();
        assert!(last_shot.muzzle.distance(SOCKET) < 1e-5);
        assert_eq!(world.get::<FireCadence>(shooter).unwrap().shots_fired(), 2);
    }
}
