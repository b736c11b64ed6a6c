//! Scripted stand-ins for the world ports, shared by unit tests.

use std::cell::RefCell;

use bevy::prelude::*;

use crate::types::{AimRay, AnimationPort, MontageId, RayCastPort, TraceHit, ViewportProjector};

/// Projector that always returns the same ray (or fails).
pub struct FixedProjector(pub Option<AimRay>);

impl FixedProjector {
    /// Camera at `origin` looking down -Z.
    pub fn looking_forward(origin: Vec3) -> Self {
        Self(Some(AimRay::new(origin, Dir3::NEG_Z)))
    }

    pub fn detached() -> Self {
        Self(None)
    }
}

impl ViewportProjector for FixedProjector {
    fn screen_center_ray(&self) -> Option<AimRay> {
        self.0
    }
}

/// Ray caster answering from a closure and recording every segment it saw.
pub struct ScriptedRayCaster<F> {
    answer: F,
    pub casts: RefCell<Vec<(Vec3, Vec3)>>,
}

impl<F> ScriptedRayCaster<F>
where
    F: Fn(usize, Vec3, Vec3) -> Option<TraceHit>,
{
    /// `answer` receives the zero-based cast index and the segment.
    pub fn new(answer: F) -> Self {
        Self {
            answer,
            casts: RefCell::new(Vec::new()),
        }
    }
}

impl<F> RayCastPort for ScriptedRayCaster<F>
where
    F: Fn(usize, Vec3, Vec3) -> Option<TraceHit>,
{
    fn cast(&self, start: Vec3, end: Vec3) -> Option<TraceHit> {
        let index = self.casts.borrow().len();
        self.casts.borrow_mut().push((start, end));
        (self.answer)(index, start, end)
    }
}

/// Blocking plane `z = wall_z` facing +Z, hit by segments that cross it.
pub fn wall_at(wall_z: f32) -> impl Fn(usize, Vec3, Vec3) -> Option<TraceHit> {
    move |_, start: Vec3, end: Vec3| {
        if (start.z - wall_z) * (end.z - wall_z) > 0.0 || start.z == end.z {
            return None;
        }
        let t = (start.z - wall_z) / (start.z - end.z);
        Some(TraceHit {
            point: start.lerp(end, t),
            normal: Vec3::Z,
            entity: None,
        })
    }
}

/// Montage call recorded by [`RecordingAnimation`].
#[derive(Clone, Debug, PartialEq)]
pub enum MontageCall {
    Play(MontageId),
    Jump(MontageId, String),
}

#[derive(Default)]
pub struct RecordingAnimation {
    pub calls: Vec<MontageCall>,
}

impl AnimationPort for RecordingAnimation {
    fn play_montage(&mut self, montage: &MontageId) {
        self.calls.push(MontageCall::Play(montage.clone()));
    }

    fn jump_to_section(&mut self, section: &str, montage: &MontageId) {
        self.calls
            .push(MontageCall::Jump(montage.clone(), section.to_string()));
    }
}
