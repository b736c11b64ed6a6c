//! Crosshair targeting - turns the viewport centre into a world-space aim point.

use bevy::prelude::*;

use crate::types::{AimRay, RayCastPort, TraceHit, ViewportProjector};

/// Resolve what the crosshair is pointing at.
///
/// The screen point is the exact viewport centre. The deprojected ray is cast
/// `range` units; a blocking hit gives the hit location, a miss gives the far
/// end of the ray so downstream beam logic always has a target.
///
/// # Returns
/// `None` only when deprojection fails (no camera, no viewport)
pub fn resolve_aim_point(
    projector: &impl ViewportProjector,
    ray_caster: &impl RayCastPort,
    range: f32,
) -> Option<Vec3> {
    let ray = projector.screen_center_ray()?;
    let far_end = ray.point_at(range);

    let point = match ray_caster.cast(ray.origin, far_end) {
        Some(hit) => hit.point,
        None => far_end,
    };
    Some(point)
}

/// [`ViewportProjector`] over a Bevy camera.
pub struct CameraProjector<'a> {
    camera: &'a Camera,
    transform: &'a GlobalTransform,
}

impl<'a> CameraProjector<'a> {
    pub fn new(camera: &'a Camera, transform: &'a GlobalTransform) -> Self {
        Self { camera, transform }
    }
}

impl ViewportProjector for CameraProjector<'_> {
    fn screen_center_ray(&self) -> Option<AimRay> {
        let size = self.camera.logical_viewport_size()?;
        self.camera
            .viewport_to_world(self.transform, size / 2.0)
            .ok()
            .map(AimRay::from)
    }
}

/// A shooter whose camera is gone projects nothing.
impl<P: ViewportProjector> ViewportProjector for Option<P> {
    fn screen_center_ray(&self) -> Option<AimRay> {
        self.as_ref().and_then(|projector| projector.screen_center_ray())
    }
}

/// [`RayCastPort`] for an app without a collision world. Every cast misses.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyWorld;

impl RayCastPort for EmptyWorld {
    fn cast(&self, _start: Vec3, _end: Vec3) -> Option<TraceHit> {
        None
    }
}

/// [`RayCastPort`] over avian3d's spatial query pipeline.
///
/// Casts exclude the shooter so the weapon trace cannot stop on its own body.
#[cfg(feature = "dim3")]
pub struct AvianRayCaster<'a, 'w, 's> {
    spatial_query: &'a avian3d::prelude::SpatialQuery<'w, 's>,
    filter: avian3d::prelude::SpatialQueryFilter,
}

#[cfg(feature = "dim3")]
impl<'a, 'w, 's> AvianRayCaster<'a, 'w, 's> {
    pub fn new(spatial_query: &'a avian3d::prelude::SpatialQuery<'w, 's>) -> Self {
        Self {
            spatial_query,
            filter: avian3d::prelude::SpatialQueryFilter::default(),
        }
    }

    pub fn excluding(mut self, entities: impl IntoIterator<Item = Entity>) -> Self {
        self.filter = self.filter.with_excluded_entities(entities);
        self
    }
}

#[cfg(feature = "dim3")]
impl RayCastPort for AvianRayCaster<'_, '_, '_> {
    fn cast(&self, start: Vec3, end: Vec3) -> Option<TraceHit> {
        let segment = end - start;
        let direction = Dir3::new(segment).ok()?;

        let hit = self
            .spatial_query
            .cast_ray(start, direction, segment.length(), true, &self.filter)?;

        Some(TraceHit {
            point: start + *direction * hit.distance,
            normal: hit.normal,
            entity: Some(hit.entity),
        })
    }
}
