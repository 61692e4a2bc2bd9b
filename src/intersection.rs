//! Per-ray hit records used by the shading pipeline.

use crate::algebra::{align_zero, Point, Vector};
use crate::error::Result;
use crate::light::LightSource;
use crate::object::Geometry;
use crate::ray::Ray;

/// A point where a ray meets a geometry.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    /// Geometry that was hit.
    pub geometry: &'a Geometry,
    /// Hit point.
    pub point: Point,
    /// Ray parameter of the hit.
    pub t: f64,
}

impl<'a> Hit<'a> {
    pub fn new(geometry: &'a Geometry, point: Point, t: f64) -> Self {
        Self { geometry, point, t }
    }
}

/// A hit prepared for shading: incoming direction, surface normal and their
/// dot product.
#[derive(Debug, Clone, Copy)]
pub struct Intersection<'a> {
    pub geometry: &'a Geometry,
    pub point: Point,
    /// Unit direction of the incoming ray.
    pub v: Vector,
    /// Unit surface normal at `point`.
    pub normal: Vector,
    /// `v · normal`, snapped to zero for grazing rays.
    pub v_n: f64,
}

impl<'a> Intersection<'a> {
    pub fn new(hit: Hit<'a>, ray: &Ray) -> Result<Self> {
        let normal = hit.geometry.normal(&hit.point)?;
        let v = *ray.direction();
        Ok(Self {
            geometry: hit.geometry,
            point: hit.point,
            v,
            normal,
            v_n: align_zero(v.dot(&normal)),
        })
    }

    /// Ray grazes the surface; no direct lighting applies.
    pub fn is_grazing(&self) -> bool {
        self.v_n == 0.0
    }

    /// Fill the per-light fields for `light`.
    ///
    /// `None` when the light has no direction at this point (a positional
    /// light sitting exactly on the surface).
    pub fn with_light<'l>(&self, light: &'l LightSource) -> Option<LightContext<'l>> {
        let l = light.direction_to(&self.point)?;
        Some(LightContext {
            light,
            l,
            l_n: align_zero(l.dot(&self.normal)),
        })
    }
}

/// Per-light part of an intersection.
#[derive(Debug, Clone, Copy)]
pub struct LightContext<'l> {
    pub light: &'l LightSource,
    /// Unit direction the light travels, from the light toward the point.
    pub l: Vector,
    /// `l · normal`, snapped to zero.
    pub l_n: f64,
}
