//! Finite capped cylinder: a [`Tube`] cut at axial positions `0` and `height`.

use crate::aabb::Aabb;
use crate::algebra::{align_zero, Double3, Point, Vector};
use crate::error::{Error, Result};
use crate::ray::Ray;
use crate::tube::{reject, Tube};

/// Tolerance for deciding whether a surface point lies on a cap.
const SURFACE_TOLERANCE: f64 = 1e-8;

#[derive(Clone, Copy, Debug)]
pub struct Cylinder {
    tube: Tube,
    height: f64,
}

impl Cylinder {
    /// Fails unless `radius` and `height` are positive and finite.
    pub fn new(axis: Ray, radius: f64, height: f64) -> Result<Self> {
        if !(height.is_finite() && align_zero(height) > 0.0) {
            return Err(Error::construction(format!("cylinder: height must be positive, got {height}")));
        }
        let tube = Tube::new(axis, radius)
            .map_err(|e| Error::construction(format!("cylinder: {e}")))?;
        Ok(Self { tube, height })
    }

    pub fn axis(&self) -> &Ray { self.tube.axis() }

    pub fn radius(&self) -> f64 { self.tube.radius() }

    pub fn height(&self) -> f64 { self.height }

    /// Outward unit normal: `∓axis` on the caps, radial on the side.
    ///
    /// Points within [`SURFACE_TOLERANCE`] of a cap plane and inside the cap
    /// radius take the cap normal.
    pub fn normal(&self, p: &Point) -> Result<Vector> {
        let axial = self.tube.axial(p);
        let dir = *self.axis().direction();
        let radial = reject(p.xyz().sub(self.axis().origin().xyz()), dir.xyz());
        let r = self.radius();
        let within_cap = radial.dot(radial) <= (r + SURFACE_TOLERANCE) * (r + SURFACE_TOLERANCE);

        if within_cap && axial.abs() <= SURFACE_TOLERANCE {
            return Ok(-dir);
        }
        if within_cap && (axial - self.height).abs() <= SURFACE_TOLERANCE {
            return Ok(dir);
        }
        self.tube.normal(p)
    }

    /// Positive ray parameters of side and cap crossings, sorted.
    ///
    /// Side hits must lie strictly between the caps; cap hits strictly
    /// inside the cap radius.
    pub fn intersect(&self, ray: &Ray) -> Vec<f64> {
        let mut hits: Vec<f64> = self
            .tube
            .intersect(ray)
            .into_iter()
            .filter(|&t| {
                let axial = self.tube.axial(&ray.point_at(t));
                axial > 0.0 && align_zero(axial - self.height) < 0.0
            })
            .collect();

        let v = self.axis().direction().xyz();
        let base = self.axis().origin().xyz();
        for center in [base, base.add(v.scale(self.height))] {
            if let Some(t) = self.cap_param(ray, center) {
                hits.push(t);
            }
        }

        hits.sort_by(f64::total_cmp);
        hits
    }

    fn cap_param(&self, ray: &Ray, center: Double3) -> Option<f64> {
        let v = self.axis().direction().xyz();
        let d = ray.direction().xyz();
        let denom = align_zero(v.dot(d));
        if denom == 0.0 {
            return None;
        }

        let t = align_zero(v.dot(center.sub(ray.origin().xyz())) / denom);
        if t <= 0.0 {
            return None;
        }

        let offset = ray.point_at(t).xyz().sub(center);
        let r = self.radius();
        (align_zero(offset.dot(offset) - r * r) < 0.0).then_some(t)
    }

    /// Box around the two cap disks.
    pub fn bounding_box(&self) -> Aabb {
        let v = self.axis().direction().xyz();
        let r = self.radius();
        // Half-extent of a disk with normal v along each world axis.
        let e = Double3(
            r * (1.0 - v.0 * v.0).max(0.0).sqrt(),
            r * (1.0 - v.1 * v.1).max(0.0).sqrt(),
            r * (1.0 - v.2 * v.2).max(0.0).sqrt(),
        );
        let bottom = self.axis().origin().xyz();
        let top = bottom.add(v.scale(self.height));
        Aabb::new(Point(bottom.sub(e)), Point(bottom.add(e)))
            .union(&Aabb::new(Point(top.sub(e)), Point(top.add(e))))
    }
}
