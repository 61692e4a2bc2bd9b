//! Infinite cylinder around an axis ray.

use crate::algebra::{align_zero, Double3, Point, Vector};
use crate::error::{Error, Result};
use crate::ray::Ray;

#[derive(Clone, Copy, Debug)]
pub struct Tube {
    axis: Ray,
    radius: f64,
}

impl Tube {
    /// Fails unless `radius` is positive and finite.
    pub fn new(axis: Ray, radius: f64) -> Result<Self> {
        if !(radius.is_finite() && align_zero(radius) > 0.0) {
            return Err(Error::construction(format!("tube: radius must be positive, got {radius}")));
        }
        Ok(Self { axis, radius })
    }

    pub fn axis(&self) -> &Ray { &self.axis }

    pub fn radius(&self) -> f64 { self.radius }

    /// Signed position of `p` along the axis, measured from the axis origin.
    pub(crate) fn axial(&self, p: &Point) -> f64 {
        align_zero(self.axis.direction().xyz().dot(p.xyz().sub(self.axis.origin().xyz())))
    }

    /// Unit vector from the axis to `p`, perpendicular to the axis. Fails for
    /// points on the axis.
    pub fn normal(&self, p: &Point) -> Result<Vector> {
        let foot = self.axis.point_at(self.axial(p));
        p.subtract(&foot)?.normalize()
    }

    /// Positive ray parameters where the ray crosses the lateral surface,
    /// sorted. Rays parallel to the axis and tangent rays miss.
    pub fn intersect(&self, ray: &Ray) -> Vec<f64> {
        let v = self.axis.direction().xyz();
        let d = ray.direction().xyz();
        let dp = ray.origin().xyz().sub(self.axis.origin().xyz());

        // Drop the axial components; what is left is a circle problem in the
        // plane perpendicular to the axis.
        let d_perp = reject(d, v);
        let dp_perp = reject(dp, v);

        let a = align_zero(d_perp.dot(d_perp));
        if a == 0.0 {
            return Vec::new();
        }
        let b = 2.0 * d_perp.dot(dp_perp);
        let c = dp_perp.dot(dp_perp) - self.radius * self.radius;

        let disc = align_zero(b * b - 4.0 * a * c);
        if disc <= 0.0 {
            return Vec::new();
        }

        let sqrt_disc = disc.sqrt();
        [(-b - sqrt_disc) / (2.0 * a), (-b + sqrt_disc) / (2.0 * a)]
            .into_iter()
            .map(align_zero)
            .filter(|t| *t > 0.0)
            .collect()
    }
}

/// Component of `u` perpendicular to unit `v`.
#[inline]
pub(crate) fn reject(u: Double3, v: Double3) -> Double3 {
    u.sub(v.scale(u.dot(v)))
}
