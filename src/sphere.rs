//! Sphere with constant radius.

use crate::aabb::Aabb;
use crate::algebra::{align_zero, Double3, Point, Vector};
use crate::error::{Error, Result};
use crate::ray::Ray;

#[derive(Clone, Copy, Debug)]
pub struct Sphere {
    center: Point,
    radius: f64,
}

impl Sphere {
    /// Fails unless `radius` is positive and finite.
    pub fn new(center: Point, radius: f64) -> Result<Self> {
        if !(radius.is_finite() && align_zero(radius) > 0.0) {
            return Err(Error::construction(format!("sphere: radius must be positive, got {radius}")));
        }
        Ok(Self { center, radius })
    }

    pub fn center(&self) -> &Point { &self.center }

    pub fn radius(&self) -> f64 { self.radius }

    /// Outward unit normal. Fails at the center.
    pub fn normal(&self, p: &Point) -> Result<Vector> {
        p.subtract(&self.center)?.normalize()
    }

    /// Positive ray parameters where the ray crosses the sphere, sorted.
    ///
    /// A tangent ray is a miss. A ray starting inside yields one hit.
    pub fn intersect(&self, ray: &Ray) -> Vec<f64> {
        let d = ray.direction().xyz();
        let u = self.center.xyz().sub(ray.origin().xyz());

        // Projection of the center on the ray, and squared distance of the
        // center from the ray line.
        let tm = align_zero(d.dot(u));
        let dist2 = align_zero(u.dot(u) - tm * tm);
        let th2 = align_zero(self.radius * self.radius - dist2);
        if th2 <= 0.0 {
            return Vec::new();
        }

        let th = th2.sqrt();
        [tm - th, tm + th]
            .into_iter()
            .map(align_zero)
            .filter(|t| *t > 0.0)
            .collect()
    }

    pub fn bounding_box(&self) -> Aabb {
        let r = Double3::splat(self.radius);
        Aabb::new(Point(self.center.xyz().sub(r)), Point(self.center.xyz().add(r)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::is_zero;
    use approx::assert_abs_diff_eq;

    fn ray(o: [f64; 3], d: [f64; 3]) -> Ray {
        Ray::new(o.into(), Vector::try_from(d).unwrap()).unwrap()
    }

    fn unit_sphere() -> Sphere {
        Sphere::new(Point::new(1.0, 0.0, 0.0), 1.0).unwrap()
    }

    #[test]
    fn test_invalid_radius() {
        assert!(Sphere::new(Point::ORIGIN, 0.0).is_err());
        assert!(Sphere::new(Point::ORIGIN, -2.0).is_err());
        assert!(Sphere::new(Point::ORIGIN, f64::NAN).is_err());
    }

    #[test]
    fn test_normal_is_unit_and_radial() {
        let s = Sphere::new(Point::new(1.0, 2.0, 3.0), 2.0).unwrap();
        let p = Point::new(1.0, 2.0 + 2f64.sqrt(), 3.0 + 2f64.sqrt());
        let n = s.normal(&p).unwrap();
        assert_abs_diff_eq!(n.length(), 1.0, epsilon = 1e-12);
        let radial = p.subtract(s.center()).unwrap();
        assert!(n.cross(&radial).is_err(), "normal must be parallel to p - c");
        assert!(n.dot(&radial) > 0.0);

        assert!(s.normal(s.center()).is_err());
    }

    #[test]
    fn test_ray_through_center() {
        let s = unit_sphere();
        let hits = s.intersect(&ray([-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]));
        assert_eq!(hits.len(), 2);
        assert_abs_diff_eq!(hits[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(hits[1], 3.0, epsilon = 1e-12);

        // symmetric about the center
        let r = ray([-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let mid = Point(r.point_at(hits[0]).xyz().add(r.point_at(hits[1]).xyz()).scale(0.5));
        assert!(mid.approx_eq(s.center()));
    }

    #[test]
    fn test_ray_misses() {
        let s = unit_sphere();
        assert!(s.intersect(&ray([-1.0, 0.0, 0.0], [1.0, 1.0, 0.0])).is_empty());
        // pointing away
        assert!(s.intersect(&ray([-1.0, 0.0, 0.0], [-1.0, 0.0, 0.0])).is_empty());
        // starts after the sphere
        assert!(s.intersect(&ray([3.0, 0.0, 0.0], [1.0, 0.0, 0.0])).is_empty());
    }

    #[test]
    fn test_tangent_is_a_miss() {
        let s = unit_sphere();
        assert!(s.intersect(&ray([1.0, 1.0, -2.0], [0.0, 0.0, 1.0])).is_empty());
    }

    #[test]
    fn test_ray_from_inside() {
        let s = unit_sphere();
        let hits = s.intersect(&ray([1.5, 0.0, 0.0], [1.0, 0.0, 0.0]));
        assert_eq!(hits.len(), 1);
        assert_abs_diff_eq!(hits[0], 0.5, epsilon = 1e-12);

        // from the center
        let hits = s.intersect(&ray([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]));
        assert_eq!(hits.len(), 1);
        assert_abs_diff_eq!(hits[0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ray_from_surface() {
        let s = unit_sphere();
        // leaving outward
        assert!(s.intersect(&ray([2.0, 0.0, 0.0], [1.0, 0.0, 0.0])).is_empty());
        // going inward
        let hits = s.intersect(&ray([2.0, 0.0, 0.0], [-1.0, 0.0, 0.0]));
        assert_eq!(hits.len(), 1);
        assert!(is_zero(hits[0] - 2.0));
    }

    #[test]
    fn test_bounding_box() {
        let b = unit_sphere().bounding_box();
        assert_eq!(b.min, Point::new(0.0, -1.0, -1.0));
        assert_eq!(b.max, Point::new(2.0, 1.0, 1.0));
    }
}
