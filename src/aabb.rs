//! Axis-aligned bounding boxes.

use crate::algebra::{Double3, Point};
use crate::ray::Ray;

/// Axis-aligned box, `min <= max` on every axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point,
    pub max: Point,
}

impl Aabb {
    /// Box spanned by two opposite corners given in any order.
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            min: Point(a.xyz().min(b.xyz())),
            max: Point(a.xyz().max(b.xyz())),
        }
    }

    /// Smallest box containing every point; `None` for an empty slice.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        Some(rest.iter().fold(Aabb::new(*first, *first), |b, p| b.include(p)))
    }

    /// Grow the box to include `p`.
    pub fn include(&self, p: &Point) -> Aabb {
        Self {
            min: Point(self.min.xyz().min(p.xyz())),
            max: Point(self.max.xyz().max(p.xyz())),
        }
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Self {
            min: Point(self.min.xyz().min(other.min.xyz())),
            max: Point(self.max.xyz().max(other.max.xyz())),
        }
    }

    pub fn contains(&self, p: &Point) -> bool {
        (0..3).all(|i| self.min.xyz().get(i) <= p.xyz().get(i) && p.xyz().get(i) <= self.max.xyz().get(i))
    }

    pub fn contains_box(&self, other: &Aabb) -> bool {
        self.contains(&other.min) && self.contains(&other.max)
    }

    pub fn centroid(&self) -> Point {
        Point(self.min.xyz().add(self.max.xyz()).scale(0.5))
    }

    pub fn extent(&self) -> Double3 {
        self.max.xyz().sub(self.min.xyz())
    }

    /// Index of the axis with the largest extent.
    pub fn longest_axis(&self) -> usize {
        let e = self.extent();
        if e.0 >= e.1 && e.0 >= e.2 {
            0
        } else if e.1 >= e.2 {
            1
        } else {
            2
        }
    }

    /// Slab test: can the ray segment `(0, max_distance)` touch the box?
    ///
    /// Axis-parallel rays give infinite reciprocals; the `NaN` produced when
    /// the origin lies on a slab plane is dropped by `f64::max`/`f64::min`.
    #[inline]
    pub fn hits(&self, ray: &Ray, max_distance: f64) -> bool {
        let o = ray.origin().xyz();
        let inv = ray.inv_direction();

        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;

        for axis in 0..3 {
            let t1 = (self.min.xyz().get(axis) - o.get(axis)) * inv.get(axis);
            let t2 = (self.max.xyz().get(axis) - o.get(axis)) * inv.get(axis);

            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
        }

        t_max >= t_min && t_max > 0.0 && t_min < max_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::Vector;

    fn unit_box() -> Aabb {
        Aabb::new(Point::new(0.0, 0.0, 0.0), Point::new(1.0, 1.0, 1.0))
    }

    fn ray(o: [f64; 3], d: [f64; 3]) -> Ray {
        Ray::new(o.into(), Vector::try_from(d).unwrap()).unwrap()
    }

    #[test]
    fn test_new_orders_corners() {
        let b = Aabb::new(Point::new(1.0, -1.0, 3.0), Point::new(-1.0, 1.0, 2.0));
        assert_eq!(b.min, Point::new(-1.0, -1.0, 2.0));
        assert_eq!(b.max, Point::new(1.0, 1.0, 3.0));
    }

    #[test]
    fn test_union_contains_both() {
        let a = unit_box();
        let b = Aabb::new(Point::new(-2.0, 0.5, 0.5), Point::new(-1.0, 3.0, 0.7));
        let u = a.union(&b);
        assert!(u.contains_box(&a));
        assert!(u.contains_box(&b));
        assert_eq!(u.min, Point::new(-2.0, 0.0, 0.0));
        assert_eq!(u.max, Point::new(1.0, 3.0, 1.0));
    }

    #[test]
    fn test_from_points() {
        assert!(Aabb::from_points(&[]).is_none());
        let b = Aabb::from_points(&[
            Point::new(0.0, 2.0, 0.0),
            Point::new(1.0, -1.0, 4.0),
            Point::new(-3.0, 0.0, 1.0),
        ])
        .unwrap();
        assert_eq!(b.min, Point::new(-3.0, -1.0, 0.0));
        assert_eq!(b.max, Point::new(1.0, 2.0, 4.0));
        assert_eq!(b.longest_axis(), 0);
    }

    #[test]
    fn test_hits() {
        let b = unit_box();
        assert!(b.hits(&ray([-5.0, 0.5, 0.5], [1.0, 0.0, 0.0]), f64::INFINITY));
        assert!(b.hits(&ray([-1.0, -1.0, -1.0], [1.0, 1.0, 1.0]), f64::INFINITY));
        // origin inside
        assert!(b.hits(&ray([0.5, 0.5, 0.5], [0.0, -1.0, 0.0]), f64::INFINITY));
    }

    #[test]
    fn test_misses() {
        let b = unit_box();
        // x slab entered for s in [5, 6], y slab for s in [10, 15]
        assert!(!b.hits(&ray([-5.0, 3.0, 0.5], [1.0, -0.2, 0.0]), f64::INFINITY));
        assert!(!b.hits(&ray([-5.0, 5.0, 5.0], [1.0, 0.0, 0.0]), f64::INFINITY));
        // pointing away
        assert!(!b.hits(&ray([-5.0, 0.5, 0.5], [-1.0, 0.0, 0.0]), f64::INFINITY));
        // box beyond the distance bound
        assert!(!b.hits(&ray([-5.0, 0.5, 0.5], [1.0, 0.0, 0.0]), 4.0));
    }

    #[test]
    fn test_flat_box() {
        let flat = Aabb::new(Point::new(0.0, 0.0, 0.0), Point::new(2.0, 2.0, 0.0));
        assert!(flat.hits(&ray([1.0, 1.0, 3.0], [0.0, 0.0, -1.0]), f64::INFINITY));
        assert!(!flat.hits(&ray([3.0, 1.0, 3.0], [0.0, 0.0, -1.0]), f64::INFINITY));
    }
}
