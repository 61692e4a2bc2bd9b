//! Rays and closest-point selection.

use crate::algebra::{is_zero, Double3, Point, Vector};
use crate::error::Result;
use crate::intersection::Hit;

/// Distance a secondary ray's origin is pushed off the surface it leaves.
pub const DELTA: f64 = 1e-4;

/// A half-line `origin + t * direction`, `t > 0`, with unit direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    origin: Point,
    direction: Vector,
    /// Reciprocal direction components for the slab test.
    inv_direction: Double3,
}

impl Ray {
    /// Create a ray; the direction is normalized.
    pub fn new(origin: Point, direction: Vector) -> Result<Self> {
        Ok(Self::from_unit(origin, direction.normalize()?))
    }

    /// Ray leaving a surface point, moved by [`DELTA`] along `normal` toward
    /// the side `direction` points to. `direction` must already be unit length.
    pub fn offset(point: Point, direction: Vector, normal: &Vector) -> Self {
        let n_d = direction.dot(normal);
        let shift = if n_d < 0.0 { -DELTA } else { DELTA };
        let origin = Point(point.xyz().add(normal.xyz().scale(shift)));
        Self::from_unit(origin, direction)
    }

    fn from_unit(origin: Point, direction: Vector) -> Self {
        let d = direction.xyz();
        Self {
            origin,
            direction,
            inv_direction: Double3(1.0 / d.0, 1.0 / d.1, 1.0 / d.2),
        }
    }

    pub fn origin(&self) -> &Point { &self.origin }

    /// Unit direction.
    pub fn direction(&self) -> &Vector { &self.direction }

    pub(crate) fn inv_direction(&self) -> Double3 { self.inv_direction }

    /// Evaluate the ray at parameter `t`.
    #[inline]
    pub fn point_at(&self, t: f64) -> Point {
        if is_zero(t) {
            return self.origin;
        }
        Point(self.origin.xyz().add(self.direction.xyz().scale(t)))
    }

    /// The candidate nearest to the ray origin, `None` for an empty slice.
    pub fn closest_point(&self, points: &[Point]) -> Option<Point> {
        points
            .iter()
            .copied()
            .min_by(|a, b| {
                self.origin
                    .distance_squared(a)
                    .total_cmp(&self.origin.distance_squared(b))
            })
    }

    /// The hit with the smallest ray parameter. Ties keep the first one found.
    pub fn closest_hit<'a>(&self, hits: impl IntoIterator<Item = Hit<'a>>) -> Option<Hit<'a>> {
        hits.into_iter().fold(None, |best: Option<Hit<'a>>, hit| match best {
            Some(b) if b.t <= hit.t => Some(b),
            _ => Some(hit),
        })
    }
}
