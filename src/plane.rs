use crate::algebra::{align_zero, is_zero, Point, Vector};
use crate::error::{Error, Result};
use crate::ray::Ray;

/// Infinite plane through `point` with unit `normal`.
#[derive(Clone, Debug)]
pub struct Plane {
    point: Point,
    normal: Vector,
}

impl Plane {
    pub fn new(point: Point, normal: Vector) -> Result<Self> {
        Ok(Self { point, normal: normal.normalize()? })
    }

    /// Plane through three points. Fails when two points coincide or all
    /// three lie on one line.
    pub fn from_points(p1: Point, p2: Point, p3: Point) -> Result<Self> {
        let v1 = p2.subtract(&p1).map_err(|_| Error::construction("plane: duplicate points"))?;
        let v2 = p3.subtract(&p1).map_err(|_| Error::construction("plane: duplicate points"))?;
        let normal = v1
            .cross(&v2)
            .and_then(|n| n.normalize())
            .map_err(|_| Error::construction("plane: collinear points"))?;
        Ok(Self { point: p1, normal })
    }

    pub fn point(&self) -> &Point { &self.point }

    pub fn normal(&self) -> &Vector { &self.normal }

    /// Ray parameter of the crossing point, if any.
    ///
    /// Parallel rays and rays starting on the plane or moving away from it
    /// miss.
    pub(crate) fn hit_param(&self, ray: &Ray) -> Option<f64> {
        let n = self.normal.xyz();
        let denom = align_zero(n.dot(ray.direction().xyz()));
        if denom == 0.0 {
            return None;
        }

        let to_plane = self.point.xyz().sub(ray.origin().xyz());
        let t = align_zero(n.dot(to_plane) / denom);
        (t > 0.0).then_some(t)
    }

    pub fn intersect(&self, ray: &Ray) -> Vec<f64> {
        self.hit_param(ray).into_iter().collect()
    }

    /// Signed distance of `p` from the plane.
    pub(crate) fn offset_of(&self, p: &Point) -> f64 {
        self.normal.xyz().dot(p.xyz().sub(self.point.xyz()))
    }

    pub(crate) fn contains(&self, p: &Point) -> bool {
        is_zero(self.offset_of(p))
    }
}
