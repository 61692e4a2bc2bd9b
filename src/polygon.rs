//! Convex planar polygons and triangles.
//!
//! Hits exactly on an edge or a vertex are misses, so two primitives sharing
//! a boundary never both report the same point.

use crate::aabb::Aabb;
use crate::algebra::{align_zero, same_sign, Point, Vector};
use crate::error::{Error, Result};
use crate::plane::Plane;
use crate::ray::Ray;

/// Convex polygon with at least three coplanar vertices, in boundary order.
#[derive(Clone, Debug)]
pub struct Polygon {
    vertices: Vec<Point>,
    plane: Plane,
    bbox: Aabb,
}

impl Polygon {
    /// Validate and build a polygon.
    ///
    /// Rejects fewer than three vertices, repeated or collinear consecutive
    /// vertices, vertices off the plane of the first three, and vertex orders
    /// that are not convex or that wind around more than once.
    pub fn new(vertices: Vec<Point>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(Error::construction("polygon: at least three vertices are required"));
        }

        let plane = Plane::from_points(vertices[0], vertices[1], vertices[2])
            .map_err(|e| Error::construction(format!("polygon: {e}")))?;
        let normal = *plane.normal();
        let len = vertices.len();

        if let Some(p) = vertices[3..].iter().find(|p| !plane.contains(p)) {
            return Err(Error::construction(format!("polygon: vertex {p:?} is not coplanar")));
        }

        // Every turn along the boundary must bend the same way.
        let mut orientation = None;
        for i in 0..len {
            let a = vertices[i];
            let b = vertices[(i + 1) % len];
            let c = vertices[(i + 2) % len];
            let e1 = b.subtract(&a).map_err(|_| Error::construction("polygon: repeated vertex"))?;
            let e2 = c.subtract(&b).map_err(|_| Error::construction("polygon: repeated vertex"))?;
            let turn = e1
                .cross(&e2)
                .map_err(|_| Error::construction("polygon: collinear consecutive edges"))?
                .dot(&normal);
            let positive = turn > 0.0;
            match orientation {
                None => orientation = Some(positive),
                Some(o) if o != positive => {
                    return Err(Error::construction("polygon: vertices are not convex"));
                }
                _ => {}
            }
        }

        // A consistently turning boundary can still wind twice (a pentagram);
        // a simple convex polygon keeps every vertex strictly inside each edge.
        let inward = if orientation == Some(true) { 1.0 } else { -1.0 };
        for i in 0..len {
            let a = vertices[i].xyz();
            let edge = vertices[(i + 1) % len].xyz().sub(a);
            for (k, p) in vertices.iter().enumerate() {
                if k == i || k == (i + 1) % len {
                    continue;
                }
                let side = align_zero(edge.cross(p.xyz().sub(a)).dot(normal.xyz()) * inward);
                if side <= 0.0 {
                    return Err(Error::construction("polygon: boundary touches or crosses itself"));
                }
            }
        }

        let bbox = Aabb::from_points(&vertices)
            .ok_or_else(|| Error::construction("polygon: no vertices"))?;

        Ok(Self { vertices, plane, bbox })
    }

    pub fn vertices(&self) -> &[Point] { &self.vertices }

    pub fn normal(&self) -> &Vector { self.plane.normal() }

    fn hit_param(&self, ray: &Ray) -> Option<f64> {
        let t = self.plane.hit_param(ray)?;

        // Each edge together with the ray origin spans a side plane; the ray
        // is inside when it sits strictly on the same side of all of them.
        let origin = ray.origin().xyz();
        let d = ray.direction().xyz();
        let len = self.vertices.len();
        let mut sign = 0.0;
        for i in 0..len {
            let v1 = self.vertices[i].xyz().sub(origin);
            let v2 = self.vertices[(i + 1) % len].xyz().sub(origin);
            let n = Vector::from_xyz(v1.cross(v2)).and_then(|n| n.normalize()).ok()?;
            let s = align_zero(d.dot(n.xyz()));
            if s == 0.0 || (sign != 0.0 && !same_sign(s, sign)) {
                return None;
            }
            sign = s;
        }

        Some(t)
    }

    pub fn intersect(&self, ray: &Ray) -> Vec<f64> {
        self.hit_param(ray).into_iter().collect()
    }

    pub fn bounding_box(&self) -> Aabb { self.bbox }
}

/// Three-vertex polygon.
#[derive(Clone, Debug)]
pub struct Triangle(Polygon);

impl Triangle {
    pub fn new(a: Point, b: Point, c: Point) -> Result<Self> {
        Polygon::new(vec![a, b, c]).map(Triangle)
    }

    pub fn vertices(&self) -> &[Point] { self.0.vertices() }

    pub fn normal(&self) -> &Vector { self.0.normal() }

    pub fn intersect(&self, ray: &Ray) -> Vec<f64> { self.0.intersect(ray) }

    pub fn bounding_box(&self) -> Aabb { self.0.bounding_box() }
}
