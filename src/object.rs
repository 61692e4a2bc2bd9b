use crate::{
    aabb::Aabb,
    algebra::{align_zero, Color, Point, Vector},
    cylinder::Cylinder,
    error::Result,
    intersection::Hit,
    material::Material,
    plane::Plane,
    polygon::{Polygon, Triangle},
    ray::Ray,
    sphere::Sphere,
    tube::Tube,
};

/// Every primitive the tracer can intersect.
#[derive(Clone, Debug)]
pub enum Shape {
    Plane(Plane),
    Sphere(Sphere),
    Triangle(Triangle),
    Polygon(Polygon),
    Tube(Tube),
    Cylinder(Cylinder),
}

impl Shape {
    pub fn normal(&self, p: &Point) -> Result<Vector> {
        match self {
            Self::Plane(s) => Ok(*s.normal()),
            Self::Sphere(s) => s.normal(p),
            Self::Triangle(s) => Ok(*s.normal()),
            Self::Polygon(s) => Ok(*s.normal()),
            Self::Tube(s) => s.normal(p),
            Self::Cylinder(s) => s.normal(p),
        }
    }

    /// Sorted positive ray parameters of every crossing.
    pub fn intersect(&self, ray: &Ray) -> Vec<f64> {
        match self {
            Self::Plane(s) => s.intersect(ray),
            Self::Sphere(s) => s.intersect(ray),
            Self::Triangle(s) => s.intersect(ray),
            Self::Polygon(s) => s.intersect(ray),
            Self::Tube(s) => s.intersect(ray),
            Self::Cylinder(s) => s.intersect(ray),
        }
    }

    /// `None` for shapes without finite extent.
    pub fn bounding_box(&self) -> Option<Aabb> {
        match self {
            Self::Plane(_) | Self::Tube(_) => None,
            Self::Sphere(s) => Some(s.bounding_box()),
            Self::Triangle(s) => Some(s.bounding_box()),
            Self::Polygon(s) => Some(s.bounding_box()),
            Self::Cylinder(s) => Some(s.bounding_box()),
        }
    }
}

macro_rules! shape_from {
    ($($ty:ident),*) => {
        $(impl From<$ty> for Shape {
            fn from(s: $ty) -> Self { Self::$ty(s) }
        })*
    };
}

shape_from!(Plane, Sphere, Triangle, Polygon, Tube, Cylinder);

/// A shape placed in a scene, with its surface properties.
#[derive(Clone, Debug)]
pub struct Geometry {
    shape: Shape,
    emission: Color,
    material: Material,
}

impl Geometry {
    pub fn new(shape: impl Into<Shape>) -> Self {
        Self {
            shape: shape.into(),
            emission: Color::BLACK,
            material: Material::default(),
        }
    }

    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = emission;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn shape(&self) -> &Shape { &self.shape }

    pub fn emission(&self) -> Color { self.emission }

    pub fn material(&self) -> &Material { &self.material }

    pub fn normal(&self, p: &Point) -> Result<Vector> { self.shape.normal(p) }

    pub fn bounding_box(&self) -> Option<Aabb> { self.shape.bounding_box() }

    /// Intersection points, `None` when the ray misses.
    pub fn find_intersections(&self, ray: &Ray) -> Option<Vec<Point>> {
        let ts = self.shape.intersect(ray);
        (!ts.is_empty()).then(|| ts.into_iter().map(|t| ray.point_at(t)).collect())
    }

    /// True when some hit lies strictly closer than `max_distance`.
    pub fn any_hit(&self, ray: &Ray, max_distance: f64) -> bool {
        self.shape
            .intersect(ray)
            .into_iter()
            .any(|t| align_zero(t - max_distance) < 0.0)
    }

    /// Hits strictly closer than `max_distance`, `None` when there are none.
    pub fn calculate_intersections(&self, ray: &Ray, max_distance: f64) -> Option<Vec<Hit<'_>>> {
        let hits: Vec<Hit<'_>> = self
            .shape
            .intersect(ray)
            .into_iter()
            .filter(|&t| align_zero(t - max_distance) < 0.0)
            .map(|t| Hit::new(self, ray.point_at(t), t))
            .collect();
        (!hits.is_empty()).then_some(hits)
    }
}
