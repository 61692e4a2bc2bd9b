//! Light sources.
//!
//! Directions returned here are the direction light travels: from the light
//! toward the lit point.

use crate::algebra::{powi_sat, Color, Double3, Point, Vector};
use crate::error::{Error, Result};

/// Constant ambient term. The default is black, i.e. no ambient light.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AmbientLight {
    intensity: Color,
}

impl AmbientLight {
    /// Ambient light of `color` scaled by `ka`.
    pub fn new(color: Color, ka: impl Into<Double3>) -> Self {
        Self { intensity: color.attenuate(ka.into()) }
    }

    pub fn intensity(&self) -> Color { self.intensity }
}

/// Light from infinitely far away along a fixed direction.
#[derive(Clone, Copy, Debug)]
pub struct DirectionalLight {
    intensity: Color,
    direction: Vector,
}

impl DirectionalLight {
    pub fn new(intensity: Color, direction: Vector) -> Result<Self> {
        Ok(Self { intensity, direction: direction.normalize()? })
    }
}

/// Omnidirectional light attenuated by `1 / (kc + kl·d + kq·d²)`.
#[derive(Clone, Copy, Debug)]
pub struct PointLight {
    intensity: Color,
    position: Point,
    kc: f64,
    kl: f64,
    kq: f64,
}

impl PointLight {
    pub fn new(intensity: Color, position: Point) -> Self {
        Self { intensity, position, kc: 1.0, kl: 0.0, kq: 0.0 }
    }

    pub fn with_kc(mut self, kc: f64) -> Self {
        self.kc = kc;
        self
    }

    pub fn with_kl(mut self, kl: f64) -> Self {
        self.kl = kl;
        self
    }

    pub fn with_kq(mut self, kq: f64) -> Self {
        self.kq = kq;
        self
    }

    pub fn position(&self) -> &Point { &self.position }

    /// Rejects negative coefficients and an attenuation that is zero at
    /// every distance.
    pub fn validate(&self) -> Result<()> {
        let (kc, kl, kq) = (self.kc, self.kl, self.kq);
        if kc < 0.0 || kl < 0.0 || kq < 0.0 || !(kc + kl + kq > 0.0) {
            return Err(Error::construction(format!(
                "attenuation ({kc}, {kl}, {kq}) must be non-negative and not all zero"
            )));
        }
        Ok(())
    }

    fn intensity_at(&self, p: &Point) -> Color {
        let d = self.position.distance(p);
        self.intensity.reduce(self.kc + self.kl * d + self.kq * d * d)
    }

    fn direction_to(&self, p: &Point) -> Option<Vector> {
        p.subtract(&self.position).and_then(|l| l.normalize()).ok()
    }
}

/// Point light focused along `direction`; intensity falls off as
/// `max(0, direction·l)^narrow_beam`.
#[derive(Clone, Copy, Debug)]
pub struct SpotLight {
    point: PointLight,
    direction: Vector,
    narrow_beam: u32,
}

impl SpotLight {
    pub fn new(intensity: Color, position: Point, direction: Vector) -> Result<Self> {
        Ok(Self {
            point: PointLight::new(intensity, position),
            direction: direction.normalize()?,
            narrow_beam: 1,
        })
    }

    pub fn with_kc(mut self, kc: f64) -> Self {
        self.point = self.point.with_kc(kc);
        self
    }

    pub fn with_kl(mut self, kl: f64) -> Self {
        self.point = self.point.with_kl(kl);
        self
    }

    pub fn with_kq(mut self, kq: f64) -> Self {
        self.point = self.point.with_kq(kq);
        self
    }

    pub fn validate(&self) -> Result<()> { self.point.validate() }

    /// Larger values narrow the beam.
    pub fn with_narrow_beam(mut self, narrow_beam: u32) -> Self {
        self.narrow_beam = narrow_beam;
        self
    }

    fn intensity_at(&self, p: &Point) -> Color {
        let Some(l) = self.point.direction_to(p) else {
            return Color::BLACK;
        };
        let focus = self.direction.dot(&l).max(0.0);
        self.point.intensity_at(p).scale(powi_sat(focus, self.narrow_beam))
    }
}

/// A light that can illuminate points in the scene.
#[derive(Clone, Copy, Debug)]
pub enum LightSource {
    Directional(DirectionalLight),
    Point(PointLight),
    Spot(SpotLight),
}

impl LightSource {
    /// Intensity arriving at `p`.
    pub fn intensity_at(&self, p: &Point) -> Color {
        match self {
            Self::Directional(d) => d.intensity,
            Self::Point(l) => l.intensity_at(p),
            Self::Spot(s) => s.intensity_at(p),
        }
    }

    /// Unit direction from the light to `p`; `None` when `p` is the light's
    /// own position.
    pub fn direction_to(&self, p: &Point) -> Option<Vector> {
        match self {
            Self::Directional(d) => Some(d.direction),
            Self::Point(l) => l.direction_to(p),
            Self::Spot(s) => s.point.direction_to(p),
        }
    }

    /// Distance from the light to `p`; infinite for directional lights.
    pub fn distance_to(&self, p: &Point) -> f64 {
        match self {
            Self::Directional(_) => f64::INFINITY,
            Self::Point(l) => l.position.distance(p),
            Self::Spot(s) => s.point.position.distance(p),
        }
    }
}

impl From<DirectionalLight> for LightSource {
    fn from(l: DirectionalLight) -> Self { Self::Directional(l) }
}

impl From<PointLight> for LightSource {
    fn from(l: PointLight) -> Self { Self::Point(l) }
}

impl From<SpotLight> for LightSource {
    fn from(l: SpotLight) -> Self { Self::Spot(l) }
}
