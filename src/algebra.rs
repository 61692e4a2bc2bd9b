//! Point, vector, color and coefficient-triple math.
//!
//! Comparisons go through [`is_zero`] / [`align_zero`] rather than `== 0.0`
//! so that rounding noise never decides whether a ray hits.

use std::ops::Neg;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Values with magnitude below this are treated as zero.
pub const EPSILON: f64 = 1e-10;

#[inline]
pub fn is_zero(x: f64) -> bool { x.abs() < EPSILON }

/// Snap `x` to exactly `0.0` when it is within [`EPSILON`] of zero.
#[inline]
pub fn align_zero(x: f64) -> f64 { if is_zero(x) { 0.0 } else { x } }

/// True when both values are strictly on the same side of zero.
#[inline]
pub fn same_sign(a: f64, b: f64) -> bool { a * b > 0.0 }

/// `base^exp` for the unsigned exponents of materials and spot lights.
/// Exponents past `i32::MAX` saturate instead of wrapping negative.
#[inline]
pub fn powi_sat(base: f64, exp: u32) -> f64 { base.powi(i32::try_from(exp).unwrap_or(i32::MAX)) }

/// Plain triple of reals used for coefficients (`kD`, `kS`, ...) and as the
/// storage of [`Point`], [`Vector`] and [`Color`].
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(from = "[f64; 3]")]
pub struct Double3(pub f64, pub f64, pub f64);

impl Double3 {
    pub const ZERO: Double3 = Double3(0.0, 0.0, 0.0);
    pub const ONE: Double3 = Double3(1.0, 1.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self { Self(x, y, z) }
    pub const fn splat(v: f64) -> Self { Self(v, v, v) }

    pub fn add(self, v: Self) -> Self { Self(self.0+v.0, self.1+v.1, self.2+v.2) }
    pub fn sub(self, v: Self) -> Self { Self(self.0-v.0, self.1-v.1, self.2-v.2) }
    pub fn scale(self, f: f64) -> Self { Self(self.0*f, self.1*f, self.2*f) }
    /// Componentwise product.
    pub fn product(self, v: Self) -> Self { Self(self.0*v.0, self.1*v.1, self.2*v.2) }
    pub fn dot(self, v: Self) -> f64 { self.0*v.0 + self.1*v.1 + self.2*v.2 }
    pub fn cross(self, v: Self) -> Self {
        Self(self.1*v.2-self.2*v.1, self.2*v.0-self.0*v.2, self.0*v.1-self.1*v.0)
    }
    pub fn is_zero(self) -> bool { is_zero(self.0) && is_zero(self.1) && is_zero(self.2) }

    /// Approximate equality under [`EPSILON`].
    pub fn approx_eq(self, v: Self) -> bool { self.sub(v).is_zero() }

    pub fn min(self, v: Self) -> Self { Self(self.0.min(v.0), self.1.min(v.1), self.2.min(v.2)) }
    pub fn max(self, v: Self) -> Self { Self(self.0.max(v.0), self.1.max(v.1), self.2.max(v.2)) }

    pub fn get(self, axis: usize) -> f64 {
        match axis {
            0 => self.0,
            1 => self.1,
            _ => self.2,
        }
    }
}

impl From<[f64; 3]> for Double3 {
    fn from(a: [f64; 3]) -> Self { Double3(a[0], a[1], a[2]) }
}

impl From<f64> for Double3 {
    fn from(v: f64) -> Self { Double3::splat(v) }
}

/// A location in space.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(from = "[f64; 3]")]
pub struct Point(pub(crate) Double3);

impl Point {
    pub const ORIGIN: Point = Point(Double3::ZERO);

    pub const fn new(x: f64, y: f64, z: f64) -> Self { Self(Double3(x, y, z)) }

    pub fn x(&self) -> f64 { self.0.0 }
    pub fn y(&self) -> f64 { self.0.1 }
    pub fn z(&self) -> f64 { self.0.2 }
    pub fn xyz(&self) -> Double3 { self.0 }

    pub fn add(&self, v: &Vector) -> Point { Point(self.0.add(v.0)) }

    /// Vector from `other` to `self`.
    ///
    /// Fails when the points coincide, since the result would be the zero vector.
    pub fn subtract(&self, other: &Point) -> Result<Vector> {
        Vector::from_xyz(self.0.sub(other.0))
            .map_err(|_| Error::DegenerateComputation("subtracting a point from itself"))
    }

    pub fn distance_squared(&self, other: &Point) -> f64 {
        let d = self.0.sub(other.0);
        d.dot(d)
    }

    pub fn distance(&self, other: &Point) -> f64 { self.distance_squared(other).sqrt() }

    pub fn approx_eq(&self, other: &Point) -> bool { self.0.approx_eq(other.0) }
}

impl From<[f64; 3]> for Point {
    fn from(a: [f64; 3]) -> Self { Point(a.into()) }
}

/// A direction with magnitude. Never the zero vector.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "[f64; 3]")]
pub struct Vector(Double3);

impl Vector {
    pub const X: Vector = Vector(Double3(1.0, 0.0, 0.0));
    pub const Y: Vector = Vector(Double3(0.0, 1.0, 0.0));
    pub const Z: Vector = Vector(Double3(0.0, 0.0, 1.0));

    pub fn new(x: f64, y: f64, z: f64) -> Result<Self> { Self::from_xyz(Double3(x, y, z)) }

    pub fn from_xyz(xyz: Double3) -> Result<Self> {
        if xyz.is_zero() {
            return Err(Error::DegenerateComputation("zero vector"));
        }
        Ok(Self(xyz))
    }

    pub fn x(&self) -> f64 { self.0.0 }
    pub fn y(&self) -> f64 { self.0.1 }
    pub fn z(&self) -> f64 { self.0.2 }
    pub fn xyz(&self) -> Double3 { self.0 }

    pub fn add(&self, v: &Vector) -> Result<Vector> { Self::from_xyz(self.0.add(v.0)) }
    pub fn subtract(&self, v: &Vector) -> Result<Vector> { Self::from_xyz(self.0.sub(v.0)) }
    pub fn scale(&self, f: f64) -> Result<Vector> { Self::from_xyz(self.0.scale(f)) }
    pub fn dot(&self, v: &Vector) -> f64 { self.0.dot(v.0) }

    /// Fails for parallel vectors.
    pub fn cross(&self, v: &Vector) -> Result<Vector> { Self::from_xyz(self.0.cross(v.0)) }

    pub fn length_squared(&self) -> f64 { self.0.dot(self.0) }
    pub fn length(&self) -> f64 { self.length_squared().sqrt() }

    pub fn normalize(&self) -> Result<Vector> {
        let len = self.length();
        if !len.is_finite() || is_zero(len) {
            return Err(Error::DegenerateComputation("normalizing a zero-length vector"));
        }
        Ok(Vector(self.0.scale(1.0 / len)))
    }
}

impl Neg for Vector {
    type Output = Vector;
    fn neg(self) -> Vector { Vector(self.0.scale(-1.0)) }
}

impl TryFrom<[f64; 3]> for Vector {
    type Error = Error;
    fn try_from(a: [f64; 3]) -> Result<Self> { Self::from_xyz(a.into()) }
}

/// RGB radiance. Channels are never clamped during shading; the output sink
/// clamps when it quantizes.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(from = "[f64; 3]")]
pub struct Color(Double3);

impl Color {
    pub const BLACK: Color = Color(Double3::ZERO);
    pub const WHITE: Color = Color(Double3(255.0, 255.0, 255.0));

    /// Negative channels are raised to zero.
    pub fn new(r: f64, g: f64, b: f64) -> Self { Self(Double3(r.max(0.0), g.max(0.0), b.max(0.0))) }

    pub fn r(&self) -> f64 { self.0.0 }
    pub fn g(&self) -> f64 { self.0.1 }
    pub fn b(&self) -> f64 { self.0.2 }
    pub fn rgb(&self) -> Double3 { self.0 }

    pub fn add(self, c: Color) -> Color { Color(self.0.add(c.0)) }
    pub fn scale(self, k: f64) -> Color { Color(self.0.scale(k.max(0.0))) }
    pub fn reduce(self, k: f64) -> Color { Color(self.0.scale(1.0 / k)) }

    /// Componentwise attenuation by a coefficient triple.
    pub fn attenuate(self, k: Double3) -> Color { Color(self.0.product(k.max(Double3::ZERO))) }

    pub fn approx_eq(&self, c: &Color) -> bool { self.0.approx_eq(c.0) }

    /// Quantize to 8 bits per channel, clamping at 255.
    pub fn to_rgb8(&self) -> [u8; 3] {
        [
            self.0.0.clamp(0.0, 255.0) as u8,
            self.0.1.clamp(0.0, 255.0) as u8,
            self.0.2.clamp(0.0, 255.0) as u8,
        ]
    }
}

impl From<[f64; 3]> for Color {
    fn from(a: [f64; 3]) -> Self { Color::new(a[0], a[1], a[2]) }
}

impl Default for Color {
    fn default() -> Self { Color::BLACK }
}
