//! A Phong ray tracer.
//!
//! A [`scene::Scene`] holds lights and a tree of geometries; a
//! [`camera::Camera`] shoots one ray per pixel through a
//! [`renderer::RayTracer`] and hands the colors to an [`output::PixelSink`].

pub mod aabb;
pub mod algebra;
pub mod camera;
pub mod cylinder;
pub mod error;
pub mod geometries;
pub mod intersection;
pub mod light;
pub mod loader;
pub mod material;
pub mod mesh;
pub mod object;
pub mod output;
pub mod plane;
pub mod polygon;
pub mod ray;
pub mod renderer;
pub mod scene;
pub mod sphere;
pub mod tonemap;
pub mod tube;

pub use error::{Error, Result};
