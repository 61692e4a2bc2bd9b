use crate::{
    algebra::Color,
    geometries::{Geometries, Node},
    light::{AmbientLight, LightSource},
};

/// Everything the tracer needs to shade a ray.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub name: String,
    pub background: Color,
    pub ambient: AmbientLight,
    pub lights: Vec<LightSource>,
    pub geometries: Geometries,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_ambient(mut self, ambient: AmbientLight) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn with_light(mut self, light: impl Into<LightSource>) -> Self {
        self.lights.push(light.into());
        self
    }

    pub fn with_geometry(mut self, node: impl Into<Node>) -> Self {
        self.geometries.add(node);
        self
    }

    pub fn with_geometries(mut self, geometries: Geometries) -> Self {
        self.geometries = geometries;
        self
    }

    /// Regroup the top-level geometries into a bounding-volume tree.
    pub fn build_hierarchy(mut self, leaf_size: usize) -> Self {
        self.geometries = std::mem::take(&mut self.geometries).into_hierarchy(leaf_size);
        self
    }

    /// Fill every bounding-box cache. Call once before rendering.
    pub fn finalize(self) -> Self {
        self.geometries.prepare();
        log::debug!(
            "scene '{}' ready: {} top-level geometries, {} lights",
            self.name,
            self.geometries.len(),
            self.lights.len()
        );
        self
    }
}
