//! JSON scene description.
//!
//! ```json
//! {
//!   "name": "demo",
//!   "background": [0, 0, 0],
//!   "ambient": { "color": [255, 255, 255], "ka": 0.1 },
//!   "camera": { "location": [0, 0, 0], "look_at": [0, 0, -5],
//!               "vp_size": [2, 2], "vp_distance": 1, "resolution": [400, 400] },
//!   "materials": { "red": { "kd": [0.6, 0.1, 0.1], "ks": 0.3, "shininess": 40 } },
//!   "objects": [ { "sphere": { "center": [0, 0, -5], "radius": 1, "mat": "red" } } ],
//!   "lights": [ { "point": { "intensity": [500, 500, 500], "position": [2, 2, 0], "kl": 0.05 } } ]
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    algebra::{Color, Double3, Point, Vector},
    camera::{Camera, CameraBuilder},
    cylinder::Cylinder,
    geometries::{Geometries, Node},
    light::{AmbientLight, DirectionalLight, LightSource, PointLight, SpotLight},
    material::Material,
    mesh::{self, MeshTransform},
    object::Geometry,
    plane::Plane,
    polygon::{Polygon, Triangle},
    ray::Ray,
    scene::Scene,
    sphere::Sphere,
    tube::Tube,
};

/// Children per group when a mesh is turned into a bounding-volume tree.
const MESH_LEAF_SIZE: usize = 4;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed scene description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot load mesh {path}: {source}")]
    Obj {
        path: PathBuf,
        source: tobj::LoadError,
    },

    #[error(transparent)]
    Geometry(#[from] crate::error::Error),
}

/// A scalar applies to all three channels.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(untagged)]
enum Coefficient {
    Scalar(f64),
    Triple([f64; 3]),
}

impl Default for Coefficient {
    fn default() -> Self { Coefficient::Scalar(0.0) }
}

impl From<Coefficient> for Double3 {
    fn from(c: Coefficient) -> Self {
        match c {
            Coefficient::Scalar(v) => Double3::splat(v),
            Coefficient::Triple(t) => t.into(),
        }
    }
}

fn one() -> f64 { 1.0 }

fn one_coefficient() -> Coefficient { Coefficient::Scalar(1.0) }

fn default_beam() -> u32 { 1 }

#[derive(Deserialize)]
struct MaterialJson {
    #[serde(default = "one_coefficient")]
    ka: Coefficient,
    #[serde(default)]
    kd: Coefficient,
    #[serde(default)]
    ks: Coefficient,
    #[serde(default)]
    kt: Coefficient,
    #[serde(default)]
    kr: Coefficient,
    #[serde(default)]
    shininess: u32,
}

impl From<MaterialJson> for Material {
    fn from(m: MaterialJson) -> Self {
        Material::default()
            .with_ka(m.ka)
            .with_kd(m.kd)
            .with_ks(m.ks)
            .with_kt(m.kt)
            .with_kr(m.kr)
            .with_shininess(m.shininess)
    }
}

/// Fields every object accepts.
#[derive(Deserialize, Default)]
struct SurfaceDesc {
    #[serde(default)]
    mat: Option<String>,
    #[serde(default)]
    emission: Color,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ObjectJson {
    Sphere { sphere: SphereDesc },
    Plane { plane: PlaneDesc },
    Triangle { triangle: TriangleDesc },
    Polygon { polygon: PolygonDesc },
    Tube { tube: TubeDesc },
    Cylinder { cylinder: CylinderDesc },
    Mesh { mesh: MeshDesc },
}

#[derive(Deserialize)]
struct SphereDesc {
    center: Point,
    radius: f64,
    #[serde(flatten)]
    surface: SurfaceDesc,
}

#[derive(Deserialize)]
struct PlaneDesc {
    point: Point,
    normal: Vector,
    #[serde(flatten)]
    surface: SurfaceDesc,
}

#[derive(Deserialize)]
struct TriangleDesc {
    vertices: [Point; 3],
    #[serde(flatten)]
    surface: SurfaceDesc,
}

#[derive(Deserialize)]
struct PolygonDesc {
    vertices: Vec<Point>,
    #[serde(flatten)]
    surface: SurfaceDesc,
}

#[derive(Deserialize)]
struct TubeDesc {
    origin: Point,
    direction: Vector,
    radius: f64,
    #[serde(flatten)]
    surface: SurfaceDesc,
}

#[derive(Deserialize)]
struct CylinderDesc {
    origin: Point,
    direction: Vector,
    radius: f64,
    height: f64,
    #[serde(flatten)]
    surface: SurfaceDesc,
}

#[derive(Deserialize)]
struct MeshDesc {
    #[serde(alias = "obj")]
    file: PathBuf,
    #[serde(default)]
    center: Option<Point>,
    #[serde(default = "one", alias = "radius")]
    scale: f64,
    #[serde(flatten)]
    surface: SurfaceDesc,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LightJson {
    Directional { directional: DirectionalDesc },
    Point { point: PointDesc },
    Spot { spot: SpotDesc },
}

#[derive(Deserialize)]
struct DirectionalDesc {
    intensity: Color,
    direction: Vector,
}

#[derive(Deserialize)]
struct PointDesc {
    intensity: Color,
    position: Point,
    #[serde(default = "one")]
    kc: f64,
    #[serde(default)]
    kl: f64,
    #[serde(default)]
    kq: f64,
}

#[derive(Deserialize)]
struct SpotDesc {
    intensity: Color,
    position: Point,
    direction: Vector,
    #[serde(default = "one")]
    kc: f64,
    #[serde(default)]
    kl: f64,
    #[serde(default)]
    kq: f64,
    #[serde(default = "default_beam")]
    narrow_beam: u32,
}

#[derive(Deserialize)]
struct AmbientJson {
    color: Color,
    #[serde(default = "one_coefficient")]
    ka: Coefficient,
}

/// Either `look_at` or both `to` and `up` orient the camera.
#[derive(Deserialize)]
struct CameraJson {
    location: Point,
    #[serde(default)]
    look_at: Option<Point>,
    #[serde(default)]
    to: Option<Vector>,
    #[serde(default)]
    up: Option<Vector>,
    vp_size: [f64; 2],
    vp_distance: f64,
    resolution: [u32; 2],
}

impl CameraJson {
    fn into_builder(self) -> CameraBuilder {
        let builder = Camera::builder()
            .location(self.location)
            .vp_size(self.vp_size[0], self.vp_size[1])
            .vp_distance(self.vp_distance)
            .resolution(self.resolution[0], self.resolution[1]);
        match (self.look_at, self.to, self.up) {
            (Some(target), _, _) => builder.look_at(target),
            (None, Some(to), Some(up)) => builder.direction(to, up),
            // left unset; build() reports it
            _ => builder,
        }
    }
}

#[derive(Deserialize)]
struct SceneFile {
    #[serde(default)]
    name: String,
    #[serde(default)]
    background: Color,
    #[serde(default)]
    ambient: Option<AmbientJson>,
    camera: CameraJson,
    #[serde(default)]
    materials: HashMap<String, MaterialJson>,
    #[serde(default)]
    objects: Vec<ObjectJson>,
    #[serde(default)]
    lights: Vec<LightJson>,
    /// Group top-level objects into a bounding-volume tree with this many
    /// children per leaf group.
    #[serde(default)]
    bvh_leaf_size: Option<usize>,
}

/// A parsed scene plus the camera settings it asked for.
///
/// The camera is returned unbuilt so the caller can still switch threading
/// and progress reporting.
pub struct LoadedScene {
    pub scene: Scene,
    pub camera: CameraBuilder,
}

/// Read a scene file. Mesh paths are resolved against the file's directory.
pub fn load(path: &Path) -> Result<LoadedScene, SceneError> {
    let data = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let mut loaded = parse(&data, base)?;
    if loaded.scene.name.is_empty() {
        if let Some(stem) = path.file_stem() {
            loaded.scene.name = stem.to_string_lossy().into_owned();
        }
    }
    Ok(loaded)
}

/// Build a scene from JSON text; relative mesh paths start at `base`.
pub fn parse(json: &str, base: &Path) -> Result<LoadedScene, SceneError> {
    let file: SceneFile = serde_json::from_str(json)?;

    let materials: HashMap<String, Material> = file
        .materials
        .into_iter()
        .map(|(name, m)| (name, m.into()))
        .collect();

    let mut geometries = Geometries::new();
    for object in file.objects {
        geometries.add(build_object(object, &materials, base)?);
    }
    if let Some(leaf_size) = file.bvh_leaf_size {
        geometries = geometries.into_hierarchy(leaf_size);
    }

    let mut scene = Scene::new(file.name)
        .with_background(file.background)
        .with_geometries(geometries);
    if let Some(ambient) = file.ambient {
        scene = scene.with_ambient(AmbientLight::new(ambient.color, ambient.ka));
    }
    for light in file.lights {
        scene = scene.with_light(build_light(light)?);
    }

    log::info!(
        "loaded scene '{}': {} objects, {} lights",
        scene.name,
        scene.geometries.len(),
        scene.lights.len()
    );
    Ok(LoadedScene { scene, camera: file.camera.into_builder() })
}

fn surface(geometry: Geometry, surface: SurfaceDesc, materials: &HashMap<String, Material>) -> Geometry {
    geometry
        .with_material(material(surface.mat.as_deref(), materials))
        .with_emission(surface.emission)
}

fn material(name: Option<&str>, materials: &HashMap<String, Material>) -> Material {
    let Some(name) = name else {
        return Material::default();
    };
    match materials.get(name) {
        Some(m) => *m,
        None => {
            log::warn!("unknown material '{name}', using the default");
            Material::default()
        }
    }
}

fn build_object(
    object: ObjectJson,
    materials: &HashMap<String, Material>,
    base: &Path,
) -> Result<Node, SceneError> {
    let node = match object {
        ObjectJson::Sphere { sphere } => {
            let shape = Sphere::new(sphere.center, sphere.radius)?;
            surface(Geometry::new(shape), sphere.surface, materials).into()
        }
        ObjectJson::Plane { plane } => {
            let shape = Plane::new(plane.point, plane.normal)?;
            surface(Geometry::new(shape), plane.surface, materials).into()
        }
        ObjectJson::Triangle { triangle } => {
            let [a, b, c] = triangle.vertices;
            surface(Geometry::new(Triangle::new(a, b, c)?), triangle.surface, materials).into()
        }
        ObjectJson::Polygon { polygon } => {
            let shape = Polygon::new(polygon.vertices)?;
            surface(Geometry::new(shape), polygon.surface, materials).into()
        }
        ObjectJson::Tube { tube } => {
            let shape = Tube::new(Ray::new(tube.origin, tube.direction)?, tube.radius)?;
            surface(Geometry::new(shape), tube.surface, materials).into()
        }
        ObjectJson::Cylinder { cylinder } => {
            let axis = Ray::new(cylinder.origin, cylinder.direction)?;
            let shape = Cylinder::new(axis, cylinder.radius, cylinder.height)?;
            surface(Geometry::new(shape), cylinder.surface, materials).into()
        }
        ObjectJson::Mesh { mesh } => {
            let path = base.join(&mesh.file);
            let transform = MeshTransform {
                scale: mesh.scale,
                offset: mesh.center.map_or(Double3::ZERO, |c| c.xyz()),
            };
            let triangles = mesh::load_obj(&path, transform)
                .map_err(|source| SceneError::Obj { path: path.clone(), source })?;
            log::debug!("{}: {} triangles", path.display(), triangles.len());

            let mat = material(mesh.surface.mat.as_deref(), materials);
            let group: Geometries = triangles
                .into_iter()
                .map(|t| Geometry::new(t).with_material(mat).with_emission(mesh.surface.emission))
                .collect();
            group.into_hierarchy(MESH_LEAF_SIZE).into()
        }
    };
    Ok(node)
}

fn build_light(light: LightJson) -> Result<LightSource, SceneError> {
    let light = match light {
        LightJson::Directional { directional } => {
            DirectionalLight::new(directional.intensity, directional.direction)?.into()
        }
        LightJson::Point { point } => {
            let light = PointLight::new(point.intensity, point.position)
                .with_kc(point.kc)
                .with_kl(point.kl)
                .with_kq(point.kq);
            light.validate()?;
            light.into()
        }
        LightJson::Spot { spot } => {
            let light = SpotLight::new(spot.intensity, spot.position, spot.direction)?
                .with_kc(spot.kc)
                .with_kl(spot.kl)
                .with_kq(spot.kq)
                .with_narrow_beam(spot.narrow_beam);
            light.validate()?;
            light.into()
        }
    };
    Ok(light)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Shape;

    const SCENE: &str = r#"{
        "name": "unit",
        "background": [10, 20, 30],
        "ambient": { "color": [100, 100, 100], "ka": 0.5 },
        "camera": { "location": [0, 0, 0], "look_at": [0, 0, -5],
                    "vp_size": [2, 2], "vp_distance": 1, "resolution": [4, 3] },
        "materials": { "red": { "kd": [0.6, 0.1, 0.1], "ks": 0.3, "shininess": 40 } },
        "objects": [
            { "sphere": { "center": [0, 0, -5], "radius": 1, "mat": "red" } },
            { "plane": { "point": [0, -1, 0], "normal": [0, 1, 0], "mat": "missing" } },
            { "triangle": { "vertices": [[0, 0, -3], [1, 0, -3], [0, 1, -3]], "emission": [5, 5, 5] } },
            { "cylinder": { "origin": [2, 0, -4], "direction": [0, 1, 0], "radius": 0.5, "height": 2 } }
        ],
        "lights": [
            { "point": { "intensity": [500, 500, 500], "position": [2, 2, 0], "kl": 0.05 } },
            { "spot": { "intensity": [300, 300, 300], "position": [0, 5, 0], "direction": [0, -1, 0], "narrow_beam": 8 } },
            { "directional": { "intensity": [50, 50, 50], "direction": [0, -1, -1] } }
        ]
    }"#;

    #[test]
    fn test_parse_scene() {
        let loaded = parse(SCENE, Path::new(".")).unwrap();
        let scene = &loaded.scene;
        assert_eq!(scene.name, "unit");
        assert_eq!(scene.background, Color::new(10.0, 20.0, 30.0));
        assert_eq!(scene.ambient.intensity(), Color::new(50.0, 50.0, 50.0));
        assert_eq!(scene.lights.len(), 3);
        assert!(matches!(scene.lights[1], LightSource::Spot(_)));
        assert_eq!(scene.geometries.len(), 4);

        let camera = loaded.camera.build().unwrap();
        assert_eq!(camera.resolution(), (4, 3));
    }

    #[test]
    fn test_materials_by_name() {
        let loaded = parse(SCENE, Path::new(".")).unwrap();
        let geometries: Vec<&Geometry> = loaded
            .scene
            .geometries
            .children()
            .iter()
            .filter_map(|n| match n {
                Node::Leaf(g) => Some(g),
                Node::Group(_) => None,
            })
            .collect();

        assert!(matches!(geometries[0].shape(), Shape::Sphere(_)));
        assert_eq!(geometries[0].material().kd, Double3(0.6, 0.1, 0.1));
        assert_eq!(geometries[0].material().ks, Double3::splat(0.3));
        assert_eq!(geometries[0].material().ka, Double3::ONE);
        assert_eq!(geometries[0].material().shininess, 40);

        // unknown and missing names both fall back
        assert_eq!(*geometries[1].material(), Material::default());
        assert_eq!(*geometries[2].material(), Material::default());
        assert_eq!(geometries[2].emission(), Color::new(5.0, 5.0, 5.0));
    }

    #[test]
    fn test_hierarchy_option() {
        let json = SCENE.replacen("\"name\": \"unit\",", "\"name\": \"unit\", \"bvh_leaf_size\": 1,", 1);
        let loaded = parse(&json, Path::new(".")).unwrap();
        // the plane stays on top next to one group of the bounded objects
        assert_eq!(loaded.scene.geometries.len(), 2);
    }

    #[test]
    fn test_invalid_geometry() {
        let json = SCENE.replace("\"radius\": 1,", "\"radius\": -1,");
        assert!(matches!(
            parse(&json, Path::new(".")),
            Err(SceneError::Geometry(crate::error::Error::Construction(_)))
        ));
    }

    #[test]
    fn test_zero_attenuation_rejected() {
        let json = SCENE.replace("\"kl\": 0.05 }", "\"kc\": 0 }");
        assert!(matches!(
            parse(&json, Path::new(".")),
            Err(SceneError::Geometry(crate::error::Error::Construction(_)))
        ));
    }

    #[test]
    fn test_zero_vector_rejected() {
        let json = SCENE.replace("\"normal\": [0, 1, 0]", "\"normal\": [0, 0, 0]");
        assert!(matches!(parse(&json, Path::new(".")), Err(SceneError::Json(_))));
    }

    #[test]
    fn test_camera_without_direction() {
        let json = SCENE.replace("\"look_at\": [0, 0, -5],", "");
        let loaded = parse(&json, Path::new(".")).unwrap();
        assert!(matches!(loaded.camera.build(), Err(crate::error::Error::Configuration(_))));
    }

    #[test]
    fn test_missing_mesh_file() {
        let json = SCENE.replace(
            "\"objects\": [",
            "\"objects\": [ { \"mesh\": { \"file\": \"does-not-exist.obj\" } },",
        );
        assert!(matches!(parse(&json, Path::new(".")), Err(SceneError::Obj { .. })));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(load(Path::new("no/such/scene.json")), Err(SceneError::Io { .. })));
    }
}
