//! Wavefront OBJ meshes as triangle lists.

use std::io::BufRead;
use std::path::Path;

use crate::{
    algebra::{Double3, Point},
    polygon::Triangle,
};

/// Placement applied to every vertex: `v * scale + offset`.
#[derive(Clone, Copy, Debug)]
pub struct MeshTransform {
    pub scale: f64,
    pub offset: Double3,
}

impl Default for MeshTransform {
    fn default() -> Self {
        Self { scale: 1.0, offset: Double3::ZERO }
    }
}

impl MeshTransform {
    fn apply(&self, p: [f32; 3]) -> Point {
        let v = Double3(p[0] as f64, p[1] as f64, p[2] as f64);
        let moved = v.scale(self.scale).add(self.offset);
        Point::new(moved.0, moved.1, moved.2)
    }
}

pub fn load_obj(path: &Path, transform: MeshTransform) -> Result<Vec<Triangle>, tobj::LoadError> {
    let (models, _) = tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS)?;
    log::debug!("{}: {} models", path.display(), models.len());
    Ok(triangles(&models, transform))
}

/// Parse OBJ text. Material libraries are not read.
pub fn parse_obj(reader: &mut impl BufRead, transform: MeshTransform) -> Result<Vec<Triangle>, tobj::LoadError> {
    let (models, _) = tobj::load_obj_buf(reader, &tobj::GPU_LOAD_OPTIONS, |_| {
        Err(tobj::LoadError::OpenFileFailed)
    })?;
    Ok(triangles(&models, transform))
}

/// Triangles of every model. Faces that are degenerate after the transform,
/// or that index past the vertex list, are skipped.
fn triangles(models: &[tobj::Model], transform: MeshTransform) -> Vec<Triangle> {
    let mut out = Vec::new();
    let mut skipped = 0usize;
    for model in models {
        let mesh = &model.mesh;
        let vertex = |i: u32| -> Option<Point> {
            let k = i as usize * 3;
            let p = mesh.positions.get(k..k + 3)?;
            Some(transform.apply([p[0], p[1], p[2]]))
        };
        for face in mesh.indices.chunks_exact(3) {
            let tri = match (vertex(face[0]), vertex(face[1]), vertex(face[2])) {
                (Some(a), Some(b), Some(c)) => Triangle::new(a, b, c).ok(),
                _ => None,
            };
            match tri {
                Some(t) => out.push(t),
                None => skipped += 1,
            }
        }
    }
    if skipped > 0 {
        log::debug!("skipped {skipped} degenerate mesh faces");
    }
    out
}
