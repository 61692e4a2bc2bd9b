//! Pinhole camera: view-plane geometry, primary rays and the render loop.

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::{
    algebra::{is_zero, Color, Point, Vector},
    error::{Error, Result},
    output::PixelSink,
    ray::Ray,
    renderer::RayTracer,
};

/// How the builder was told to orient the camera.
#[derive(Clone, Copy, Debug)]
enum Orientation {
    Direction { to: Vector, up: Vector },
    Target(Point),
}

/// Immutable camera snapshot produced by [`CameraBuilder::build`].
#[derive(Clone, Debug)]
pub struct Camera {
    location: Point,
    to: Vector,
    up: Vector,
    right: Vector,
    width: f64,
    height: f64,
    distance: f64,
    nx: u32,
    ny: u32,
    multithreading: bool,
    progress: bool,
}

#[derive(Clone, Debug, Default)]
pub struct CameraBuilder {
    location: Option<Point>,
    orientation: Option<Orientation>,
    size: Option<(f64, f64)>,
    distance: Option<f64>,
    resolution: Option<(u32, u32)>,
    multithreading: bool,
    progress: bool,
}

impl CameraBuilder {
    pub fn location(mut self, location: Point) -> Self {
        self.location = Some(location);
        self
    }

    /// Orient by explicit forward and up vectors, which must be orthogonal.
    pub fn direction(mut self, to: Vector, up: Vector) -> Self {
        self.orientation = Some(Orientation::Direction { to, up });
        self
    }

    /// Aim at `target`. Up is world Y made orthogonal to the view direction,
    /// or world Z when looking straight along Y.
    pub fn look_at(mut self, target: Point) -> Self {
        self.orientation = Some(Orientation::Target(target));
        self
    }

    /// View-plane width and height in scene units.
    pub fn vp_size(mut self, width: f64, height: f64) -> Self {
        self.size = Some((width, height));
        self
    }

    /// Distance from the location to the view plane.
    pub fn vp_distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }

    /// Pixel counts along the view-plane width and height.
    pub fn resolution(mut self, nx: u32, ny: u32) -> Self {
        self.resolution = Some((nx, ny));
        self
    }

    /// Trace rows on the rayon pool instead of one by one.
    pub fn multithreading(mut self, enabled: bool) -> Self {
        self.multithreading = enabled;
        self
    }

    /// Draw a progress bar on stderr while rendering.
    pub fn progress(mut self, enabled: bool) -> Self {
        self.progress = enabled;
        self
    }

    pub fn build(self) -> Result<Camera> {
        let location = self
            .location
            .ok_or_else(|| Error::configuration("location is not set"))?;
        let orientation = self
            .orientation
            .ok_or_else(|| Error::configuration("direction is not set"))?;
        let (width, height) = self
            .size
            .ok_or_else(|| Error::configuration("view plane size is not set"))?;
        let distance = self
            .distance
            .ok_or_else(|| Error::configuration("view plane distance is not set"))?;
        let (nx, ny) = self
            .resolution
            .ok_or_else(|| Error::configuration("resolution is not set"))?;

        for (name, value) in [("width", width), ("height", height), ("distance", distance)] {
            if !(value.is_finite() && value > 0.0) || is_zero(value) {
                return Err(Error::configuration(format!("view plane {name} must be positive, got {value}")));
            }
        }
        if nx == 0 || ny == 0 {
            return Err(Error::configuration(format!("resolution must be positive, got {nx}x{ny}")));
        }

        let (to, up) = match orientation {
            Orientation::Direction { to, up } => {
                let to = to.normalize()?;
                let up = up.normalize()?;
                if !is_zero(to.dot(&up)) {
                    return Err(Error::configuration("direction vectors are not orthogonal"));
                }
                (to, up)
            }
            Orientation::Target(target) => {
                let to = target
                    .subtract(&location)
                    .map_err(|_| Error::configuration("look-at target coincides with the location"))?
                    .normalize()?;
                (to, up_for(&to)?)
            }
        };
        let right = to.cross(&up)?.normalize()?;

        log::debug!(
            "camera at {location:?} looking {:?}, {nx}x{ny} pixels on a {width}x{height} plane at {distance}",
            to.xyz()
        );

        Ok(Camera {
            location,
            to,
            up,
            right,
            width,
            height,
            distance,
            nx,
            ny,
            multithreading: self.multithreading,
            progress: self.progress,
        })
    }
}

/// World up projected off `to`.
fn up_for(to: &Vector) -> Result<Vector> {
    let reference = if is_zero(1.0 - to.y().abs()) { Vector::Z } else { Vector::Y };
    let along = to.dot(&reference);
    match to.scale(along) {
        Ok(projection) => reference.subtract(&projection)?.normalize(),
        // already orthogonal
        Err(_) => Ok(reference),
    }
}

impl Camera {
    pub fn builder() -> CameraBuilder {
        CameraBuilder::default()
    }

    pub fn location(&self) -> &Point { &self.location }

    pub fn to(&self) -> &Vector { &self.to }

    pub fn up(&self) -> &Vector { &self.up }

    pub fn right(&self) -> &Vector { &self.right }

    pub fn resolution(&self) -> (u32, u32) { (self.nx, self.ny) }

    /// Primary ray through the center of pixel `(j, i)` (column, row) of an
    /// `nx` by `ny` grid laid over the view plane. Row 0 is the top.
    pub fn construct_ray(&self, nx: u32, ny: u32, j: u32, i: u32) -> Result<Ray> {
        let rx = self.width / nx as f64;
        let ry = self.height / ny as f64;
        let xj = (j as f64 - (nx as f64 - 1.0) / 2.0) * rx;
        let yi = -(i as f64 - (ny as f64 - 1.0) / 2.0) * ry;

        let center = self.location.xyz().add(self.to.xyz().scale(self.distance));
        let pixel = center
            .add(self.right.xyz().scale(xj))
            .add(self.up.xyz().scale(yi));
        Ray::new(self.location, Vector::from_xyz(pixel.sub(self.location.xyz()))?)
    }

    /// Trace one ray per pixel and write every color to `sink` at `(j, i)`.
    pub fn render(&self, tracer: &dyn RayTracer, sink: &mut dyn PixelSink) -> Result<()> {
        self.check_sink(sink)?;
        let (nx, ny) = (self.nx, self.ny);

        let bar = if self.progress {
            let pb = ProgressBar::new(ny as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{bar:40.cyan/blue} {pos}/{len} rows | {elapsed_precise} | ETA: {eta}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            pb
        } else {
            ProgressBar::hidden()
        };

        let row = |i: u32| -> Result<Vec<Color>> {
            let colors = (0..nx)
                .map(|j| self.construct_ray(nx, ny, j, i).map(|ray| tracer.trace_ray(&ray)))
                .collect();
            bar.inc(1);
            colors
        };

        let rows: Vec<Vec<Color>> = if self.multithreading {
            (0..ny).into_par_iter().map(row).collect::<Result<_>>()?
        } else {
            (0..ny).map(row).collect::<Result<_>>()?
        };
        bar.finish_and_clear();

        for (i, colors) in rows.into_iter().enumerate() {
            for (j, color) in colors.into_iter().enumerate() {
                sink.write_pixel(j as u32, i as u32, color);
            }
        }
        Ok(())
    }

    /// Overlay grid lines every `interval` pixels.
    pub fn print_grid(&self, interval: u32, color: Color, sink: &mut dyn PixelSink) -> Result<()> {
        if interval == 0 {
            return Err(Error::configuration("grid interval must be positive"));
        }
        self.check_sink(sink)?;
        for i in 0..self.ny {
            for j in 0..self.nx {
                if i % interval == 0 || j % interval == 0 {
                    sink.write_pixel(j, i, color);
                }
            }
        }
        Ok(())
    }

    fn check_sink(&self, sink: &dyn PixelSink) -> Result<()> {
        if (sink.width(), sink.height()) != (self.nx, self.ny) {
            return Err(Error::configuration(format!(
                "sink is {}x{} but the camera renders {}x{}",
                sink.width(),
                sink.height(),
                self.nx,
                self.ny
            )));
        }
        Ok(())
    }
}
