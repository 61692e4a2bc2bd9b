//! Pixel sinks: where rendered colors go.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use thiserror::Error;

use crate::{algebra::Color, tonemap::ToneMap};

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Receives one color per pixel and finishes the frame on `flush`.
pub trait PixelSink {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Pixels outside the sink are dropped.
    fn write_pixel(&mut self, x: u32, y: u32, color: Color);

    fn flush(&mut self, name: &str) -> Result<(), OutputError>;
}

/// In-memory frame of unclamped colors, row-major.
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; width as usize * height as usize],
        }
    }

    pub fn pixels(&self) -> &[Color] { &self.pixels }

    /// Color at `(x, y)`; panics outside the buffer.
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[y as usize * self.width as usize + x as usize]
    }
}

impl PixelSink for PixelBuffer {
    fn width(&self) -> u32 { self.width }

    fn height(&self) -> u32 { self.height }

    fn write_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x < self.width && y < self.height {
            self.pixels[y as usize * self.width as usize + x as usize] = color;
        }
    }

    fn flush(&mut self, _name: &str) -> Result<(), OutputError> { Ok(()) }
}

/// Writes frames as PNG files into a directory.
pub struct ImageWriter {
    dir: PathBuf,
    image: RgbImage,
    tone_map: ToneMap,
}

impl ImageWriter {
    pub fn new(dir: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            dir: dir.into(),
            image: RgbImage::new(width, height),
            tone_map: ToneMap::default(),
        }
    }

    pub fn with_tone_map(mut self, tone_map: ToneMap) -> Self {
        self.tone_map = tone_map;
        self
    }

    pub fn dir(&self) -> &Path { &self.dir }

    /// File `flush(name)` writes to.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.png"))
    }
}

impl PixelSink for ImageWriter {
    fn width(&self) -> u32 { self.image.width() }

    fn height(&self) -> u32 { self.image.height() }

    fn write_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x >= self.image.width() || y >= self.image.height() {
            log::warn!("pixel ({x}, {y}) is outside the {}x{} image", self.image.width(), self.image.height());
            return;
        }
        self.image.put_pixel(x, y, Rgb(self.tone_map.apply(color).to_rgb8()));
    }

    fn flush(&mut self, name: &str) -> Result<(), OutputError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(name);
        self.image.save(&path)?;
        log::debug!("wrote {}", path.display());
        Ok(())
    }
}
