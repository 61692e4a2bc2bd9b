use crate::algebra::{Color, Double3};

/// Compression of out-of-range colors before 8-bit quantization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToneMap {
    /// Cut every channel at 255.
    #[default]
    Clamp,
    Reinhard,
    Aces,
}

impl ToneMap {
    /// Map a color on the 0..255 scale; the result stays on that scale.
    pub fn apply(self, color: Color) -> Color {
        let c = color.rgb().scale(1.0 / 255.0);
        let mapped = match self {
            Self::Clamp => c,
            Self::Reinhard => reinhard(c),
            Self::Aces => aces_film(c),
        };
        let m = mapped.scale(255.0);
        Color::new(m.0, m.1, m.2)
    }
}

pub fn reinhard(c: Double3) -> Double3 {
    Double3(
        c.0 / (1.0 + c.0),
        c.1 / (1.0 + c.1),
        c.2 / (1.0 + c.2),
    )
}

/// Narkowicz fit of the ACES filmic curve.
#[inline]
pub fn aces_film(c: Double3) -> Double3 {
    let curve = |x: f64| ((x * (2.51 * x + 0.03)) / (x * (2.43 * x + 0.59) + 0.14)).clamp(0.0, 1.0);
    Double3(curve(c.0), curve(c.1), curve(c.2))
}
