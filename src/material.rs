use crate::algebra::Double3;

/// Phong surface coefficients.
///
/// `kt` and `kr` are carried for a recursive transparency/reflection pass;
/// the local-lighting tracer does not read them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub ka: Double3,
    pub kd: Double3,
    pub ks: Double3,
    pub kt: Double3,
    pub kr: Double3,
    pub shininess: u32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ka: Double3::ONE,
            kd: Double3::ZERO,
            ks: Double3::ZERO,
            kt: Double3::ZERO,
            kr: Double3::ZERO,
            shininess: 0,
        }
    }
}

impl Material {
    pub fn with_ka(mut self, ka: impl Into<Double3>) -> Self {
        self.ka = ka.into();
        self
    }

    pub fn with_kd(mut self, kd: impl Into<Double3>) -> Self {
        self.kd = kd.into();
        self
    }

    pub fn with_ks(mut self, ks: impl Into<Double3>) -> Self {
        self.ks = ks.into();
        self
    }

    pub fn with_kt(mut self, kt: impl Into<Double3>) -> Self {
        self.kt = kt.into();
        self
    }

    pub fn with_kr(mut self, kr: impl Into<Double3>) -> Self {
        self.kr = kr.into();
        self
    }

    pub fn with_shininess(mut self, shininess: u32) -> Self {
        self.shininess = shininess;
        self
    }
}
