/// Linear premultiplied RGBA color.
///
/// Invariant: `rgb` components are already multiplied by `a`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::from_premul(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::from_premul(0.0, 0.0, 0.0, 1.0);

    #[inline]
    pub const fn transparent() -> Self {
        Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 }
    }

    /// Creates a premultiplied color from premultiplied components.
    #[inline]
    pub const fn from_premul(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a premultiplied color from straight alpha components.
    ///
    /// Inputs are clamped to `[0, 1]`.
    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: r.clamp(0.0, 1.0) * a,
            g: g.clamp(0.0, 1.0) * a,
            b: b.clamp(0.0, 1.0) * a,
            a,
        }
    }

    /// Opaque gray of the given straight intensity.
    #[inline]
    pub fn gray(v: f32) -> Self {
        Self::from_straight(v, v, v, 1.0)
    }

    /// White modulated to `alpha`: the tint used to fade a texture in and out.
    #[inline]
    pub fn white_alpha(alpha: f32) -> Self {
        Self::from_straight(1.0, 1.0, 1.0, alpha)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_straight_premultiplies() {
        let c = Color::from_straight(1.0, 0.5, 0.0, 0.5);
        assert_eq!(c.to_array(), [0.5, 0.25, 0.0, 0.5]);
    }

    #[test]
    fn from_straight_clamps() {
        let c = Color::from_straight(2.0, -1.0, 0.5, 3.0);
        assert_eq!(c.to_array(), [1.0, 0.0, 0.5, 1.0]);
    }

    #[test]
    fn white_alpha_is_uniform() {
        let c = Color::white_alpha(0.25);
        assert_eq!(c.to_array(), [0.25; 4]);
    }
}
