use glam::{Vec2, Vec4};

use crate::traits::ColorSampler;

/// Buffer de pixels réutilisable. Pré-alloué, jamais redimensionné en hot path.
///
/// Stocke les pixels en RGBA row-major, 4 bytes par pixel. Sert à la fois
/// d'image source (échantillonnée en UV normalisées) et de sortie du pipeline.
///
/// # Example
/// ```
/// use ac_core::frame::FrameBuffer;
/// let fb = FrameBuffer::new(10, 10);
/// assert_eq!(fb.data.len(), 400);
/// ```
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    /// Pixels RGBA, row-major, 4 bytes par pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameBuffer {
    /// Crée un buffer pré-alloué aux dimensions données (noir transparent).
    ///
    /// # Example
    /// ```
    /// use ac_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(100, 50);
    /// assert_eq!(fb.width, 100);
    /// assert_eq!(fb.height, 50);
    /// assert_eq!(fb.data.len(), 100 * 50 * 4);
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; width as usize * height as usize * 4],
            width,
            height,
        }
    }

    /// Crée un buffer uniformément rempli avec `rgba`.
    ///
    /// # Example
    /// ```
    /// use ac_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::filled(2, 2, [128, 128, 128, 255]);
    /// assert_eq!(fb.pixel(1, 1), (128, 128, 128, 255));
    /// ```
    #[must_use]
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut fb = Self::new(width, height);
        for px in fb.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
        fb
    }

    /// `true` si le buffer ne contient aucun pixel.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Accès au pixel (x, y) → (r, g, b, a).
    ///
    /// # Example
    /// ```
    /// use ac_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(10, 10);
    /// let (r, g, b, a) = fb.pixel(0, 0);
    /// assert_eq!((r, g, b, a), (0, 0, 0, 0));
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        if idx + 3 >= self.data.len() {
            return (0, 0, 0, 0);
        }
        (
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        )
    }

    /// Texel (x, y) normalisé en [0, 1].
    #[inline(always)]
    fn texel(&self, x: u32, y: u32) -> Vec4 {
        let (r, g, b, a) = self.pixel(x, y);
        Vec4::new(f32::from(r), f32::from(g), f32::from(b), f32::from(a)) / 255.0
    }

    /// Écrit une couleur normalisée au pixel (x, y), saturée en [0, 1].
    ///
    /// # Example
    /// ```
    /// use ac_core::frame::FrameBuffer;
    /// use glam::Vec4;
    /// let mut fb = FrameBuffer::new(1, 1);
    /// fb.put_pixel(0, 0, Vec4::new(2.0, 0.5, -1.0, 1.0));
    /// assert_eq!(fb.pixel(0, 0), (255, 128, 0, 255));
    /// ```
    #[inline]
    pub fn put_pixel(&mut self, x: u32, y: u32, color: Vec4) {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        if let Some(px) = self.data.get_mut(idx..idx + 4) {
            px.copy_from_slice(&quantize(color));
        }
    }
}

/// Convertit une couleur normalisée en RGBA8 (saturation puis arrondi),
/// comme l'écriture dans une cible 8 bits.
#[inline(always)]
#[must_use]
pub fn quantize(color: Vec4) -> [u8; 4] {
    let c = color.clamp(Vec4::ZERO, Vec4::ONE) * 255.0;
    [
        c.x.round() as u8,
        c.y.round() as u8,
        c.z.round() as u8,
        c.w.round() as u8,
    ]
}

impl ColorSampler for FrameBuffer {
    /// Échantillonnage bilinéaire, adressage clamp-to-edge. `uv = (0, 0)` est
    /// le coin haut-gauche de l'image.
    fn sample(&self, uv: Vec2) -> Vec4 {
        if self.is_empty() {
            return Vec4::ZERO;
        }
        let (w, h) = (self.width as f32, self.height as f32);
        let x = uv.x * w - 0.5;
        let y = uv.y * h - 0.5;
        if !x.is_finite() || !y.is_finite() {
            return Vec4::ZERO;
        }
        let x0f = x.floor();
        let y0f = y.floor();
        let fx = x - x0f;
        let fy = y - y0f;

        let max_x = self.width - 1;
        let max_y = self.height - 1;
        let cx = |v: f32| v.clamp(0.0, max_x as f32) as u32;
        let cy = |v: f32| v.clamp(0.0, max_y as f32) as u32;
        let (x0, x1) = (cx(x0f), cx(x0f + 1.0));
        let (y0, y1) = (cy(y0f), cy(y0f + 1.0));

        let top = self.texel(x0, y0).lerp(self.texel(x1, y0), fx);
        let bottom = self.texel(x0, y1).lerp(self.texel(x1, y1), fx);
        top.lerp(bottom, fy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_buffer_samples_uniformly() {
        let fb = FrameBuffer::filled(4, 3, [51, 102, 153, 255]);
        for uv in [Vec2::ZERO, Vec2::splat(0.5), Vec2::ONE, Vec2::new(-3.0, 7.0)] {
            let c = fb.sample(uv);
            assert!((c.x - 0.2).abs() < 1e-6);
            assert!((c.y - 0.4).abs() < 1e-6);
            assert!((c.z - 0.6).abs() < 1e-6);
            assert!((c.w - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn bilinear_blends_between_texel_centers() {
        let mut fb = FrameBuffer::new(2, 1);
        fb.put_pixel(0, 0, Vec4::new(0.0, 0.0, 0.0, 1.0));
        fb.put_pixel(1, 0, Vec4::new(1.0, 1.0, 1.0, 1.0));
        // Centres des texels : u = 0.25 et u = 0.75.
        assert!(fb.sample(Vec2::new(0.25, 0.5)).x.abs() < 1e-6);
        assert!((fb.sample(Vec2::new(0.75, 0.5)).x - 1.0).abs() < 1e-6);
        assert!((fb.sample(Vec2::new(0.5, 0.5)).x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn empty_buffer_samples_transparent() {
        let fb = FrameBuffer::new(0, 0);
        assert!(fb.is_empty());
        assert_eq!(fb.sample(Vec2::splat(0.5)), Vec4::ZERO);
    }

    #[test]
    fn quantize_saturates() {
        assert_eq!(quantize(Vec4::new(-0.5, 0.0, 1.0, 9.0)), [0, 0, 255, 255]);
    }
}
