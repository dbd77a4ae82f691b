use glam::Vec3;

use crate::config::ColorPalette;

/// Poids de luminance BT.601.
pub const LUMA_WEIGHTS: Vec3 = Vec3::new(0.299, 0.587, 0.114);

/// Luminance perceptuelle d'une couleur normalisée.
///
/// # Example
/// ```
/// use ac_core::color::luma;
/// use glam::Vec3;
/// assert!((luma(Vec3::ONE) - 1.0).abs() < 1e-6);
/// assert!((luma(Vec3::splat(0.5)) - 0.5).abs() < 1e-6);
/// ```
#[inline(always)]
#[must_use]
pub fn luma(rgb: Vec3) -> f32 {
    rgb.dot(LUMA_WEIGHTS)
}

/// Contraste autour de 0.5 puis offset de luminosité. Aucun clamp :
/// les valeurs hors [0, 1] sont conservées pour les étapes suivantes.
///
/// # Example
/// ```
/// use ac_core::color::apply_tone;
/// use glam::Vec3;
/// assert_eq!(apply_tone(Vec3::splat(0.75), 2.0, 0.0), Vec3::splat(1.0));
/// assert_eq!(apply_tone(Vec3::splat(0.3), 1.0, 0.0), Vec3::splat(0.3));
/// ```
#[inline(always)]
#[must_use]
pub fn apply_tone(rgb: Vec3, contrast: f32, brightness: f32) -> Vec3 {
    if contrast == 1.0 && brightness == 0.0 {
        return rgb;
    }
    (rgb - 0.5) * contrast + 0.5 + brightness
}

/// Réduit une couleur à une palette de phosphore, pilotée par la luminance.
///
/// # Example
/// ```
/// use ac_core::color::apply_palette;
/// use ac_core::config::ColorPalette;
/// use glam::Vec3;
/// let c = Vec3::new(0.2, 0.4, 0.6);
/// assert_eq!(apply_palette(c, ColorPalette::None), c);
/// let amber = apply_palette(Vec3::ONE, ColorPalette::Amber);
/// assert!((amber.y - 0.6).abs() < 1e-6);
/// ```
#[must_use]
pub fn apply_palette(rgb: Vec3, palette: ColorPalette) -> Vec3 {
    let l = luma(rgb);
    match palette {
        ColorPalette::None => rgb,
        ColorPalette::Green => Vec3::new(0.1, l * 0.9, 0.1),
        ColorPalette::Amber => Vec3::new(l, l * 0.6, l * 0.2),
        ColorPalette::Cyan => Vec3::new(0.0, l * 0.8, l),
        ColorPalette::Blue => Vec3::new(0.1, 0.2, l),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_tone_is_identity() {
        let c = Vec3::new(0.13, 0.57, 0.91);
        assert_eq!(apply_tone(c, 1.0, 0.0), c);
    }

    #[test]
    fn palettes_are_luminance_driven() {
        let dark = Vec3::splat(0.1);
        let bright = Vec3::splat(0.9);
        for p in [
            ColorPalette::Green,
            ColorPalette::Amber,
            ColorPalette::Cyan,
            ColorPalette::Blue,
        ] {
            assert!(luma(apply_palette(bright, p)) > luma(apply_palette(dark, p)), "{p:?}");
        }
        // Hue discarded: same luminance, same output.
        let a = apply_palette(Vec3::new(1.0, 0.0, 0.0), ColorPalette::Green);
        let b = apply_palette(Vec3::splat(0.299), ColorPalette::Green);
        assert!((a - b).length() < 1e-6);
    }
}
