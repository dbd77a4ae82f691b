use glam::{Vec2, Vec4};

/// Capacité d'échantillonnage d'une image en coordonnées normalisées.
///
/// Implémenté par : `FrameBuffer` (bilinéaire), et toute closure
/// `Fn(Vec2) -> Vec4` (pratique pour les tests et les sources procédurales).
///
/// # Example
/// ```
/// use ac_core::traits::ColorSampler;
/// use glam::{Vec2, Vec4};
///
/// let gray = |_uv: Vec2| Vec4::new(0.5, 0.5, 0.5, 1.0);
/// assert_eq!(gray.sample(Vec2::ZERO).x, 0.5);
/// ```
pub trait ColorSampler: Sync {
    /// Couleur RGBA normalisée à `uv` ∈ [0, 1]² (hors bornes : clamp-to-edge).
    fn sample(&self, uv: Vec2) -> Vec4;
}

impl<F> ColorSampler for F
where
    F: Fn(Vec2) -> Vec4 + Sync,
{
    #[inline(always)]
    fn sample(&self, uv: Vec2) -> Vec4 {
        self(uv)
    }
}

/// Rasterise un glyphe unique dans une tuile carrée.
///
/// Le contrat d'atlas exige un rendu uniforme : même police, même taille,
/// glyphe centré sur fond noir, pour que la densité visuelle croisse
/// linéairement avec l'index de tuile.
///
/// # Example
/// ```
/// use ac_core::traits::GlyphRasterizer;
///
/// struct Solid;
/// impl GlyphRasterizer for Solid {
///     fn rasterize(&self, _ch: char, _tile_size: u32, out: &mut [u8]) {
///         out.fill(255);
///     }
/// }
/// let mut tile = vec![0u8; 16];
/// Solid.rasterize('#', 4, &mut tile);
/// assert!(tile.iter().all(|&v| v == 255));
/// ```
pub trait GlyphRasterizer {
    /// Écrit la couverture [0..255] de `ch` dans `out` (`tile_size²` octets,
    /// row-major, déjà remis à zéro par l'appelant).
    fn rasterize(&self, ch: char, tile_size: u32, out: &mut [u8]);
}
