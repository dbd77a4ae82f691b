//! Font rasterization for asciicrt glyph atlases.
//!
//! Implements `GlyphRasterizer` on top of `ab_glyph`: one font, one size,
//! every glyph centered on black in its tile.

use std::path::Path;

use ab_glyph::{Font, FontVec, PxScale, ScaleFont, point};
use ac_core::error::CoreError;
use ac_core::traits::GlyphRasterizer;

/// Taille de police par défaut relative à la tuile (62 px pour 64 px).
pub const DEFAULT_SCALE_RATIO: f32 = 62.0 / 64.0;

/// DejaVu Sans Mono, embarquée pour que l'atlas ait toujours une police.
pub const EMBEDDED_FONT: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

/// Polices monospace cherchées quand aucune police n'est fournie.
pub const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu-sans-mono-fonts/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/usr/share/fonts/noto/NotoSansMono-Regular.ttf",
    "/System/Library/Fonts/Menlo.ttc",
    "C:\\Windows\\Fonts\\consola.ttf",
];

/// Rasteriseur de glyphes sur une police TTF/OTF chargée en mémoire.
///
/// # Example
/// ```
/// use ac_glyph::FontRasterizer;
/// assert!(FontRasterizer::new(b"pas une police".to_vec()).is_err());
/// ```
pub struct FontRasterizer {
    font: FontVec,
    scale_ratio: f32,
}

impl FontRasterizer {
    /// Charge une police depuis ses octets.
    ///
    /// # Errors
    /// `CoreError::Font` si les octets ne forment pas une police valide.
    pub fn new(font_data: Vec<u8>) -> Result<Self, CoreError> {
        let font = FontVec::try_from_vec(font_data)
            .map_err(|e| CoreError::Font(e.to_string()))?;
        Ok(Self {
            font,
            scale_ratio: DEFAULT_SCALE_RATIO,
        })
    }

    /// Charge une police depuis un fichier.
    ///
    /// # Errors
    /// `CoreError::Font` si le fichier est illisible ou n'est pas une police.
    pub fn from_file(path: &Path) -> Result<Self, CoreError> {
        let data = std::fs::read(path)
            .map_err(|e| CoreError::Font(format!("{} : {e}", path.display())))?;
        let rasterizer = Self::new(data)?;
        log::info!("Police chargée : {}", path.display());
        Ok(rasterizer)
    }

    /// Police embarquée ([`EMBEDDED_FONT`]).
    ///
    /// # Errors
    /// `CoreError::Font` si la police embarquée est corrompue.
    ///
    /// # Example
    /// ```
    /// use ac_glyph::FontRasterizer;
    /// let font = FontRasterizer::embedded().unwrap();
    /// assert!(font.covers('@'));
    /// ```
    pub fn embedded() -> Result<Self, CoreError> {
        Self::new(EMBEDDED_FONT.to_vec())
    }

    /// Première police système lisible parmi [`SYSTEM_FONT_CANDIDATES`].
    #[must_use]
    pub fn from_system() -> Option<Self> {
        SYSTEM_FONT_CANDIDATES
            .iter()
            .map(Path::new)
            .filter(|p| p.is_file())
            .find_map(|p| match Self::from_file(p) {
                Ok(r) => Some(r),
                Err(e) => {
                    log::debug!("Police système ignorée : {e}");
                    None
                }
            })
    }

    /// Change la taille de police relative à la tuile, bornée à ]0, 1].
    #[must_use]
    pub fn with_scale_ratio(mut self, ratio: f32) -> Self {
        if ratio.is_finite() && ratio > 0.0 {
            self.scale_ratio = ratio.min(1.0);
        }
        self
    }

    /// `true` si la police a un glyphe pour `ch`.
    #[must_use]
    pub fn covers(&self, ch: char) -> bool {
        self.font.glyph_id(ch).0 != 0
    }
}

impl GlyphRasterizer for FontRasterizer {
    fn rasterize(&self, ch: char, tile_size: u32, out: &mut [u8]) {
        // Glyphe absent : tuile vide plutôt qu'une boîte .notdef.
        if !self.covers(ch) {
            log::debug!("Glyphe absent de la police : {ch:?}");
            return;
        }
        let tile = tile_size as f32;
        let scale = PxScale::from(tile * self.scale_ratio);
        let scaled = self.font.as_scaled(scale);
        let gid = self.font.glyph_id(ch);

        // Centrage horizontal sur l'avance, ligne de base au milieu de l'em.
        let x = (tile - scaled.h_advance(gid)) * 0.5;
        let baseline = tile * 0.5 + (scaled.ascent() + scaled.descent()) * 0.5;
        let glyph = gid.with_scale_and_position(scale, point(x, baseline));

        let Some(outline) = self.font.outline_glyph(glyph) else {
            return;
        };
        let bounds = outline.px_bounds();
        let size = tile_size as i64;
        outline.draw(|gx, gy, v| {
            let px = i64::from(gx) + bounds.min.x as i64;
            let py = i64::from(gy) + bounds.min.y as i64;
            if (0..size).contains(&px) && (0..size).contains(&py) {
                let idx = (py * size + px) as usize;
                if let Some(dst) = out.get_mut(idx) {
                    *dst = (*dst).max((v.clamp(0.0, 1.0) * 255.0).round() as u8);
                }
            }
        });
    }
}
