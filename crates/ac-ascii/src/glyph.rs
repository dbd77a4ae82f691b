use ac_core::config::AsciiStyle;
use ac_core::error::CoreError;
use glam::Vec2;

use crate::atlas::GlyphAtlas;
use crate::hash::smoothstep;

/// Marge relative retirée de chaque bord de tuile avant lecture de l'atlas,
/// pour que le filtrage bilinéaire ne déborde pas sur la tuile voisine.
pub const ATLAS_INSET: f32 = 0.02;

/// Style procédural effectivement dessinable.
///
/// Seul `Standard` a une forme ; les autres `AsciiStyle` sont refusés à la
/// construction plutôt que de dessiner du vide silencieusement.
///
/// # Example
/// ```
/// use ac_ascii::glyph::ProceduralStyle;
/// use ac_core::config::AsciiStyle;
/// assert!(ProceduralStyle::try_from(AsciiStyle::Standard).is_ok());
/// assert!(ProceduralStyle::try_from(AsciiStyle::Blocks).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProceduralStyle {
    /// Cinq paliers lissés plus un palier plein.
    Standard,
}

impl TryFrom<AsciiStyle> for ProceduralStyle {
    type Error = CoreError;

    fn try_from(style: AsciiStyle) -> Result<Self, Self::Error> {
        match style {
            AsciiStyle::Standard => Ok(Self::Standard),
            other => Err(CoreError::UnsupportedStyle(other)),
        }
    }
}

impl ProceduralStyle {
    /// Intensité du glyphe pour une luminosité et une position locale.
    #[inline(always)]
    #[must_use]
    pub fn shape(self, brightness: f32, local_uv: Vec2) -> f32 {
        match self {
            Self::Standard => standard_glyph(brightness, local_uv),
        }
    }
}

/// Glyphe procédural standard sur une sous-grille 4×4.
///
/// Les paliers se recouvrent (fenêtres smoothstep) pour que la densité varie
/// continûment : point → bloc 2×2 → barre → barre pondérée → bloc bordé →
/// plein. Sous 0.01, rien n'est dessiné.
///
/// # Example
/// ```
/// use ac_ascii::glyph::standard_glyph;
/// use glam::Vec2;
/// assert_eq!(standard_glyph(0.005, Vec2::splat(0.3)), 0.0);
/// assert_eq!(standard_glyph(1.0, Vec2::splat(0.9)), 1.0);
/// ```
#[must_use]
pub fn standard_glyph(brightness: f32, local_uv: Vec2) -> f32 {
    if brightness < 0.01 {
        return 0.0;
    }
    let grid = (local_uv * 4.0).floor();
    let (gx, gy) = (grid.x, grid.y);
    let inner_x = gx == 1.0 || gx == 2.0;
    let inner_y = gy == 1.0 || gy == 2.0;

    let dot = f32::from(u8::from(gx == 1.0 && gy == 1.0));
    let block2 = f32::from(u8::from(inner_x && inner_y));
    let bar = f32::from(u8::from(inner_y));
    let bar_weighted = if gy == 0.0 || gy == 3.0 {
        1.0
    } else if inner_y {
        0.5
    } else {
        0.0
    };
    let edge = if gx == 0.0 || gx == 2.0 || gy == 0.0 || gy == 2.0 {
        1.0
    } else {
        0.3
    };

    let b = brightness;
    let band = |a0: f32, a1: f32, b0: f32, b1: f32| smoothstep(a0, a1, b) * (1.0 - smoothstep(b0, b1, b));
    let t0 = 1.0 - smoothstep(0.0, 0.15, b);
    let t1 = band(0.08, 0.22, 0.22, 0.35);
    let t2 = band(0.20, 0.38, 0.38, 0.50);
    let t3 = band(0.35, 0.52, 0.52, 0.65);
    let t4 = band(0.50, 0.70, 0.70, 0.82);
    let t5 = smoothstep(0.68, 1.0, b);

    (dot * t0 * 0.5 + block2 * t1 + bar * t2 + bar_weighted * t3 + edge * t4 + t5).clamp(0.0, 1.0)
}

/// Origine des glyphes pour un pipeline : atlas lié ou forme procédurale.
#[derive(Clone, Copy)]
pub enum GlyphSource<'a> {
    /// Tuiles rasterisées, l'atlas a priorité sur le style.
    Atlas(&'a GlyphAtlas),
    /// Formes calculées.
    Procedural(ProceduralStyle),
}

impl<'a> GlyphSource<'a> {
    /// Choisit la source : l'atlas s'il est fourni, sinon le style procédural.
    ///
    /// # Errors
    /// `CoreError::UnsupportedStyle` si aucun atlas n'est fourni et que le
    /// style n'a pas de forme procédurale.
    pub fn resolve(style: AsciiStyle, atlas: Option<&'a GlyphAtlas>) -> Result<Self, CoreError> {
        match atlas {
            Some(atlas) => Ok(Self::Atlas(atlas)),
            None => ProceduralStyle::try_from(style).map(Self::Procedural),
        }
    }

    /// Intensité du glyphe [0, 1] pour une luminosité de sélection.
    #[inline]
    #[must_use]
    pub fn intensity(&self, brightness: f32, local_uv: Vec2) -> f32 {
        match self {
            Self::Atlas(atlas) => {
                let tile = atlas.tile_index(brightness);
                let inner = Vec2::splat(ATLAS_INSET) + local_uv * (1.0 - 2.0 * ATLAS_INSET);
                atlas.sample(tile, inner)
            }
            Self::Procedural(style) => style.shape(brightness, local_uv),
        }
    }
}
