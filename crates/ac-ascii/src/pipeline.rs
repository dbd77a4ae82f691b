//! Transformation par pixel : distorsion → échantillonnage → cellule →
//! glyphe → composition → post-traitements.
//!
//! Chaque pixel est une fonction pure de `(uv, FrameContext, EffectParams,
//! image, atlas)`. Aucun état partagé n'est modifié pendant l'évaluation.

use std::f32::consts::PI;

use ac_core::color::{apply_palette, apply_tone, luma};
use ac_core::config::EffectParams;
use ac_core::error::CoreError;
use ac_core::traits::ColorSampler;
use glam::{Vec2, Vec3, Vec4};

use crate::atlas::GlyphAtlas;
use crate::glyph::GlyphSource;
use crate::grid::CellGrid;
use crate::hash::{lerp, noise};

/// Luminance brute sous laquelle une cellule est du fond.
pub const BACKGROUND_LUMA: f32 = 0.06;
/// Seuil de cellule vide, sans ombrage de volume.
pub const EMPTY_THRESHOLD: f32 = 0.14;
/// Seuil de cellule vide avec ombrage de volume.
pub const EMPTY_THRESHOLD_VOLUME: f32 = 0.04;
/// Gain du remappage de volume autour de 0.5.
pub const VOLUME_GAIN: f32 = 1.6;
/// Rayon minimal du halo du pointeur, en pixels.
pub const MIN_GLOW_RADIUS: f32 = 1.0;
/// Rayon minimal du vignettage.
pub const MIN_VIGNETTE_RADIUS: f32 = 0.01;

/// Valeurs figées au début d'une frame et partagées par tous les pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameContext {
    /// Temps de simulation (déjà quantifié par l'horloge).
    pub time: f32,
    /// Résolution de sortie en pixels.
    pub resolution: Vec2,
    /// Pointeur en pixels, y vers le bas.
    pub mouse: Vec2,
}

impl FrameContext {
    /// Contexte statique à t = 0, pointeur à l'origine.
    #[must_use]
    pub fn still(width: u32, height: u32) -> Self {
        Self {
            time: 0.0,
            resolution: Vec2::new(width as f32, height as f32),
            mouse: Vec2::ZERO,
        }
    }
}

/// Pipeline de transformation pour un jeu de paramètres et une source de glyphes.
///
/// # Example
/// ```
/// use ac_ascii::pipeline::{FrameContext, PixelPipeline};
/// use ac_core::config::EffectParams;
/// use glam::{Vec2, Vec4};
///
/// let params = EffectParams::default();
/// let pipeline = PixelPipeline::new(&params, None).unwrap();
/// let black = |_uv: Vec2| Vec4::new(0.0, 0.0, 0.0, 1.0);
/// let out = pipeline.shade(Vec2::splat(0.5), &FrameContext::still(64, 64), &black);
/// assert_eq!(out.truncate(), glam::Vec3::ZERO);
/// ```
pub struct PixelPipeline<'a> {
    params: &'a EffectParams,
    glyphs: GlyphSource<'a>,
    tint: Option<Vec3>,
    glow_radius: f32,
    vignette_radius: f32,
}

impl<'a> PixelPipeline<'a> {
    /// Lie les paramètres et, optionnellement, un atlas.
    ///
    /// Les rayons de halo et de vignettage sont bornés par [`MIN_GLOW_RADIUS`]
    /// et [`MIN_VIGNETTE_RADIUS`], même si `params` n'est pas passé par
    /// `clamp_all`.
    ///
    /// # Errors
    /// `CoreError::UnsupportedStyle` si aucun atlas n'est lié et que
    /// `ascii_style` n'a pas de forme procédurale.
    pub fn new(params: &'a EffectParams, atlas: Option<&'a GlyphAtlas>) -> Result<Self, CoreError> {
        let glyphs = GlyphSource::resolve(params.ascii_style, atlas)?;
        Ok(Self {
            params,
            glyphs,
            tint: params.tint_color.map(|t| Vec3::new(t.r, t.g, t.b)),
            // f32::max ignore NaN.
            glow_radius: params.mouse_glow_radius.max(MIN_GLOW_RADIUS),
            vignette_radius: params.vignette_radius.max(MIN_VIGNETTE_RADIUS),
        })
    }

    /// Paramètres liés.
    #[must_use]
    pub fn params(&self) -> &EffectParams {
        self.params
    }

    /// Grille de cellules pour une résolution donnée.
    #[must_use]
    pub fn grid(&self, resolution: Vec2) -> CellGrid {
        CellGrid::new(resolution, self.params.cell_size)
    }

    /// Couleur de sortie pour la coordonnée normalisée `uv` (origine en haut à gauche).
    #[inline]
    #[must_use]
    pub fn shade<S>(&self, uv: Vec2, ctx: &FrameContext, image: &S) -> Vec4
    where
        S: ColorSampler + ?Sized,
    {
        self.shade_in(&self.grid(ctx.resolution), uv, ctx, image)
    }

    /// Comme [`shade`](Self::shade), avec une grille déjà calculée pour la frame.
    #[must_use]
    pub fn shade_in<S>(&self, grid: &CellGrid, uv: Vec2, ctx: &FrameContext, image: &S) -> Vec4
    where
        S: ColorSampler + ?Sized,
    {
        let p = self.params;
        let t = ctx.time;

        // 1-2. Pré-distorsion
        let Some(work) = self.warp(uv, t) else {
            return Vec4::ZERO;
        };

        // 3-5. Cellule, couleur de cellule, luminosités
        let cell = grid.perturb(grid.cell_of(work), t, p);
        let sample = self.sample(image, grid.cell_center_uv(cell));
        let raw_luma = luma(sample.truncate());
        let mut cell_rgb = apply_tone(sample.truncate(), p.contrast_adjust, p.brightness_adjust);
        if p.noise_intensity > 0.0 {
            let n = noise(work * p.noise_scale + t * p.noise_speed);
            cell_rgb += (n - 0.5) * p.noise_intensity;
        }

        // 6-7. Inversion, remappage de volume
        let mut brightness = luma(cell_rgb);
        if p.invert {
            brightness = 1.0 - brightness;
        }
        let glyph_brightness = if p.volume_shading {
            ((brightness - 0.5) * VOLUME_GAIN + 0.5).clamp(0.0, 1.0)
        } else {
            brightness
        };

        // 8-9. Fond / vide, puis glyphe
        let empty = if p.volume_shading {
            EMPTY_THRESHOLD_VOLUME
        } else {
            EMPTY_THRESHOLD
        };
        let glyph = if raw_luma < BACKGROUND_LUMA || brightness < empty {
            0.0
        } else {
            self.glyphs.intensity(glyph_brightness, grid.local_uv(work))
        };

        // 10. Composition
        let mut rgb = if p.color_mode {
            self.tint.unwrap_or(cell_rgb) * glyph
        } else {
            Vec3::splat(brightness * glyph)
        };

        // 11-14. Post-traitements en espace écran
        rgb = apply_palette(rgb, p.color_palette);
        if p.mouse_glow_enabled {
            let dist = (uv * ctx.resolution).distance(ctx.mouse);
            rgb += (-dist / self.glow_radius).exp() * p.mouse_glow_intensity;
        }
        if p.scanline_intensity > 0.0 {
            let line = (uv.y * p.scanline_count * PI).sin() * 0.5 + 0.5;
            rgb *= 1.0 - line * p.scanline_intensity;
        }
        if p.vignette_intensity > 0.0 {
            let c = uv * 2.0 - 1.0;
            let v = 1.0 - c.dot(c) / self.vignette_radius;
            rgb *= lerp(1.0, v, p.vignette_intensity);
        }

        // 15. Alpha de la cellule
        rgb.extend(sample.w)
    }

    /// Courbure puis onde. `None` si la courbure sort de l'écran.
    #[inline]
    fn warp(&self, uv: Vec2, time: f32) -> Option<Vec2> {
        let p = self.params;
        let mut work = uv;
        if p.curvature > 0.0 {
            let mut c = work * 2.0 - 1.0;
            c *= 1.0 + p.curvature * c.dot(c);
            work = c * 0.5 + 0.5;
            if work.x < 0.0 || work.x > 1.0 || work.y < 0.0 || work.y > 1.0 {
                return None;
            }
        }
        if p.wave_amplitude > 0.0 {
            let phase = time * p.wave_speed;
            work.x += (work.y * p.wave_frequency + phase).sin() * p.wave_amplitude;
            work.y += (work.x * p.wave_frequency + phase).cos() * p.wave_amplitude;
        }
        Some(work)
    }

    /// Échantillon de cellule, séparé en R/G/B si l'aberration est active.
    #[inline]
    fn sample<S>(&self, image: &S, at: Vec2) -> Vec4
    where
        S: ColorSampler + ?Sized,
    {
        let offset = self.params.aberration_strength;
        if offset > 0.0 {
            let shift = Vec2::new(offset, 0.0);
            let center = image.sample(at);
            Vec4::new(
                image.sample(at + shift).x,
                center.y,
                image.sample(at - shift).z,
                center.w,
            )
        } else {
            image.sample(at)
        }
    }
}
