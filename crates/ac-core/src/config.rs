use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Jeu complet de paramètres d'effet, immuable pour les frames qu'il gouverne.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut inerte : avec
/// `EffectParams::default()` le pipeline se réduit à un quantificateur ASCII
/// couleur sans aucun effet.
///
/// # Example
/// ```
/// use ac_core::config::EffectParams;
/// let params = EffectParams::default();
/// assert_eq!(params.cell_size, 9.0);
/// assert!(params.invert);
/// ```
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct EffectParams {
    // === Grille & glyphes ===
    /// Côté d'une cellule en pixels de sortie.
    pub cell_size: f32,
    /// Inverser la luminosité (hautes lumières → glyphes clairsemés).
    pub invert: bool,
    /// Teinter les glyphes avec la couleur de la cellule (ou `tint_color`).
    pub color_mode: bool,
    /// Style procédural utilisé quand aucun atlas n'est lié.
    pub ascii_style: AsciiStyle,
    /// Jeu de caractères de l'atlas : "terminal" ou une suite de glyphes.
    /// `None` = glyphes procéduraux.
    pub charset: Option<String>,
    /// Côté d'une tuile d'atlas en pixels.
    pub glyph_tile_size: u32,
    /// Exagérer le contraste pour la sélection du glyphe (effet de volume).
    pub volume_shading: bool,
    /// Couleur fixe substituée à la couleur de scène.
    pub tint_color: Option<Tint>,

    // === Tonalité ===
    /// Offset de luminosité ajouté après le contraste.
    pub brightness_adjust: f32,
    /// Contraste autour de 0.5. 1.0 = neutre.
    pub contrast_adjust: f32,

    // === Temps ===
    /// FPS cible pour la quantification du temps. 0 = non quantifié.
    pub target_fps: f32,

    // === Perturbations de grille ===
    /// Amplitude du jitter, en cellules. 0 = désactivé.
    pub jitter_intensity: f32,
    /// Fréquence de renouvellement du jitter (ticks par seconde).
    pub jitter_speed: f32,
    /// Probabilité par ligne et par tick d'un décalage horizontal. 0 = désactivé.
    pub glitch_intensity: f32,
    /// Ticks de glitch par seconde. 0 = désactivé.
    pub glitch_frequency: f32,

    // === Pré-distorsion ===
    /// Courbure barillet de l'écran CRT. 0 = plat.
    pub curvature: f32,
    /// Amplitude de l'onde sinusoïdale (en UV). 0 = désactivée.
    pub wave_amplitude: f32,
    /// Fréquence spatiale de l'onde.
    pub wave_frequency: f32,
    /// Vitesse temporelle de l'onde.
    pub wave_speed: f32,
    /// Décalage horizontal R/B de l'aberration chromatique (en UV). 0 = désactivée.
    pub aberration_strength: f32,
    /// Intensité du bruit de film. 0 = désactivé.
    pub noise_intensity: f32,
    /// Échelle spatiale du bruit.
    pub noise_scale: f32,
    /// Vitesse d'animation du bruit.
    pub noise_speed: f32,

    // === Post-traitement ===
    /// Palette monochrome de phosphore.
    pub color_palette: ColorPalette,
    /// Active le halo autour du pointeur.
    pub mouse_glow_enabled: bool,
    /// Rayon de décroissance du halo, en pixels.
    pub mouse_glow_radius: f32,
    /// Intensité du halo.
    pub mouse_glow_intensity: f32,
    /// Assombrissement des scanlines [0.0, 1.0]. 0 = désactivé.
    pub scanline_intensity: f32,
    /// Nombre de lignes sur la hauteur de l'image.
    pub scanline_count: f32,
    /// Intensité du vignettage [0.0, 1.0]. 0 = désactivé.
    pub vignette_intensity: f32,
    /// Rayon du vignettage.
    pub vignette_radius: f32,
}

/// Style de glyphe procédural.
///
/// # Example
/// ```
/// use ac_core::config::AsciiStyle;
/// assert!(matches!(AsciiStyle::default(), AsciiStyle::Standard));
/// ```
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AsciiStyle {
    /// Paliers dégradés : point, bloc 2×2, barres, bloc bordé.
    #[default]
    Standard,
    /// Déclaré, sans forme procédurale.
    Dense,
    /// Déclaré, sans forme procédurale.
    Minimal,
    /// Déclaré, sans forme procédurale.
    Blocks,
}

/// Palette de phosphore appliquée après composition.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorPalette {
    /// Couleurs de la scène conservées.
    #[default]
    None,
    /// Phosphore vert P1.
    Green,
    /// Phosphore ambre.
    Amber,
    /// Cyan.
    Cyan,
    /// Bleu.
    Blue,
}

/// Couleur de teinte RGB normalisée, écrite `"#RRGGBB"` en TOML.
///
/// # Example
/// ```
/// use ac_core::config::Tint;
/// let tint: Tint = "#917AFF".parse().unwrap();
/// assert!((tint.r - 145.0 / 255.0).abs() < 1e-6);
/// assert_eq!(String::from(tint), "#917AFF");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tint {
    /// Rouge [0.0, 1.0].
    pub r: f32,
    /// Vert [0.0, 1.0].
    pub g: f32,
    /// Bleu [0.0, 1.0].
    pub b: f32,
}

impl std::str::FromStr for Tint {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(CoreError::Config(format!("teinte invalide : {s}")));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map(|v| f32::from(v) / 255.0)
                .map_err(|_| CoreError::Config(format!("teinte invalide : {s}")))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

impl TryFrom<String> for Tint {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Tint> for String {
    fn from(t: Tint) -> Self {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02X}{:02X}{:02X}", q(t.r), q(t.g), q(t.b))
    }
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            cell_size: 9.0,
            invert: true,
            color_mode: true,
            ascii_style: AsciiStyle::Standard,
            charset: None,
            glyph_tile_size: 64,
            volume_shading: false,
            tint_color: None,
            brightness_adjust: 0.0,
            contrast_adjust: 1.0,
            target_fps: 0.0,
            jitter_intensity: 0.0,
            jitter_speed: 1.0,
            glitch_intensity: 0.0,
            glitch_frequency: 0.0,
            curvature: 0.0,
            wave_amplitude: 0.0,
            wave_frequency: 10.0,
            wave_speed: 1.0,
            aberration_strength: 0.0,
            noise_intensity: 0.0,
            noise_scale: 1.0,
            noise_speed: 1.0,
            color_palette: ColorPalette::None,
            mouse_glow_enabled: false,
            mouse_glow_radius: 200.0,
            mouse_glow_intensity: 1.5,
            scanline_intensity: 0.0,
            scanline_count: 200.0,
            vignette_intensity: 0.0,
            vignette_radius: 0.8,
        }
    }
}

impl EffectParams {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    ///
    /// Les valeurs non finies retombent sur le défaut du champ.
    pub fn clamp_all(&mut self) {
        let d = Self::default();
        let fin = |v: f32, default: f32| if v.is_finite() { v } else { default };

        self.cell_size = fin(self.cell_size, d.cell_size).clamp(1.0, 256.0);
        self.glyph_tile_size = self.glyph_tile_size.clamp(4, 512);
        self.brightness_adjust = fin(self.brightness_adjust, 0.0).clamp(-1.0, 1.0);
        self.contrast_adjust = fin(self.contrast_adjust, 1.0).clamp(0.0, 5.0);
        self.target_fps = fin(self.target_fps, 0.0).clamp(0.0, 240.0);
        self.jitter_intensity = fin(self.jitter_intensity, 0.0).clamp(0.0, 10.0);
        self.jitter_speed = fin(self.jitter_speed, d.jitter_speed).clamp(0.0, 120.0);
        self.glitch_intensity = fin(self.glitch_intensity, 0.0).clamp(0.0, 1.0);
        self.glitch_frequency = fin(self.glitch_frequency, 0.0).clamp(0.0, 120.0);
        self.curvature = fin(self.curvature, 0.0).clamp(0.0, 2.0);
        self.wave_amplitude = fin(self.wave_amplitude, 0.0).clamp(0.0, 0.5);
        self.wave_frequency = fin(self.wave_frequency, d.wave_frequency).clamp(0.0, 1000.0);
        self.wave_speed = fin(self.wave_speed, d.wave_speed).clamp(-100.0, 100.0);
        self.aberration_strength = fin(self.aberration_strength, 0.0).clamp(0.0, 0.1);
        self.noise_intensity = fin(self.noise_intensity, 0.0).clamp(0.0, 2.0);
        self.noise_scale = fin(self.noise_scale, d.noise_scale).clamp(0.0, 10_000.0);
        self.noise_speed = fin(self.noise_speed, d.noise_speed).clamp(-100.0, 100.0);
        self.mouse_glow_radius = fin(self.mouse_glow_radius, d.mouse_glow_radius).clamp(1.0, 10_000.0);
        self.mouse_glow_intensity = fin(self.mouse_glow_intensity, d.mouse_glow_intensity).clamp(0.0, 10.0);
        self.scanline_intensity = fin(self.scanline_intensity, 0.0).clamp(0.0, 1.0);
        self.scanline_count = fin(self.scanline_count, d.scanline_count).clamp(0.0, 4096.0);
        self.vignette_intensity = fin(self.vignette_intensity, 0.0).clamp(0.0, 1.0);
        self.vignette_radius = fin(self.vignette_radius, d.vignette_radius).clamp(0.01, 10.0);
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    render: Option<RenderSection>,
    glyphs: Option<GlyphSection>,
    postfx: Option<PostFxSection>,
}

/// Render section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct RenderSection {
    cell_size: Option<f32>,
    invert: Option<bool>,
    color_mode: Option<bool>,
    ascii_style: Option<AsciiStyle>,
    volume_shading: Option<bool>,
    tint_color: Option<Tint>,
    brightness_adjust: Option<f32>,
    contrast_adjust: Option<f32>,
    target_fps: Option<f32>,
}

/// Glyph atlas section.
#[derive(Deserialize)]
struct GlyphSection {
    charset: Option<String>,
    tile_size: Option<u32>,
}

/// Post-processing section, one key per effect.
#[derive(Deserialize)]
struct PostFxSection {
    jitter_intensity: Option<f32>,
    jitter_speed: Option<f32>,
    glitch_intensity: Option<f32>,
    glitch_frequency: Option<f32>,
    curvature: Option<f32>,
    wave_amplitude: Option<f32>,
    wave_frequency: Option<f32>,
    wave_speed: Option<f32>,
    aberration_strength: Option<f32>,
    noise_intensity: Option<f32>,
    noise_scale: Option<f32>,
    noise_speed: Option<f32>,
    color_palette: Option<ColorPalette>,
    mouse_glow_enabled: Option<bool>,
    mouse_glow_radius: Option<f32>,
    mouse_glow_intensity: Option<f32>,
    scanline_intensity: Option<f32>,
    scanline_count: Option<f32>,
    vignette_intensity: Option<f32>,
    vignette_radius: Option<f32>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use ac_core::config::load_config;
/// use std::path::Path;
/// let params = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<EffectParams> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content)
        .with_context(|| format!("Erreur de parsing TOML dans {}", path.display()))
}

/// Parse un document TOML déjà en mémoire.
///
/// # Errors
/// Returns an error if the document is not valid TOML for this schema.
///
/// # Example
/// ```
/// use ac_core::config::{parse_config, ColorPalette};
/// let params = parse_config("[postfx]\ncolor_palette = \"amber\"\n").unwrap();
/// assert_eq!(params.color_palette, ColorPalette::Amber);
/// ```
#[allow(clippy::too_many_lines)]
pub fn parse_config(content: &str) -> Result<EffectParams> {
    let file: ConfigFile = toml::from_str(content)?;
    let mut config = EffectParams::default();

    if let Some(r) = file.render {
        if let Some(v) = r.cell_size {
            config.cell_size = v;
        }
        if let Some(v) = r.invert {
            config.invert = v;
        }
        if let Some(v) = r.color_mode {
            config.color_mode = v;
        }
        if let Some(v) = r.ascii_style {
            config.ascii_style = v;
        }
        if let Some(v) = r.volume_shading {
            config.volume_shading = v;
        }
        if let Some(v) = r.tint_color {
            config.tint_color = Some(v);
        }
        if let Some(v) = r.brightness_adjust {
            config.brightness_adjust = v;
        }
        if let Some(v) = r.contrast_adjust {
            config.contrast_adjust = v;
        }
        if let Some(v) = r.target_fps {
            config.target_fps = v;
        }
    }

    if let Some(g) = file.glyphs {
        if let Some(v) = g.charset {
            config.charset = Some(v);
        }
        if let Some(v) = g.tile_size {
            config.glyph_tile_size = v;
        }
    }

    if let Some(p) = file.postfx {
        if let Some(v) = p.jitter_intensity {
            config.jitter_intensity = v;
        }
        if let Some(v) = p.jitter_speed {
            config.jitter_speed = v;
        }
        if let Some(v) = p.glitch_intensity {
            config.glitch_intensity = v;
        }
        if let Some(v) = p.glitch_frequency {
            config.glitch_frequency = v;
        }
        if let Some(v) = p.curvature {
            config.curvature = v;
        }
        if let Some(v) = p.wave_amplitude {
            config.wave_amplitude = v;
        }
        if let Some(v) = p.wave_frequency {
            config.wave_frequency = v;
        }
        if let Some(v) = p.wave_speed {
            config.wave_speed = v;
        }
        if let Some(v) = p.aberration_strength {
            config.aberration_strength = v;
        }
        if let Some(v) = p.noise_intensity {
            config.noise_intensity = v;
        }
        if let Some(v) = p.noise_scale {
            config.noise_scale = v;
        }
        if let Some(v) = p.noise_speed {
            config.noise_speed = v;
        }
        if let Some(v) = p.color_palette {
            config.color_palette = v;
        }
        if let Some(v) = p.mouse_glow_enabled {
            config.mouse_glow_enabled = v;
        }
        if let Some(v) = p.mouse_glow_radius {
            config.mouse_glow_radius = v;
        }
        if let Some(v) = p.mouse_glow_intensity {
            config.mouse_glow_intensity = v;
        }
        if let Some(v) = p.scanline_intensity {
            config.scanline_intensity = v;
        }
        if let Some(v) = p.scanline_count {
            config.scanline_count = v;
        }
        if let Some(v) = p.vignette_intensity {
            config.vignette_intensity = v;
        }
        if let Some(v) = p.vignette_radius {
            config.vignette_radius = v;
        }
    }

    config.clamp_all();
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_inert() {
        let p = EffectParams::default();
        assert_eq!(p.jitter_intensity, 0.0);
        assert_eq!(p.glitch_intensity, 0.0);
        assert_eq!(p.curvature, 0.0);
        assert_eq!(p.wave_amplitude, 0.0);
        assert_eq!(p.aberration_strength, 0.0);
        assert_eq!(p.noise_intensity, 0.0);
        assert_eq!(p.scanline_intensity, 0.0);
        assert_eq!(p.vignette_intensity, 0.0);
        assert!(!p.mouse_glow_enabled);
        assert_eq!(p.color_palette, ColorPalette::None);
        assert_eq!(p.brightness_adjust, 0.0);
        assert_eq!(p.contrast_adjust, 1.0);
        assert!(p.tint_color.is_none());
        assert!(p.charset.is_none());
    }

    #[test]
    fn empty_document_yields_defaults() {
        let p = parse_config("").unwrap();
        assert_eq!(p, EffectParams::default());
    }

    #[test]
    fn partial_sections_merge_onto_defaults() {
        let doc = r##"
            [render]
            cell_size = 12.0
            volume_shading = true
            tint_color = "#917AFF"
            ascii_style = "dense"

            [glyphs]
            charset = "terminal"

            [postfx]
            scanline_intensity = 0.25
            color_palette = "green"
        "##;
        let p = parse_config(doc).unwrap();
        assert_eq!(p.cell_size, 12.0);
        assert!(p.volume_shading);
        assert_eq!(p.ascii_style, AsciiStyle::Dense);
        assert_eq!(p.charset.as_deref(), Some("terminal"));
        assert_eq!(p.scanline_intensity, 0.25);
        assert_eq!(p.color_palette, ColorPalette::Green);
        assert_eq!(p.scanline_count, 200.0);
        let tint = p.tint_color.unwrap();
        assert!((tint.b - 1.0).abs() < 1e-6);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let doc = "[render]\ncell_size = 0.0\ntarget_fps = -5.0\n[postfx]\nglitch_intensity = 3.0\nmouse_glow_radius = 0.0\n";
        let p = parse_config(doc).unwrap();
        assert_eq!(p.cell_size, 1.0);
        assert_eq!(p.target_fps, 0.0);
        assert_eq!(p.glitch_intensity, 1.0);
        assert_eq!(p.mouse_glow_radius, 1.0);
    }

    #[test]
    fn non_finite_values_fall_back_to_defaults() {
        let mut p = EffectParams {
            cell_size: f32::NAN,
            contrast_adjust: f32::INFINITY,
            ..EffectParams::default()
        };
        p.clamp_all();
        assert_eq!(p.cell_size, 9.0);
        assert_eq!(p.contrast_adjust, 1.0);
    }

    #[test]
    fn bad_tint_is_rejected() {
        assert!("#12".parse::<Tint>().is_err());
        assert!("#GGGGGG".parse::<Tint>().is_err());
        assert!(parse_config("[render]\ntint_color = \"nope\"\n").is_err());
    }

    #[test]
    fn load_config_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crt.toml");
        std::fs::write(&path, "[postfx]\nvignette_intensity = 0.5\n").unwrap();
        let p = load_config(&path).unwrap();
        assert_eq!(p.vignette_intensity, 0.5);
        assert!(load_config(&dir.path().join("missing.toml")).is_err());
    }
}
