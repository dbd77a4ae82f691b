use std::path::PathBuf;

use ac_core::config::EffectParams;
use ac_source::resize::FitMode;
use clap::Parser;

/// asciicrt : ASCII/CRT post-processing renderer.
///
/// Rend une image à travers N frames du pipeline et écrit une séquence PNG.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Image source (PNG, JPEG, BMP, GIF).
    #[arg(long)]
    pub image: PathBuf,

    /// Dossier de sortie des frames (frame_00000.png, ...).
    #[arg(short, long, default_value = "out")]
    pub out: PathBuf,

    /// Nombre de frames à rendre.
    #[arg(long, default_value_t = 1)]
    pub frames: u32,

    /// Cadence simulée de l'hôte : chaque frame avance l'horloge de 1/fps s.
    #[arg(long, default_value_t = 60.0)]
    pub fps: f64,

    /// Largeur de sortie. Défaut : largeur de l'image.
    #[arg(long)]
    pub width: Option<u32>,

    /// Hauteur de sortie. Défaut : hauteur de l'image.
    #[arg(long)]
    pub height: Option<u32>,

    /// Ajustement de l'image à la sortie : stretch ou cover.
    #[arg(long, default_value = "stretch")]
    pub fit: FitMode,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Charger un preset nommé (ignore --config).
    #[arg(long)]
    pub preset: Option<String>,

    /// Police TTF/OTF pour l'atlas. Défaut : police système, sinon DejaVu Sans Mono embarquée.
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Jeu de caractères de l'atlas : "terminal" ou une suite de glyphes.
    #[arg(long)]
    pub charset: Option<String>,

    /// FPS de quantification du temps (remplace la config). 0 = libre.
    #[arg(long)]
    pub target_fps: Option<f32>,

    /// Position du pointeur en pixels, "X,Y".
    #[arg(long, value_parser = parse_mouse)]
    pub mouse: Option<MousePos>,

    /// Recharger la config à chaud pendant le rendu.
    #[arg(long, default_value_t = false)]
    pub watch: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Position du pointeur passée en ligne de commande.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MousePos {
    pub x: f32,
    pub y: f32,
}

fn parse_mouse(s: &str) -> Result<MousePos, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("position attendue \"X,Y\", reçu {s:?}"))?;
    let coord = |v: &str| {
        v.trim()
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("coordonnée invalide : {v:?}"))
    };
    Ok(MousePos {
        x: coord(x)?,
        y: coord(y)?,
    })
}

impl Cli {
    /// Vérifie les valeurs que clap ne peut pas contraindre seul.
    ///
    /// # Errors
    /// Returns an error if the host frame rate is not a positive number.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.fps.is_finite() && self.fps > 0.0) {
            anyhow::bail!("--fps doit être > 0 (reçu {})", self.fps);
        }
        Ok(())
    }

    /// Surcharges CLI à réappliquer après chaque chargement de config.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            charset: self.charset.clone(),
            target_fps: self.target_fps,
        }
    }
}

/// Valeurs CLI prioritaires sur le fichier de configuration.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub charset: Option<String>,
    pub target_fps: Option<f32>,
}

impl Overrides {
    /// Applique les surcharges puis re-clampe.
    pub fn apply(&self, params: &mut EffectParams) {
        if let Some(ref charset) = self.charset {
            params.charset = Some(charset.clone());
        }
        if let Some(fps) = self.target_fps {
            params.target_fps = fps;
        }
        params.clamp_all();
    }
}
