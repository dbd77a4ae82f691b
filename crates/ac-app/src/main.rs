use std::path::{Path, PathBuf};
use std::sync::Arc;

use ac_ascii::driver::FrameDriver;
use ac_core::config::EffectParams;
use ac_core::host::InputMailbox;
use ac_core::traits::GlyphRasterizer;
use ac_glyph::FontRasterizer;
use ac_source::image::ImageSource;
use anyhow::Result;
use arc_swap::ArcSwap;
use clap::Parser;

pub mod cli;
pub mod hotreload;
pub mod render;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    cli.validate()?;

    // 3. Charger la config, appliquer les overrides CLI
    let overrides = cli.overrides();
    let (mut params, config_path) = resolve_config(&cli)?;
    overrides.apply(&mut params);
    let params = Arc::new(ArcSwap::from_pointee(params));

    // 4. Hot-reload (thread interne notify)
    let _watcher = match (cli.watch, config_path.as_deref()) {
        (true, Some(path)) => Some(hotreload::spawn_config_watcher(path, &params, overrides)?),
        (true, None) => {
            log::warn!("--watch ignoré : aucun fichier de config chargé");
            None
        }
        (false, _) => None,
    };

    // 5. Source et entrées hôte
    let source = ImageSource::open(&cli.image, cli.fit)?;
    let (native_w, native_h) = source.native_size();
    let mailbox = InputMailbox::default();
    mailbox.set_resolution(cli.width.unwrap_or(native_w), cli.height.unwrap_or(native_h));
    if let Some(mouse) = cli.mouse {
        mailbox.set_mouse(mouse.x, mouse.y);
    }

    // 6. Glyphes : police explicite, système ou embarquée
    let glyphs = render::GlyphCache::new(Some(load_font(cli.font.as_deref())?));

    // 7. Rendu
    let mut session = render::Session::new(FrameDriver::new(mailbox), source, glyphs, params, cli.fps)?;
    let stats = session.run(cli.frames, &cli.out)?;
    println!(
        "{} frame(s) écrite(s) dans {}",
        stats.written,
        cli.out.display()
    );
    Ok(())
}

/// Police de l'atlas : police explicite, sinon police système, sinon la
/// police embarquée. Une police explicite invalide est une erreur.
fn load_font(path: Option<&Path>) -> Result<Box<dyn GlyphRasterizer + Send>> {
    let font = match path {
        Some(path) => FontRasterizer::from_file(path)?,
        None => match FontRasterizer::from_system() {
            Some(font) => font,
            None => {
                log::info!("Aucune police système trouvée, police embarquée");
                FontRasterizer::embedded()?
            }
        },
    };
    Ok(Box::new(font))
}

/// Resolve config: preset takes priority over --config.
///
/// Retourne aussi le fichier effectivement chargé, pour le hot reload.
fn resolve_config(cli: &cli::Cli) -> Result<(EffectParams, Option<PathBuf>)> {
    resolve_config_in(Path::new("."), cli.preset.as_deref(), &cli.config)
}

fn resolve_config_in(
    root: &Path,
    preset: Option<&str>,
    config: &Path,
) -> Result<(EffectParams, Option<PathBuf>)> {
    if let Some(name) = preset {
        let path = root.join(format!("config/presets/{name}.toml"));
        if path.exists() {
            Ok((ac_core::config::load_config(&path)?, Some(path)))
        } else {
            anyhow::bail!("Preset inconnu : {name}. Voir config/presets/ (ex: crt, tiger)");
        }
    } else {
        let path = if config.is_absolute() {
            config.to_path_buf()
        } else {
            root.join(config)
        };
        if path.exists() {
            Ok((ac_core::config::load_config(&path)?, Some(path)))
        } else {
            log::warn!("Config introuvable : {}. Utilisation des défauts.", path.display());
            Ok((EffectParams::default(), None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ac_core::config::ColorPalette;

    #[test]
    fn preset_wins_over_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("config/presets")).unwrap();
        std::fs::write(
            dir.path().join("config/presets/amber.toml"),
            "[postfx]\ncolor_palette = \"amber\"\n",
        )
        .unwrap();
        let (params, path) =
            resolve_config_in(dir.path(), Some("amber"), Path::new("config/default.toml")).unwrap();
        assert_eq!(params.color_palette, ColorPalette::Amber);
        assert!(path.is_some());
    }

    #[test]
    fn unknown_preset_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve_config_in(dir.path(), Some("nope"), Path::new("x.toml")).is_err());
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (params, path) = resolve_config_in(dir.path(), None, Path::new("missing.toml")).unwrap();
        assert_eq!(params, EffectParams::default());
        assert!(path.is_none());
    }

    #[test]
    fn shipped_presets_parse() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
        for name in ["crt", "tiger"] {
            let (params, _) =
                resolve_config_in(&root, Some(name), Path::new("config/default.toml")).unwrap();
            assert_ne!(params, EffectParams::default(), "{name}");
        }
        let (params, path) = resolve_config_in(&root, None, Path::new("config/default.toml")).unwrap();
        assert!(path.is_some());
        assert_eq!(params, EffectParams::default());
    }

    #[test]
    fn explicit_font_must_be_valid() {
        assert!(load_font(Some(Path::new("/nonexistent/font.ttf"))).is_err());
    }

    #[test]
    fn default_font_always_builds_an_atlas() {
        let font = load_font(None).unwrap();
        let mut cache = render::GlyphCache::new(Some(font));
        let params = EffectParams {
            charset: Some("terminal".into()),
            glyph_tile_size: 16,
            ..EffectParams::default()
        };
        let atlas = cache.sync(&params).unwrap();
        assert_eq!(atlas.tile_count(), 16);
    }
}
