use std::path::{Path, PathBuf};
use std::sync::Arc;

use ac_ascii::atlas::GlyphAtlas;
use ac_ascii::compositor::render_frame;
use ac_ascii::driver::FrameDriver;
use ac_ascii::pipeline::PixelPipeline;
use ac_core::charset::Charset;
use ac_core::config::EffectParams;
use ac_core::frame::FrameBuffer;
use ac_core::host::InputMailbox;
use ac_core::traits::GlyphRasterizer;
use ac_source::image::{ImageSource, save_png};
use anyhow::{Context, Result};
use arc_swap::ArcSwap;

/// Atlas courant, reconstruit seulement quand le jeu de caractères ou la
/// taille de tuile change.
pub struct GlyphCache {
    rasterizer: Option<Box<dyn GlyphRasterizer + Send>>,
    key: Option<(String, u32)>,
    atlas: Option<GlyphAtlas>,
}

impl GlyphCache {
    /// Cache vide. Sans rasteriseur, les glyphes restent procéduraux.
    #[must_use]
    pub fn new(rasterizer: Option<Box<dyn GlyphRasterizer + Send>>) -> Self {
        Self {
            rasterizer,
            key: None,
            atlas: None,
        }
    }

    /// Atlas pour `params`, ou `None` si les glyphes sont procéduraux.
    ///
    /// Un atlas impossible à construire est journalisé et remplacé par les
    /// glyphes procéduraux.
    pub fn sync(&mut self, params: &EffectParams) -> Option<&GlyphAtlas> {
        let key = params
            .charset
            .as_ref()
            .map(|spec| (spec.clone(), params.glyph_tile_size));
        if key != self.key {
            self.atlas = key.as_ref().and_then(|(spec, tile)| self.build(spec, *tile));
            self.key = key;
        }
        self.atlas.as_ref()
    }

    fn build(&self, spec: &str, tile_size: u32) -> Option<GlyphAtlas> {
        let Some(rasterizer) = self.rasterizer.as_deref() else {
            log::warn!("Aucune police disponible pour l'atlas {spec:?}, glyphes procéduraux");
            return None;
        };
        match GlyphAtlas::build(&Charset::from_spec(spec), tile_size, rasterizer) {
            Ok(atlas) => {
                log::info!("Atlas {spec:?} : {} tuiles", atlas.tile_count());
                Some(atlas)
            }
            Err(e) => {
                log::warn!("Atlas indisponible ({e}), glyphes procéduraux");
                None
            }
        }
    }
}

/// Session de rendu hors ligne : une image, N frames, une séquence PNG.
pub struct Session {
    driver: FrameDriver,
    source: ImageSource,
    glyphs: GlyphCache,
    params: Arc<ArcSwap<EffectParams>>,
    /// Derniers paramètres acceptés par le pipeline.
    active: Arc<EffectParams>,
    frame_delta: f64,
    out: FrameBuffer,
}

/// Bilan d'une session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub written: u32,
    pub skipped: u32,
}

impl Session {
    /// Prépare une session et vérifie que les paramètres initiaux sont rendables.
    ///
    /// # Errors
    /// Returns an error if the initial parameters have no drawable glyph source.
    pub fn new(
        driver: FrameDriver,
        source: ImageSource,
        mut glyphs: GlyphCache,
        params: Arc<ArcSwap<EffectParams>>,
        host_fps: f64,
    ) -> Result<Self> {
        let active = params.load_full();
        PixelPipeline::new(&active, glyphs.sync(&active))
            .context("Paramètres initiaux non rendables")?;
        Ok(Self {
            driver,
            source,
            glyphs,
            params,
            active,
            frame_delta: 1.0 / host_fps,
            out: FrameBuffer::new(0, 0),
        })
    }

    /// Rend une frame. `None` si la frame est sautée : contexte perdu,
    /// résolution hors limites ou source impossible à redimensionner. La
    /// frame suivante réessaie.
    ///
    /// # Errors
    /// Returns an error if the active parameters no longer build a pipeline.
    pub fn render_next(&mut self) -> Result<Option<&FrameBuffer>> {
        let latest = self.params.load_full();
        if !Arc::ptr_eq(&latest, &self.active) {
            // Nouvelle config : ne l'adopter que si elle est rendable.
            let check = PixelPipeline::new(&latest, self.glyphs.sync(&latest)).map(|_| ());
            match check {
                Ok(()) => self.active = latest,
                Err(e) => log::warn!("Config rechargée ignorée : {e}"),
            }
        }
        let params = Arc::clone(&self.active);

        let Some(ctx) = self.driver.begin_frame(self.frame_delta, &params) else {
            return Ok(None);
        };
        let (w, h) = (ctx.resolution.x as u32, ctx.resolution.y as u32);
        let image = match self.source.frame_at(w, h) {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Frame sautée, source indisponible : {e:#}");
                return Ok(None);
            }
        };
        if (self.out.width, self.out.height) != (w, h) {
            self.out = FrameBuffer::new(w, h);
        }

        let atlas = self.glyphs.sync(&params);
        let pipeline = PixelPipeline::new(&params, atlas)?;
        render_frame(&pipeline, &ctx, &*image, &mut self.out);
        Ok(Some(&self.out))
    }

    /// Rend `frames` frames et les écrit dans `out_dir/frame_NNNNN.png`.
    ///
    /// # Errors
    /// Returns an error if the output directory cannot be created or a frame
    /// cannot be rendered or written.
    pub fn run(&mut self, frames: u32, out_dir: &Path) -> Result<RenderStats> {
        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("Impossible de créer {}", out_dir.display()))?;
        let mut stats = RenderStats::default();
        for index in 0..frames {
            match self.render_next()? {
                Some(frame) => {
                    save_png(frame, &frame_path(out_dir, index))?;
                    stats.written += 1;
                }
                None => stats.skipped += 1,
            }
        }
        log::info!(
            "{} frames écrites dans {} ({} sautées), t = {:.3}s",
            stats.written,
            out_dir.display(),
            stats.skipped,
            self.driver.clock().time()
        );
        Ok(stats)
    }

    /// Boîte aux lettres des entrées hôte de la session.
    #[must_use]
    pub fn mailbox(&self) -> &InputMailbox {
        self.driver.mailbox()
    }
}

/// Chemin de la frame `index` dans `dir`.
#[must_use]
pub fn frame_path(dir: &Path, index: u32) -> PathBuf {
    dir.join(format!("frame_{index:05}.png"))
}
