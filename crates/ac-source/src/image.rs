use std::path::Path;
use std::sync::Arc;

use ac_core::frame::FrameBuffer;
use anyhow::{Context, Result};

use crate::resize::{FitMode, Resizer};

/// Décode une image (PNG, JPEG, BMP, GIF) en RGBA8.
///
/// # Errors
/// Retourne une erreur si le fichier est illisible ou le format inconnu.
///
/// # Example
/// ```no_run
/// use ac_source::image::load_image;
/// use std::path::Path;
/// let frame = load_image(Path::new("scene.png")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<FrameBuffer> {
    let img = image::open(path).with_context(|| format!("Impossible de charger {}", path.display()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    log::debug!("Image chargée : {} ({width}x{height})", path.display());
    Ok(FrameBuffer {
        data: rgba.into_raw(),
        width,
        height,
    })
}

/// Écrit un `FrameBuffer` en PNG RGBA.
///
/// # Errors
/// Retourne une erreur si le buffer est incohérent ou l'écriture échoue.
pub fn save_png(frame: &FrameBuffer, path: &Path) -> Result<()> {
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("Impossible d'écrire {}", path.display()))
}

/// Image statique servie à la résolution de sortie courante.
///
/// Le redimensionnement n'est refait que si la résolution demandée change.
///
/// # Example
/// ```
/// use ac_source::image::ImageSource;
/// use ac_source::resize::FitMode;
/// use ac_core::frame::FrameBuffer;
///
/// let mut source = ImageSource::from_frame(FrameBuffer::filled(8, 8, [9, 9, 9, 255]), FitMode::Stretch);
/// let a = source.frame_at(4, 4).unwrap();
/// let b = source.frame_at(4, 4).unwrap();
/// assert!(std::sync::Arc::ptr_eq(&a, &b));
/// assert_eq!(source.native_size(), (8, 8));
/// ```
pub struct ImageSource {
    original: Arc<FrameBuffer>,
    resizer: Resizer,
    cached: Option<Arc<FrameBuffer>>,
}

impl ImageSource {
    /// Charge une image depuis le disque.
    ///
    /// # Errors
    /// Voir [`load_image`].
    pub fn open(path: &Path, fit: FitMode) -> Result<Self> {
        Ok(Self::from_frame(load_image(path)?, fit))
    }

    /// Source à partir d'un buffer déjà décodé.
    #[must_use]
    pub fn from_frame(frame: FrameBuffer, fit: FitMode) -> Self {
        Self {
            original: Arc::new(frame),
            resizer: Resizer::new(fit),
            cached: None,
        }
    }

    /// Taille de l'image décodée.
    #[must_use]
    pub fn native_size(&self) -> (u32, u32) {
        (self.original.width, self.original.height)
    }

    /// Image à la taille `width`×`height`.
    ///
    /// # Errors
    /// Retourne une erreur si le redimensionnement échoue (taille nulle).
    pub fn frame_at(&mut self, width: u32, height: u32) -> Result<Arc<FrameBuffer>> {
        if (width, height) == self.native_size() {
            return Ok(Arc::clone(&self.original));
        }
        if let Some(cached) = self.cached.as_ref().filter(|c| (c.width, c.height) == (width, height)) {
            return Ok(Arc::clone(cached));
        }
        let mut dst = FrameBuffer::new(width, height);
        self.resizer.resize_into(&self.original, &mut dst)?;
        log::debug!(
            "Source redimensionnée {}x{} → {width}x{height}",
            self.original.width,
            self.original.height
        );
        let frame = Arc::new(dst);
        self.cached = Some(Arc::clone(&frame));
        Ok(frame)
    }
}
