use ac_core::frame::FrameBuffer;
use anyhow::{Context, Result, bail};
use fast_image_resize::images::{Image, ImageRef};
use fast_image_resize::{PixelType, ResizeOptions, Resizer as FirResizer};

/// Adaptation du ratio d'aspect quand la source et la sortie diffèrent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FitMode {
    /// Étire la source sur toute la sortie.
    #[default]
    Stretch,
    /// Recadre la source au centre pour garder son ratio.
    Cover,
}

impl std::str::FromStr for FitMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stretch" => Ok(Self::Stretch),
            "cover" => Ok(Self::Cover),
            other => Err(format!("mode d'ajustement inconnu : {other}")),
        }
    }
}

/// Resizer réutilisable autour de fast_image_resize.
///
/// # Example
/// ```
/// use ac_source::resize::{FitMode, Resizer};
/// use ac_core::frame::FrameBuffer;
///
/// let mut r = Resizer::new(FitMode::Cover);
/// let src = FrameBuffer::filled(200, 100, [10, 20, 30, 255]);
/// let mut dst = FrameBuffer::new(50, 50);
/// r.resize_into(&src, &mut dst).unwrap();
/// let (r, g, b, _) = dst.pixel(25, 25);
/// assert!(r.abs_diff(10) <= 1 && g.abs_diff(20) <= 1 && b.abs_diff(30) <= 1);
/// ```
pub struct Resizer {
    inner: FirResizer,
    fit: FitMode,
}

impl Resizer {
    /// Crée un resizer avec le mode d'ajustement donné.
    #[must_use]
    pub fn new(fit: FitMode) -> Self {
        Self {
            inner: FirResizer::new(),
            fit,
        }
    }

    /// Redimensionne `src` dans `dst` ; la taille de `dst` fixe la sortie.
    ///
    /// # Errors
    /// Retourne une erreur si l'une des images est vide ou si le
    /// redimensionnement échoue.
    pub fn resize_into(&mut self, src: &FrameBuffer, dst: &mut FrameBuffer) -> Result<()> {
        if src.is_empty() || dst.is_empty() {
            bail!(
                "Redimensionnement impossible : {}x{} → {}x{}",
                src.width,
                src.height,
                dst.width,
                dst.height
            );
        }
        if src.width == dst.width && src.height == dst.height {
            dst.data.copy_from_slice(&src.data);
            return Ok(());
        }

        let src_image = ImageRef::new(src.width, src.height, &src.data, PixelType::U8x4)
            .context("Dimensions source invalides")?;
        let mut dst_image =
            Image::from_slice_u8(dst.width, dst.height, &mut dst.data, PixelType::U8x4)
                .context("Dimensions destination invalides")?;

        let options = match self.fit {
            FitMode::Stretch => ResizeOptions::new(),
            FitMode::Cover => ResizeOptions::new().fit_into_destination(Some((0.5, 0.5))),
        };
        self.inner
            .resize(&src_image, &mut dst_image, Some(&options))
            .context("Échec du redimensionnement")?;
        Ok(())
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new(FitMode::default())
    }
}
