use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::error::CoreError;

/// Résolution de repli quand l'hôte rapporte une taille nulle.
pub const FALLBACK_RESOLUTION: (u32, u32) = (1920, 1080);

/// Côté maximal de la sortie, en pixels.
pub const MAX_OUTPUT_EXTENT: u32 = 16_384;

/// État du contexte de rendu, signalé explicitement par l'hôte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContextState {
    /// Le contexte est utilisable, la frame peut être évaluée.
    #[default]
    Ready,
    /// Contexte perdu : la frame entière doit être sautée.
    Lost,
}

/// Entrées asynchrones de l'hôte, figées au début de chaque frame.
///
/// # Example
/// ```
/// use ac_core::host::HostInputs;
/// let inputs = HostInputs::default();
/// assert_eq!(inputs.resolution, (1920, 1080));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HostInputs {
    /// Taille de sortie en pixels.
    pub resolution: (u32, u32),
    /// Position du pointeur en pixels, même orientation que l'image
    /// (origine en haut à gauche). Dernière valeur connue.
    pub mouse: (f32, f32),
    /// État du contexte de rendu.
    pub context: ContextState,
}

impl Default for HostInputs {
    fn default() -> Self {
        Self {
            resolution: FALLBACK_RESOLUTION,
            mouse: (0.0, 0.0),
            context: ContextState::Ready,
        }
    }
}

impl HostInputs {
    /// Vérifie que la résolution est rendable.
    ///
    /// # Errors
    /// [`CoreError::InvalidDimensions`] si un côté dépasse [`MAX_OUTPUT_EXTENT`].
    pub fn check_extent(&self) -> Result<(), CoreError> {
        let (width, height) = self.resolution;
        if width > MAX_OUTPUT_EXTENT || height > MAX_OUTPUT_EXTENT {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        Ok(())
    }
}

/// Boîte aux lettres des entrées hôte.
///
/// L'hôte publie depuis n'importe quel thread (pointeur, resize, perte de
/// contexte) ; le pipeline prend un instantané par frame avec
/// [`InputMailbox::snapshot`]. Une écriture en cours de frame n'est donc
/// visible qu'à la frame suivante.
///
/// # Example
/// ```
/// use ac_core::host::{ContextState, InputMailbox};
///
/// let mailbox = InputMailbox::default();
/// let frame = mailbox.snapshot();
/// mailbox.set_mouse(10.0, 20.0);
/// assert_eq!(frame.mouse, (0.0, 0.0));
/// assert_eq!(mailbox.snapshot().mouse, (10.0, 20.0));
/// ```
#[derive(Clone, Default)]
pub struct InputMailbox {
    inner: Arc<ArcSwap<HostInputs>>,
}

impl InputMailbox {
    /// Crée une boîte initialisée avec `inputs`.
    #[must_use]
    pub fn new(inputs: HostInputs) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(inputs)),
        }
    }

    /// Copie des entrées courantes, à prendre une fois par frame.
    #[must_use]
    pub fn snapshot(&self) -> HostInputs {
        **self.inner.load()
    }

    /// Nouvelle taille de sortie. Une taille nulle retombe sur
    /// [`FALLBACK_RESOLUTION`].
    pub fn set_resolution(&self, width: u32, height: u32) {
        let resolution = if width == 0 || height == 0 {
            log::debug!("Résolution nulle {width}x{height}, repli sur {FALLBACK_RESOLUTION:?}");
            FALLBACK_RESOLUTION
        } else {
            (width, height)
        };
        self.inner.rcu(|cur| HostInputs { resolution, ..**cur });
    }

    /// Nouvelle position du pointeur, en pixels.
    pub fn set_mouse(&self, x: f32, y: f32) {
        self.inner.rcu(|cur| HostInputs {
            mouse: (x, y),
            ..**cur
        });
    }

    /// Signale la perte ou la restauration du contexte de rendu.
    pub fn set_context(&self, context: ContextState) {
        let prev = self.inner.load().context;
        if prev != context {
            match context {
                ContextState::Lost => log::warn!("Contexte de rendu perdu, frames suspendues"),
                ContextState::Ready => log::info!("Contexte de rendu restauré"),
            }
        }
        self.inner.rcu(|cur| HostInputs { context, ..**cur });
    }
}
