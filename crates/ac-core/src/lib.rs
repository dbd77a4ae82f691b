/// Configuration, types, and shared structures for asciicrt.
///
/// This crate contains the effect parameter set, the temporal controller,
/// host-input snapshots and the sampling traits shared across the workspace.

pub mod charset;
pub mod clock;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod host;
pub mod traits;

pub use charset::Charset;
pub use clock::{Advance, TemporalController};
pub use config::EffectParams;
pub use error::CoreError;
pub use frame::FrameBuffer;
pub use host::{ContextState, HostInputs, InputMailbox};

/// Re-export des types vectoriels utilisés par le pipeline.
pub mod math {
    pub use glam::{Vec2, Vec3, Vec4};
}
