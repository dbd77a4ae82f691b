/// ASCII/CRT pixel pipeline for asciicrt.
///
/// Maps every output pixel to a glyph intensity tinted by its cell color,
/// then applies the CRT post-effects.
pub mod atlas;
pub mod compositor;
pub mod driver;
pub mod glyph;
pub mod grid;
pub mod hash;
pub mod pipeline;

pub use atlas::GlyphAtlas;
pub use driver::FrameDriver;
pub use pipeline::{FrameContext, PixelPipeline};
