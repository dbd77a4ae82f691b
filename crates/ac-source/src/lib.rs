/// Source images for asciicrt: decoding from disk and resizing to the
/// output resolution.
pub mod image;
pub mod resize;

pub use crate::image::{ImageSource, load_image, save_png};
pub use crate::resize::{FitMode, Resizer};
