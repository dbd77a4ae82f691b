use thiserror::Error;

use crate::config::AsciiStyle;

/// Errors originating from the core module.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// Atlas requested from an empty character sequence.
    #[error("Jeu de caractères vide : impossible de construire l'atlas")]
    EmptyCharset,

    /// The atlas strip cannot be allocated for these dimensions.
    #[error("Surface d'atlas impossible : {tiles} tuiles de {tile_size}px")]
    AtlasSurface {
        /// Number of requested tiles.
        tiles: usize,
        /// Tile edge in pixels.
        tile_size: u32,
    },

    /// Font data could not be parsed.
    #[error("Police invalide : {0}")]
    Font(String),

    /// Style with no procedural glyph shape and no atlas bound.
    #[error("Style ASCII sans glyphe procédural : {0:?}")]
    UnsupportedStyle(AsciiStyle),

    /// Invalid width/height dimensions.
    #[error("Dimensions invalides : {width}×{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },
}
