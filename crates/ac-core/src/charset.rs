/// 16 symboles ASCII, du plus clairsemé au plus dense.
pub const TERMINAL_SYMBOLS: [char; 16] = [
    '.', ':', '-', '=', '+', '*', '#', '%', '@', '0', 'O', 'N', 'M', 'W', 'B', 'X',
];

/// Nom du preset désignant [`TERMINAL_SYMBOLS`].
pub const TERMINAL: &str = "terminal";

/// Suite ordonnée de glyphes pour construire un atlas, du plus clair au plus dense.
///
/// # Example
/// ```
/// use ac_core::charset::Charset;
/// let cs = Charset::from_spec("terminal");
/// assert_eq!(cs.len(), 16);
/// assert_eq!(Charset::from_spec(" .#").chars(), &[' ', '.', '#']);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Charset {
    chars: Vec<char>,
}

impl Charset {
    /// Le jeu terminal par défaut.
    #[must_use]
    pub fn terminal() -> Self {
        Self {
            chars: TERMINAL_SYMBOLS.to_vec(),
        }
    }

    /// Interprète une valeur de config : `"terminal"` (insensible à la casse)
    /// ou une suite littérale de glyphes, un glyphe par `char`.
    ///
    /// Un glyphe est une seule valeur scalaire Unicode : les rasteriseurs
    /// dessinent sans mise en forme de texte. Les grappes de plusieurs points
    /// de code (marques combinantes, séquences ZWJ) ne forment donc pas un
    /// glyphe ; chaque point de code devient sa propre tuile, et une forme
    /// précomposée (`é` U+00E9) est à préférer.
    #[must_use]
    pub fn from_spec(spec: &str) -> Self {
        if spec.eq_ignore_ascii_case(TERMINAL) {
            Self::terminal()
        } else {
            Self {
                chars: spec.chars().collect(),
            }
        }
    }

    /// Glyphes dans l'ordre de densité croissante.
    #[must_use]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Nombre de glyphes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// `true` si aucun glyphe.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

impl From<Vec<char>> for Charset {
    fn from(chars: Vec<char>) -> Self {
        Self { chars }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_alias_is_case_insensitive() {
        assert_eq!(Charset::from_spec("TERMINAL"), Charset::terminal());
    }

    #[test]
    fn literal_spec_keeps_order_and_unicode() {
        let cs = Charset::from_spec("░▒▓█");
        assert_eq!(cs.chars(), &['░', '▒', '▓', '█']);
    }

    #[test]
    fn clusters_split_into_scalar_glyphs() {
        // e + accent aigu combinant : deux tuiles, pas une.
        let cs = Charset::from_spec("e\u{301}#");
        assert_eq!(cs.chars(), &['e', '\u{301}', '#']);
        // La forme précomposée reste un seul glyphe.
        assert_eq!(Charset::from_spec("\u{e9}#").len(), 2);
    }

    #[test]
    fn empty_spec_is_empty() {
        assert!(Charset::from_spec("").is_empty());
    }
}
