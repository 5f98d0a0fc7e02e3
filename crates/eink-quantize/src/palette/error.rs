use std::fmt;

/// Why a set of colors cannot be used as a palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    EmptyPalette,
    /// Entry `index` repeats an earlier color.
    DuplicateColor { index: usize },
    /// Indices must fit in one nibble of the packed buffer.
    TooManyColors { count: usize, max: usize },
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteError::EmptyPalette => f.write_str("palette has no colors"),
            PaletteError::DuplicateColor { index } => {
                write!(f, "palette entry {} repeats an earlier color", index)
            }
            PaletteError::TooManyColors { count, max } => write!(
                f,
                "palette has {} colors but a packed pixel addresses at most {}",
                count, max
            ),
        }
    }
}

impl std::error::Error for PaletteError {}
