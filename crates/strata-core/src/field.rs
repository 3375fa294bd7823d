//! Field definitions.

use std::fmt;

/// Where a field's values live on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Centering {
    /// One value per cell.
    Cell,
    /// One value per face, for every face orientation.
    Face,
}

impl fmt::Display for Centering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cell => write!(f, "cell"),
            Self::Face => write!(f, "face"),
        }
    }
}

/// A named quantity with a fixed component depth and centering.
///
/// Identity is the name; depth and centering are fixed once the field
/// is registered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    /// Unique field name.
    pub name: String,
    /// Number of components.
    pub depth: usize,
    /// Grid location of the values.
    pub centering: Centering,
}

impl FieldDef {
    /// A cell-centered field.
    pub fn cell(name: impl Into<String>, depth: usize) -> Self {
        Self {
            name: name.into(),
            depth,
            centering: Centering::Cell,
        }
    }

    /// A face-centered field.
    pub fn face(name: impl Into<String>, depth: usize) -> Self {
        Self {
            name: name.into(),
            depth,
            centering: Centering::Face,
        }
    }
}
