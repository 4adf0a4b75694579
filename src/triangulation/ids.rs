//! Tetrahedron identifiers.
//!
//! Tetrahedra are addressed in two coordinate systems. During generation a
//! tetrahedron is named by its chunk and its position within the chunk's
//! ring ([`RelativeId`]). External consumers expect flat integer indices
//! ([`AbsoluteId`]), obtained through `chunk * ring + position` where `ring`
//! is the chunk length `2s + p`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// `(chunk, position)` address used while the pairing rules run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelativeId {
    /// Chunk index in `0..2n`
    pub chunk: usize,
    /// Position within the chunk ring in `0..2s+p`
    pub position: usize,
}

impl RelativeId {
    /// Creates a relative id.
    #[must_use]
    pub const fn new(chunk: usize, position: usize) -> Self {
        Self { chunk, position }
    }

    /// Decodes a flat id back into `(chunk, position)` for rings of length `ring`.
    ///
    /// # Panics
    ///
    /// Panics if `ring` is zero; a zero-length ring has no tetrahedra to address.
    #[must_use]
    pub const fn from_absolute(id: AbsoluteId, ring: usize) -> Self {
        Self {
            chunk: id.0 / ring,
            position: id.0 % ring,
        }
    }

    /// Whether this id names the front hemisphere (`chunk < n`).
    #[must_use]
    pub const fn is_front(&self, n: usize) -> bool {
        self.chunk < n
    }
}

impl fmt::Display for RelativeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.chunk, self.position)
    }
}

/// Flat tetrahedron index handed to classifiers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AbsoluteId(pub usize);

impl AbsoluteId {
    /// Flattens a relative id for rings of length `ring`.
    #[must_use]
    pub const fn from_relative(id: RelativeId, ring: usize) -> Self {
        Self(id.chunk * ring + id.position)
    }

    /// The raw index.
    #[must_use]
    pub const fn value(self) -> usize {
        self.0
    }
}

impl fmt::Display for AbsoluteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
