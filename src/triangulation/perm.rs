//! Permutations of the four vertex labels of a tetrahedron.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A permutation of `{0, 1, 2, 3}` stored as its image table.
///
/// `perm[i]` is the vertex of the partner tetrahedron that vertex `i` of the
/// source tetrahedron is identified with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u8; 4]", into = "[u8; 4]")]
pub struct Perm4([u8; 4]);

impl Perm4 {
    /// The identity permutation `(0,1,2,3)`.
    pub const IDENTITY: Self = Self([0, 1, 2, 3]);

    /// The transposition `(0,1,3,2)` swapping vertices 2 and 3.
    pub const SWAP_23: Self = Self([0, 1, 3, 2]);

    /// Builds a permutation from its image table, rejecting tables that are not bijections.
    #[must_use]
    pub fn new(images: [u8; 4]) -> Option<Self> {
        let mut seen = [false; 4];
        for &image in &images {
            let slot = seen.get_mut(usize::from(image))?;
            if *slot {
                return None;
            }
            *slot = true;
        }
        Some(Self(images))
    }

    /// Image of vertex `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i > 3`.
    #[must_use]
    pub const fn apply(self, i: u8) -> u8 {
        self.0[i as usize]
    }

    /// The inverse permutation.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn inverse(self) -> Self {
        let mut inv = [0u8; 4];
        let mut i = 0;
        while i < 4 {
            inv[self.0[i] as usize] = i as u8;
            i += 1;
        }
        Self(inv)
    }

    /// `self ∘ other`: apply `other` first, then `self`.
    #[must_use]
    pub const fn compose(self, other: Self) -> Self {
        Self([
            self.0[other.0[0] as usize],
            self.0[other.0[1] as usize],
            self.0[other.0[2] as usize],
            self.0[other.0[3] as usize],
        ])
    }

    /// Whether this is the identity.
    #[must_use]
    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }

    /// The image table.
    #[must_use]
    pub const fn images(self) -> [u8; 4] {
        self.0
    }
}

impl Default for Perm4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TryFrom<[u8; 4]> for Perm4 {
    type Error = String;

    fn try_from(images: [u8; 4]) -> Result<Self, Self::Error> {
        Self::new(images).ok_or_else(|| format!("{images:?} is not a permutation of 0..4"))
    }
}

impl From<Perm4> for [u8; 4] {
    fn from(perm: Perm4) -> Self {
        perm.0
    }
}

impl fmt::Display for Perm4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "({a}, {b}, {c}, {d})")
    }
}
