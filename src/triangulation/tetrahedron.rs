//! Tetrahedron and face records.
//!
//! A [`Tetrahedron`] owns exactly four [`Face`]s, one per [`FaceSlot`]. Each
//! slot is named after the three vertices it contains and carries the id of
//! the vertex it excludes. Records are only produced by
//! [`TriangulationBuilder`](crate::triangulation::generator::TriangulationBuilder)
//! once every slot has a gluing, so a `Face` always has a partner.

use crate::triangulation::perm::Perm4;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four face slots of a tetrahedron.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FaceSlot {
    /// Face spanned by vertices 0, 1, 2 (excludes vertex 3)
    F012,
    /// Face spanned by vertices 0, 1, 3 (excludes vertex 2)
    F013,
    /// Face spanned by vertices 0, 2, 3 (excludes vertex 1)
    F023,
    /// Face spanned by vertices 1, 2, 3 (excludes vertex 0)
    F123,
}

impl FaceSlot {
    /// All slots in storage order.
    pub const ALL: [Self; 4] = [Self::F012, Self::F013, Self::F023, Self::F123];

    /// All slots ordered by face id 0..4.
    pub const BY_ID: [Self; 4] = [Self::F123, Self::F023, Self::F013, Self::F012];

    /// Id of the face: the vertex it excludes.
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::F012 => 3,
            Self::F013 => 2,
            Self::F023 => 1,
            Self::F123 => 0,
        }
    }

    /// Slot whose excluded vertex is `id`.
    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            3 => Some(Self::F012),
            2 => Some(Self::F013),
            1 => Some(Self::F023),
            0 => Some(Self::F123),
            _ => None,
        }
    }

    /// Position of the slot inside [`Tetrahedron::faces`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::F012 => 0,
            Self::F013 => 1,
            Self::F023 => 2,
            Self::F123 => 3,
        }
    }

    /// The slot a gluing under `perm` lands on in the partner tetrahedron.
    #[must_use]
    pub fn partner_slot(self, perm: Perm4) -> Self {
        // perm is a bijection of 0..4, so the image is always a valid id
        Self::from_id(perm.apply(self.id())).unwrap_or(self)
    }

    /// The three vertices spanning this face, ascending.
    #[must_use]
    pub const fn vertices(self) -> [u8; 3] {
        match self {
            Self::F012 => [0, 1, 2],
            Self::F013 => [0, 1, 3],
            Self::F023 => [0, 2, 3],
            Self::F123 => [1, 2, 3],
        }
    }
}

impl fmt::Display for FaceSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::F012 => "F012",
            Self::F013 => "F013",
            Self::F023 => "F023",
            Self::F123 => "F123",
        };
        f.write_str(name)
    }
}

/// One face of a tetrahedron and the face it is glued to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Face<I> {
    /// Which slot of the owning tetrahedron this is
    pub slot: FaceSlot,
    /// Tetrahedron on the other side
    pub pairing: I,
    /// Vertex map onto the partner tetrahedron
    pub perm: Perm4,
}

impl<I> Face<I> {
    /// Id of this face (the excluded vertex).
    #[must_use]
    pub const fn id(&self) -> u8 {
        self.slot.id()
    }

    /// Slot of the partner face.
    #[must_use]
    pub fn partner_slot(&self) -> FaceSlot {
        self.slot.partner_slot(self.perm)
    }

    pub(crate) fn map_pairing<J>(self, f: impl FnOnce(I) -> J) -> Face<J> {
        Face {
            slot: self.slot,
            pairing: f(self.pairing),
            perm: self.perm,
        }
    }
}

/// A tetrahedron with all four faces glued.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tetrahedron<I> {
    /// Identity of this tetrahedron
    pub id: I,
    faces: [Face<I>; 4],
}

impl<I: Copy> Tetrahedron<I> {
    pub(crate) const fn new(id: I, faces: [Face<I>; 4]) -> Self {
        Self { id, faces }
    }

    /// The face in `slot`.
    #[must_use]
    pub const fn face(&self, slot: FaceSlot) -> &Face<I> {
        &self.faces[slot.index()]
    }

    /// The face excluding vertex `id`, if `id` is a vertex.
    #[must_use]
    pub fn face_by_id(&self, id: u8) -> Option<&Face<I>> {
        FaceSlot::from_id(id).map(|slot| self.face(slot))
    }

    /// All four faces in slot order F012, F013, F023, F123.
    #[must_use]
    pub const fn faces(&self) -> &[Face<I>; 4] {
        &self.faces
    }

    pub(crate) fn map_ids<J: Copy>(self, f: impl Fn(I) -> J) -> Tetrahedron<J> {
        Tetrahedron {
            id: f(self.id),
            faces: self.faces.map(|face| face.map_pairing(&f)),
        }
    }
}
