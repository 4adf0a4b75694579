//! Conversion from relative `(chunk, position)` ids to flat integer ids.
//!
//! [`Triangulation::into_absolute`] consumes the relative form, so a
//! triangulation cannot be normalized twice.

use crate::classify::traits::{FaceGluing, GluingTable};
use crate::triangulation::generator::Triangulation;
use crate::triangulation::ids::{AbsoluteId, RelativeId};
use crate::triangulation::tetrahedron::{FaceSlot, Tetrahedron};

impl Triangulation<RelativeId> {
    /// Rewrites every tetrahedron id and face pairing as `chunk * (2s + p) + position`.
    #[must_use]
    pub fn into_absolute(self) -> Triangulation<AbsoluteId> {
        let ring = self.params.ring();
        let tets = self
            .tets
            .into_iter()
            .map(|tet| tet.map_ids(|id| AbsoluteId::from_relative(id, ring)))
            .collect();

        Triangulation {
            params: self.params,
            tets,
        }
    }
}

impl Triangulation<AbsoluteId> {
    /// The tetrahedron with flat id `id`.
    #[must_use]
    pub fn get(&self, id: AbsoluteId) -> Option<&Tetrahedron<AbsoluteId>> {
        self.tets.get(id.value())
    }

    /// The gluing table handed to classifiers, faces keyed by id.
    #[must_use]
    pub fn gluing_table(&self) -> GluingTable {
        let tetrahedra = self
            .tets
            .iter()
            .map(|tet| {
                FaceSlot::BY_ID.map(|slot| {
                    let face = tet.face(slot);
                    FaceGluing {
                        partner: face.pairing.value(),
                        perm: face.perm,
                    }
                })
            })
            .collect();
        GluingTable::new(tetrahedra)
    }
}
