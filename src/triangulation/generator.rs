//! Triangulation generator.
//!
//! Builds a grid of `2n` chunks, each a closed ring of `2s + p` tetrahedra,
//! and glues every face slot according to one of four rules:
//!
//! - **F012** (ring-previous): `(c, t)` glues to `(c, t-1)` under `(0,1,3,2)`
//! - **F013** (ring-next): `(c, t)` glues to `(c, t+1)` under `(0,1,3,2)`
//! - **F023** (cross-chunk), by position:
//!   - `t < s`: neighbouring chunk `c-1` in the same hemisphere, mirrored position
//!     `2s+p-1-t`, under `(0,1,3,2)`
//!   - `s <= t < s+p`: mirror chunk `c+n` in the other hemisphere, same position,
//!     identity permutation
//!   - `t >= s+p`: neighbouring chunk `c+1` in the same hemisphere, mirrored position,
//!     under `(0,1,3,2)`
//! - **F123** (hemisphere shift): front chunk `c` glues to back chunk `n + (c+m mod n)`
//!   at position `t + s + p - t_param`, and back chunks invert that map; identity
//!   permutation
//!
//! F012 and F013 are inverse to each other, the outer F023 cases are swapped by the
//! mirror `t -> 2s+p-1-t`, and the middle F023 case and F123 are their own inverses
//! under the hemisphere swap. [`TriangulationBuilder::build`] still verifies the
//! involution on every triangulation it emits.
//!
//! All index arithmetic wraps with Euclidean remainder, so parameters outside the
//! canonical ranges (`m >= n`, `t >= 2s+p`) alias onto canonical ones rather than
//! being rejected. `s = 0` or `p = 0` collapse one of the F023 cases; the output is
//! still a consistent gluing but may not describe a manifold.

use crate::errors::{CensusError, CensusResult};
use crate::triangulation::ids::RelativeId;
use crate::triangulation::perm::Perm4;
use crate::triangulation::tetrahedron::{Face, FaceSlot, Tetrahedron};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The five integer parameters of a triangulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriangulationParams {
    /// Number of faces in a hemisphere (chunks per hemisphere)
    pub n: u32,
    /// Number of subdivisions on longitudinal edges
    pub s: u32,
    /// Number of subdivisions on equatorial edges
    pub p: u32,
    /// Chunk shift applied when crossing hemispheres
    pub m: u32,
    /// Rotation offset applied when crossing hemispheres
    pub t: u32,
}

impl TriangulationParams {
    /// Creates a parameter set.
    #[must_use]
    pub const fn new(n: u32, s: u32, p: u32, m: u32, t: u32) -> Self {
        Self { n, s, p, m, t }
    }

    /// Length of each chunk ring, `2s + p`.
    #[must_use]
    pub const fn ring(&self) -> usize {
        2 * self.s as usize + self.p as usize
    }

    /// Number of chunks, `2n`.
    #[must_use]
    pub const fn chunk_count(&self) -> usize {
        2 * self.n as usize
    }

    /// Number of tetrahedra, `2n(2s + p)`.
    #[must_use]
    pub const fn tetrahedron_count(&self) -> usize {
        self.chunk_count() * self.ring()
    }

    /// Whether the parameters lie in the ranges the census sweeps
    /// (`n >= 1`, `m < n`, `t < 2s + p`).
    ///
    /// Non-canonical parameters still generate, through modular aliasing.
    #[must_use]
    pub const fn is_canonical(&self) -> bool {
        self.n >= 1 && self.m < self.n && (self.t as usize) < self.ring()
    }
}

impl fmt::Display for TriangulationParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={}, s={}, p={}, m={}, t={}",
            self.n, self.s, self.p, self.m, self.t
        )
    }
}

/// Target of one face gluing in relative coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gluing {
    /// Tetrahedron on the other side
    pub partner: RelativeId,
    /// Vertex map onto the partner
    pub perm: Perm4,
}

#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn wrap(value: i64, modulus: usize) -> usize {
    value.rem_euclid(modulus as i64) as usize
}

/// Computes the gluing of face `slot` of tetrahedron `id`.
///
/// `id` must lie inside the grid described by `params`; the modulus of each rule is
/// then non-zero.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn pairing_rule(slot: FaceSlot, params: &TriangulationParams, id: RelativeId) -> Gluing {
    let n = params.n as usize;
    let ring = params.ring();
    let (s, p) = (i64::from(params.s), i64::from(params.p));
    let c = id.chunk as i64;
    let t = id.position as i64;
    let front = id.is_front(n);

    match slot {
        FaceSlot::F012 => Gluing {
            partner: RelativeId::new(id.chunk, wrap(t - 1, ring)),
            perm: Perm4::SWAP_23,
        },
        FaceSlot::F013 => Gluing {
            partner: RelativeId::new(id.chunk, wrap(t + 1, ring)),
            perm: Perm4::SWAP_23,
        },
        FaceSlot::F023 => {
            let mirrored = wrap(2 * s + p - 1 - t, ring);
            let hemisphere = if front { 0 } else { n };
            if t < s {
                Gluing {
                    partner: RelativeId::new(wrap(c - 1, n) + hemisphere, mirrored),
                    perm: Perm4::SWAP_23,
                }
            } else if t < s + p {
                Gluing {
                    partner: RelativeId::new((id.chunk + n) % (2 * n), id.position),
                    perm: Perm4::IDENTITY,
                }
            } else {
                Gluing {
                    partner: RelativeId::new(wrap(c + 1, n) + hemisphere, mirrored),
                    perm: Perm4::SWAP_23,
                }
            }
        }
        FaceSlot::F123 => {
            let (m, shift) = (i64::from(params.m), i64::from(params.t));
            let nn = n as i64;
            let partner = if front {
                RelativeId::new(wrap(c + nn + m, n) + n, wrap(t + s + p - shift, ring))
            } else {
                RelativeId::new(wrap(c - nn - m, n), wrap(t - s - p + shift, ring))
            };
            Gluing {
                partner,
                perm: Perm4::IDENTITY,
            }
        }
    }
}

/// Two-phase constructor for [`Triangulation`].
///
/// Slots start empty and are filled by [`apply_rule`](Self::apply_rule); only
/// [`build`](Self::build) turns the grid into a `Triangulation`, and only once every
/// slot is filled and every gluing is reciprocated.
#[derive(Debug, Clone)]
pub struct TriangulationBuilder {
    params: TriangulationParams,
    slots: Vec<[Option<Gluing>; 4]>,
}

impl TriangulationBuilder {
    /// Creates an empty grid of `2n(2s + p)` tetrahedra.
    #[must_use]
    pub fn new(params: TriangulationParams) -> Self {
        Self {
            params,
            slots: vec![[None; 4]; params.tetrahedron_count()],
        }
    }

    /// The parameters the grid was created for.
    #[must_use]
    pub const fn params(&self) -> &TriangulationParams {
        &self.params
    }

    fn ids(&self) -> impl Iterator<Item = RelativeId> + use<> {
        let ring = self.params.ring();
        (0..self.params.chunk_count())
            .flat_map(move |chunk| (0..ring).map(move |position| RelativeId::new(chunk, position)))
    }

    /// Fills `slot` of every tetrahedron from its pairing rule.
    pub fn apply_rule(&mut self, slot: FaceSlot) -> &mut Self {
        for (index, id) in self.ids().enumerate() {
            self.slots[index][slot.index()] = Some(pairing_rule(slot, &self.params, id));
        }
        self
    }

    /// Fills all four slots.
    pub fn apply_all_rules(&mut self) -> &mut Self {
        for slot in FaceSlot::ALL {
            self.apply_rule(slot);
        }
        self
    }

    /// Overwrites one slot, bypassing the pairing rules.
    #[cfg(test)]
    fn set_gluing(&mut self, id: RelativeId, slot: FaceSlot, gluing: Gluing) {
        let index = id.chunk * self.params.ring() + id.position;
        self.slots[index][slot.index()] = Some(gluing);
    }

    /// Number of slots still empty.
    #[must_use]
    pub fn unpaired_count(&self) -> usize {
        self.slots
            .iter()
            .flatten()
            .filter(|gluing| gluing.is_none())
            .count()
    }

    /// Emits the triangulation.
    ///
    /// # Errors
    ///
    /// Returns [`CensusError::UnpairedFace`] if a slot was never filled,
    /// [`CensusError::SelfGluedFace`] if a face is glued onto itself and
    /// [`CensusError::InvolutionViolation`] if a gluing is not reciprocated with the
    /// inverse permutation.
    pub fn build(self) -> CensusResult<Triangulation<RelativeId>> {
        let ids: Vec<RelativeId> = self.ids().collect();
        let mut tets = Vec::with_capacity(ids.len());

        for (id, slots) in ids.into_iter().zip(self.slots) {
            let [Some(f012), Some(f013), Some(f023), Some(f123)] = slots else {
                let slot = FaceSlot::ALL
                    .into_iter()
                    .find(|slot| slots[slot.index()].is_none())
                    .unwrap_or(FaceSlot::F012);
                return Err(CensusError::UnpairedFace {
                    tetrahedron: id,
                    slot,
                });
            };
            let face = |slot, gluing: Gluing| Face {
                slot,
                pairing: gluing.partner,
                perm: gluing.perm,
            };
            tets.push(Tetrahedron::new(
                id,
                [
                    face(FaceSlot::F012, f012),
                    face(FaceSlot::F013, f013),
                    face(FaceSlot::F023, f023),
                    face(FaceSlot::F123, f123),
                ],
            ));
        }

        let triangulation = Triangulation {
            params: self.params,
            tets,
        };
        triangulation.verify_gluings()?;
        Ok(triangulation)
    }
}

/// An immutable, fully glued triangulation.
///
/// `I` is [`RelativeId`] straight out of the generator and
/// [`AbsoluteId`](crate::triangulation::ids::AbsoluteId) after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triangulation<I> {
    pub(crate) params: TriangulationParams,
    pub(crate) tets: Vec<Tetrahedron<I>>,
}

impl<I: Copy> Triangulation<I> {
    /// The generating parameters.
    #[must_use]
    pub const fn params(&self) -> &TriangulationParams {
        &self.params
    }

    /// All tetrahedra, chunk-major.
    #[must_use]
    pub fn tetrahedra(&self) -> &[Tetrahedron<I>] {
        &self.tets
    }

    /// Number of tetrahedra.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tets.len()
    }

    /// Whether the triangulation has no tetrahedra (`n = 0` or `2s + p = 0`).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tets.is_empty()
    }

    /// The `2n` chunk rings in order.
    pub fn chunks(&self) -> impl Iterator<Item = &[Tetrahedron<I>]> {
        self.tets.chunks(self.params.ring().max(1))
    }
}

impl Triangulation<RelativeId> {
    /// Generates the triangulation for `params`.
    ///
    /// # Errors
    ///
    /// Propagates the consistency errors of [`TriangulationBuilder::build`]; the four
    /// rules never trigger them.
    pub fn generate(params: TriangulationParams) -> CensusResult<Self> {
        if !params.is_canonical() {
            log::warn!("Parameters {params} are outside the canonical ranges; indices will alias");
        }
        log::debug!(
            "Generating triangulation {params} ({} tetrahedra)",
            params.tetrahedron_count()
        );

        let mut builder = TriangulationBuilder::new(params);
        builder.apply_all_rules();
        builder.build()
    }

    /// The tetrahedron at `id`, if it lies in the grid.
    #[must_use]
    pub fn get(&self, id: RelativeId) -> Option<&Tetrahedron<RelativeId>> {
        if id.chunk >= self.params.chunk_count() || id.position >= self.params.ring() {
            return None;
        }
        self.tets.get(id.chunk * self.params.ring() + id.position)
    }

    fn verify_gluings(&self) -> CensusResult<()> {
        for tet in &self.tets {
            for face in tet.faces() {
                let partner_slot = face.partner_slot();
                let violation = || CensusError::InvolutionViolation {
                    origin: tet.id,
                    slot: face.slot,
                    partner: face.pairing,
                    partner_slot,
                };

                if face.pairing == tet.id && partner_slot == face.slot {
                    return Err(CensusError::SelfGluedFace {
                        tetrahedron: tet.id,
                        slot: face.slot,
                    });
                }

                let back = self.get(face.pairing).ok_or_else(violation)?;
                let back_face = back.face(partner_slot);
                if back_face.pairing != tet.id || back_face.perm != face.perm.inverse() {
                    return Err(violation());
                }
            }
        }
        Ok(())
    }
}
