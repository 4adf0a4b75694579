//! Cell structure of a glued triangulation.
//!
//! Gluing tetrahedra identifies their vertices, edges and faces. This module
//! computes the resulting equivalence classes from a [`GluingTable`]:
//!
//! - vertex classes, by merging the corners matched across every face gluing;
//! - oriented edge classes, with a parity per tetrahedron edge recording whether
//!   it runs with or against its class. An edge that ends up identified with
//!   itself in reverse is *invalid*;
//! - face classes, one per pair of glued faces.
//!
//! The link of each vertex class is a closed surface built from one triangle per
//! tetrahedron corner. Its Euler characteristic is
//! `link vertices - link edges + link triangles`, where every edge class
//! contributes one link vertex at each endpoint and every face class one link
//! edge at each of its corners. Once every edge is valid each link is a closed
//! surface. A vertex whose link is a sphere (`χ = 2`) is an interior point; any
//! other link marks an ideal vertex, a cusp of the manifold left after
//! truncating it.

use crate::classify::traits::GluingTable;
use crate::triangulation::tetrahedron::FaceSlot;

/// The six edges of a tetrahedron as ascending vertex pairs.
pub const TETRAHEDRON_EDGES: [(u8, u8); 6] = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];

/// Index of edge `{a, b}` in [`TETRAHEDRON_EDGES`].
///
/// # Panics
///
/// Panics if `a == b` or either vertex is above 3.
#[must_use]
pub const fn edge_index(a: u8, b: u8) -> usize {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    match (lo, hi) {
        (0, 1) => 0,
        (0, 2) => 1,
        (0, 3) => 2,
        (1, 2) => 3,
        (1, 3) => 4,
        (2, 3) => 5,
        _ => panic!("not an edge of a tetrahedron"),
    }
}

/// A gluing table that does not describe a closed, consistently glued complex.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GluingDefect {
    /// A gluing points outside the table
    #[error("Face {face} of tetrahedron {tet} is glued to missing tetrahedron {partner}")]
    PartnerOutOfRange {
        /// Source tetrahedron
        tet: usize,
        /// Source face id
        face: u8,
        /// Missing partner index
        partner: usize,
    },

    /// The partner face does not glue back with the inverse permutation
    #[error("Face {face} of tetrahedron {tet} is not reciprocated by its partner")]
    NotReciprocated {
        /// Source tetrahedron
        tet: usize,
        /// Source face id
        face: u8,
    },

    /// A face is glued onto itself
    #[error("Face {face} of tetrahedron {tet} is glued to itself")]
    SelfGlued {
        /// Source tetrahedron
        tet: usize,
        /// Source face id
        face: u8,
    },
}

/// Union-find over elements carrying a parity relative to their root.
#[derive(Debug, Clone)]
struct ParityUnionFind {
    parent: Vec<usize>,
    parity: Vec<bool>,
    rank: Vec<u8>,
}

impl ParityUnionFind {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            parity: vec![false; len],
            rank: vec![0; len],
        }
    }

    fn find(&mut self, x: usize) -> (usize, bool) {
        let mut root = x;
        let mut parity = false;
        while self.parent[root] != root {
            parity ^= self.parity[root];
            root = self.parent[root];
        }

        // path compression, keeping each node's parity relative to the root
        let mut node = x;
        let mut acc = parity;
        while node != root {
            let next = self.parent[node];
            let own = self.parity[node];
            self.parent[node] = root;
            self.parity[node] = acc;
            acc ^= own;
            node = next;
        }
        (root, parity)
    }

    /// Records `parity(a) ^ parity(b) == flip`; false if that contradicts earlier unions.
    fn union(&mut self, a: usize, b: usize, flip: bool) -> bool {
        let (ra, pa) = self.find(a);
        let (rb, pb) = self.find(b);
        if ra == rb {
            return (pa ^ pb) == flip;
        }
        let (child, root) = if self.rank[ra] < self.rank[rb] {
            (ra, rb)
        } else {
            (rb, ra)
        };
        if self.rank[child] == self.rank[root] {
            self.rank[root] += 1;
        }
        self.parent[child] = root;
        self.parity[child] = pa ^ pb ^ flip;
        true
    }
}

/// Assigns dense class indices to union-find roots in order of first appearance.
fn dense_classes(uf: &mut ParityUnionFind, len: usize) -> (Vec<(usize, bool)>, Vec<usize>) {
    let mut index_of_root = vec![usize::MAX; len];
    let mut representatives = Vec::new();
    let classes = (0..len)
        .map(|x| {
            let (root, parity) = uf.find(x);
            if index_of_root[root] == usize::MAX {
                index_of_root[root] = representatives.len();
                representatives.push(x);
            }
            (index_of_root[root], parity)
        })
        .collect();
    (classes, representatives)
}

/// Vertex, edge and face classes of a closed gluing table.
#[derive(Debug, Clone)]
pub struct Skeleton {
    tetrahedra: usize,
    vertex_class: Vec<usize>,
    edge_class: Vec<(usize, bool)>,
    edge_reps: Vec<usize>,
    face_class: Vec<(usize, bool)>,
    face_reps: Vec<(usize, u8)>,
    invalid_edges: usize,
}

impl Skeleton {
    /// Computes the cell structure of `table`.
    ///
    /// # Errors
    ///
    /// Returns a [`GluingDefect`] if a face is unreciprocated, self-glued or glued to a
    /// tetrahedron outside the table.
    pub fn build(table: &GluingTable) -> Result<Self, GluingDefect> {
        let tetrahedra = table.len();
        let mut vertices = ParityUnionFind::new(4 * tetrahedra);
        let mut edges = ParityUnionFind::new(6 * tetrahedra);
        let mut face_class = vec![(usize::MAX, false); 4 * tetrahedra];
        let mut face_reps = Vec::with_capacity(2 * tetrahedra);
        let mut invalid_edges = 0;

        for (tet, gluings) in table.tetrahedra().iter().enumerate() {
            for (face, gluing) in (0u8..4).zip(gluings) {
                let partner = gluing.partner;
                let partner_face = gluing.perm.apply(face);
                let back = table
                    .gluing(partner, partner_face)
                    .ok_or(GluingDefect::PartnerOutOfRange { tet, face, partner })?;
                if back.partner != tet || back.perm != gluing.perm.inverse() {
                    return Err(GluingDefect::NotReciprocated { tet, face });
                }
                if partner == tet && partner_face == face {
                    return Err(GluingDefect::SelfGlued { tet, face });
                }

                if face_class[4 * tet + usize::from(face)].0 == usize::MAX {
                    let class = face_reps.len();
                    face_class[4 * tet + usize::from(face)] = (class, false);
                    face_class[4 * partner + usize::from(partner_face)] = (class, true);
                    face_reps.push((tet, face));
                }

                for v in (0u8..4).filter(|&v| v != face) {
                    let image = gluing.perm.apply(v);
                    vertices.union(
                        4 * tet + usize::from(v),
                        4 * partner + usize::from(image),
                        false,
                    );
                }

                for &(a, b) in TETRAHEDRON_EDGES.iter().filter(|&&(a, b)| a != face && b != face) {
                    let (x, y) = (gluing.perm.apply(a), gluing.perm.apply(b));
                    let consistent = edges.union(
                        6 * tet + edge_index(a, b),
                        6 * partner + edge_index(x, y),
                        x > y,
                    );
                    if !consistent {
                        invalid_edges += 1;
                    }
                }
            }
        }

        let (vertex_class, _) = dense_classes(&mut vertices, 4 * tetrahedra);
        let (edge_class, edge_reps) = dense_classes(&mut edges, 6 * tetrahedra);

        Ok(Self {
            tetrahedra,
            vertex_class: vertex_class.into_iter().map(|(class, _)| class).collect(),
            edge_class,
            edge_reps,
            face_class,
            face_reps,
            invalid_edges,
        })
    }

    /// Number of tetrahedra.
    #[must_use]
    pub const fn tetrahedron_count(&self) -> usize {
        self.tetrahedra
    }

    /// Number of vertex classes.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertex_class.iter().copied().max().map_or(0, |max| max + 1)
    }

    /// Number of edge classes.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_reps.len()
    }

    /// Number of face classes.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.face_reps.len()
    }

    /// Number of gluings that identified an edge with itself in reverse.
    #[must_use]
    pub const fn invalid_edge_count(&self) -> usize {
        self.invalid_edges
    }

    /// Whether no edge is identified with itself in reverse.
    #[must_use]
    pub const fn edges_valid(&self) -> bool {
        self.invalid_edges == 0
    }

    /// `V - E + F - T`.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn euler_characteristic(&self) -> i64 {
        self.vertex_count() as i64 - self.edge_count() as i64 + self.face_count() as i64
            - self.tetrahedra as i64
    }

    /// Vertex class of corner `v` of tetrahedron `tet`.
    #[must_use]
    pub fn vertex_of(&self, tet: usize, v: u8) -> usize {
        self.vertex_class[4 * tet + usize::from(v)]
    }

    /// Edge class of the edge `a -> b` of `tet`, with `+1` if it runs along its class
    /// orientation and `-1` otherwise.
    #[must_use]
    pub fn edge_of(&self, tet: usize, a: u8, b: u8) -> (usize, i64) {
        let (class, reversed) = self.edge_class[6 * tet + edge_index(a, b)];
        let against = reversed ^ (a > b);
        (class, if against { -1 } else { 1 })
    }

    /// Endpoint vertex classes of each edge class.
    #[must_use]
    pub fn edge_endpoints(&self) -> Vec<(usize, usize)> {
        self.edge_reps
            .iter()
            .map(|&rep| {
                let (tet, (a, b)) = (rep / 6, TETRAHEDRON_EDGES[rep % 6]);
                (self.vertex_of(tet, a), self.vertex_of(tet, b))
            })
            .collect()
    }

    /// One `(tetrahedron, a, b)` per edge class, running along the class orientation.
    pub fn edge_representatives(&self) -> impl Iterator<Item = (usize, u8, u8)> + '_ {
        self.edge_reps.iter().map(|&rep| {
            let (a, b) = TETRAHEDRON_EDGES[rep % 6];
            (rep / 6, a, b)
        })
    }

    /// Face class of face `face` of `tet`, with `+1` on the representative side of the
    /// gluing and `-1` on its partner.
    #[must_use]
    pub fn face_of(&self, tet: usize, face: u8) -> (usize, i64) {
        let (class, partner_side) = self.face_class[4 * tet + usize::from(face)];
        (class, if partner_side { -1 } else { 1 })
    }

    /// One `(tetrahedron, face id)` per face class.
    #[must_use]
    pub fn face_representatives(&self) -> &[(usize, u8)] {
        &self.face_reps
    }

    /// Euler characteristic of the link of every vertex class.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn link_euler_characteristics(&self) -> Vec<i64> {
        let mut chi = vec![0i64; self.vertex_count()];

        for (u, w) in self.edge_endpoints() {
            chi[u] += 1;
            chi[w] += 1;
        }
        for &(tet, face) in &self.face_reps {
            for v in FaceSlot::BY_ID[usize::from(face)].vertices() {
                chi[self.vertex_of(tet, v)] -= 1;
            }
        }
        for &class in &self.vertex_class {
            chi[class] += 1;
        }
        chi
    }

    /// Whether every vertex link is a 2-sphere.
    #[must_use]
    pub fn vertex_links_spherical(&self) -> bool {
        self.link_euler_characteristics().iter().all(|&chi| chi == 2)
    }

    /// Number of vertex classes whose link is not a sphere.
    #[must_use]
    pub fn ideal_vertex_count(&self) -> usize {
        self.link_euler_characteristics()
            .iter()
            .filter(|&&chi| chi != 2)
            .count()
    }

    /// Number of connected components of the 1-skeleton.
    #[must_use]
    pub fn component_count(&self) -> usize {
        let vertex_count = self.vertex_count();
        let mut uf = ParityUnionFind::new(vertex_count);
        for (u, w) in self.edge_endpoints() {
            uf.union(u, w, false);
        }
        (0..vertex_count)
            .filter(|&v| uf.find(v).0 == v)
            .count()
    }
}
