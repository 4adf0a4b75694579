//! First homology of a glued triangulation.
//!
//! Computed on the dual complex, which stays correct when vertices are ideal.
//! Tetrahedra are dual vertices and face classes dual edges. A spanning forest
//! of the dual graph contracts to points; every face class off the forest is a
//! generator. Each edge class contributes one relation, read off by walking
//! once around the tetrahedra that meet along it.
//!
//! Generated presentations are large but sparse, and almost every relation has
//! a coefficient of one. Those are used to eliminate a generator each before
//! the small remainder goes through a dense Smith normal form.

use crate::classify::skeleton::{Skeleton, TETRAHEDRON_EDGES, edge_index};
use crate::classify::traits::GluingTable;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Errors raised while computing homology.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HomologyError {
    /// An intermediate entry left the `i64` range
    #[error("Integer overflow during Smith normal form reduction")]
    Overflow,

    /// Walking around an edge left the table or never returned to its start
    #[error("Edge {a}-{b} of tetrahedron {tet} does not close up")]
    OpenEdgeCycle {
        /// Tetrahedron the walk started in
        tet: usize,
        /// First endpoint
        a: u8,
        /// Second endpoint
        b: u8,
    },
}

/// A finitely generated abelian group `Z^rank + Z_d1 + ... + Z_dk`, `d1 | d2 | ... | dk`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AbelianGroup {
    /// Free rank
    pub rank: usize,
    /// Invariant factors greater than one, ascending
    pub torsion: Vec<u64>,
}

impl AbelianGroup {
    /// Whether the group is trivial.
    #[must_use]
    pub fn is_trivial(&self) -> bool {
        self.rank == 0 && self.torsion.is_empty()
    }
}

impl fmt::Display for AbelianGroup {
    /// `0`, `Z`, `2 Z`, `Z_3`, `Z + 2 Z_2`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut terms = Vec::new();
        match self.rank {
            0 => {}
            1 => terms.push("Z".to_string()),
            rank => terms.push(format!("{rank} Z")),
        }

        let mut i = 0;
        while i < self.torsion.len() {
            let order = self.torsion[i];
            let count = self.torsion[i..].iter().take_while(|&&d| d == order).count();
            terms.push(if count == 1 {
                format!("Z_{order}")
            } else {
                format!("{count} Z_{order}")
            });
            i += count;
        }

        if terms.is_empty() {
            f.write_str("0")
        } else {
            f.write_str(&terms.join(" + "))
        }
    }
}

const fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

fn smallest_nonzero(
    matrix: &[Vec<i64>],
    rows: impl Iterator<Item = usize> + Clone,
    cols: impl Iterator<Item = usize> + Clone,
) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize, u64)> = None;
    for i in rows {
        for j in cols.clone() {
            let value = matrix[i][j].unsigned_abs();
            if value != 0 && best.is_none_or(|(_, _, b)| value < b) {
                best = Some((i, j, value));
            }
        }
    }
    best.map(|(i, j, _)| (i, j))
}

fn swap_cols(matrix: &mut [Vec<i64>], a: usize, b: usize) {
    for row in matrix.iter_mut() {
        row.swap(a, b);
    }
}

/// Invariant factors of an integer matrix: the non-zero diagonal of its Smith normal
/// form, each dividing the next.
///
/// # Errors
///
/// Returns [`HomologyError::Overflow`] if an entry leaves the `i64` range.
pub fn invariant_factors(mut matrix: Vec<Vec<i64>>) -> Result<Vec<u64>, HomologyError> {
    let rows = matrix.len();
    let cols = matrix.first().map_or(0, Vec::len);
    let mut diagonal = Vec::new();

    for k in 0..rows.min(cols) {
        let Some((pi, pj)) = smallest_nonzero(&matrix, k..rows, k..cols) else {
            break;
        };
        matrix.swap(k, pi);
        swap_cols(&mut matrix, k, pj);

        loop {
            let pivot = matrix[k][k];
            let mut clean = true;

            for i in k + 1..rows {
                let q = matrix[i][k] / pivot;
                if q != 0 {
                    for j in k..cols {
                        let delta = q.checked_mul(matrix[k][j]).ok_or(HomologyError::Overflow)?;
                        matrix[i][j] = matrix[i][j]
                            .checked_sub(delta)
                            .ok_or(HomologyError::Overflow)?;
                    }
                }
                clean &= matrix[i][k] == 0;
            }

            for j in k + 1..cols {
                let q = matrix[k][j] / pivot;
                if q != 0 {
                    for row in matrix.iter_mut().skip(k) {
                        let delta = q.checked_mul(row[k]).ok_or(HomologyError::Overflow)?;
                        row[j] = row[j].checked_sub(delta).ok_or(HomologyError::Overflow)?;
                    }
                }
                clean &= matrix[k][j] == 0;
            }

            if clean {
                break;
            }

            // a remainder survived: move it to the pivot and reduce again
            let in_col = smallest_nonzero(&matrix, k..rows, k..=k);
            let in_row = smallest_nonzero(&matrix, k..=k, k..cols);
            let (ri, rj) = match (in_col, in_row) {
                (Some(a), Some(b)) if matrix[b.0][b.1].unsigned_abs() < matrix[a.0][a.1].unsigned_abs() => b,
                (Some(a), _) => a,
                (None, Some(b)) => b,
                (None, None) => break,
            };
            matrix.swap(k, ri);
            swap_cols(&mut matrix, k, rj);
        }

        diagonal.push(matrix[k][k].unsigned_abs());
    }

    // turn the diagonal into a divisibility chain
    let mut changed = true;
    while changed {
        changed = false;
        for a in 0..diagonal.len() {
            for b in a + 1..diagonal.len() {
                let g = gcd(diagonal[a], diagonal[b]);
                if diagonal[a] != g {
                    let lcm = (diagonal[a] / g)
                        .checked_mul(diagonal[b])
                        .ok_or(HomologyError::Overflow)?;
                    diagonal[a] = g;
                    diagonal[b] = lcm;
                    changed = true;
                }
            }
        }
    }
    Ok(diagonal)
}

/// An abelian group given by generators and sparse integer relations.
#[derive(Debug, Clone, Default)]
pub struct Presentation {
    relations: Vec<BTreeMap<usize, i64>>,
    occurrences: Vec<BTreeSet<usize>>,
    eliminated: Vec<bool>,
}

impl Presentation {
    /// A free abelian group on `generators` generators.
    #[must_use]
    pub fn new(generators: usize) -> Self {
        Self {
            relations: Vec::new(),
            occurrences: vec![BTreeSet::new(); generators],
            eliminated: vec![false; generators],
        }
    }

    /// Generators not yet eliminated.
    #[must_use]
    pub fn generator_count(&self) -> usize {
        self.eliminated.iter().filter(|&&gone| !gone).count()
    }

    /// Relations with at least one non-zero coefficient.
    #[must_use]
    pub fn relation_count(&self) -> usize {
        self.relations.iter().filter(|r| !r.is_empty()).count()
    }

    /// Adds the relation `sum(coefficient * generator) = 0`. Repeated generators are summed.
    ///
    /// # Errors
    ///
    /// Returns [`HomologyError::Overflow`] if a summed coefficient leaves the `i64` range.
    ///
    /// # Panics
    ///
    /// Panics if a generator index is out of range.
    pub fn add_relation(
        &mut self,
        terms: impl IntoIterator<Item = (usize, i64)>,
    ) -> Result<(), HomologyError> {
        let mut relation = BTreeMap::new();
        for (generator, coefficient) in terms {
            let entry: &mut i64 = relation.entry(generator).or_default();
            *entry = entry.checked_add(coefficient).ok_or(HomologyError::Overflow)?;
        }
        relation.retain(|_, c| *c != 0);

        let index = self.relations.len();
        for &generator in relation.keys() {
            self.occurrences[generator].insert(index);
        }
        self.relations.push(relation);
        Ok(())
    }

    /// Cheapest `(relation, generator, ±1)` to eliminate next.
    fn unit_pivot(&self) -> Option<(usize, usize, i64)> {
        self.relations
            .iter()
            .enumerate()
            .filter_map(|(index, relation)| {
                relation
                    .iter()
                    .filter(|(_, c)| c.abs() == 1)
                    .map(|(&generator, &unit)| {
                        let cost = relation.len() * self.occurrences[generator].len();
                        (cost, index, generator, unit)
                    })
                    .min()
            })
            .min()
            .map(|(_, index, generator, unit)| (index, generator, unit))
    }

    /// Uses every relation with a unit coefficient to solve for that generator and
    /// substitute it everywhere else.
    ///
    /// # Errors
    ///
    /// Returns [`HomologyError::Overflow`] if a coefficient leaves the `i64` range.
    pub fn eliminate_units(&mut self) -> Result<(), HomologyError> {
        while let Some((pivot, generator, unit)) = self.unit_pivot() {
            let row = std::mem::take(&mut self.relations[pivot]);
            for g in row.keys() {
                self.occurrences[*g].remove(&pivot);
            }

            for index in std::mem::take(&mut self.occurrences[generator]) {
                let relation = &mut self.relations[index];
                // unit is its own inverse
                let factor = relation.get(&generator).copied().unwrap_or_default() * unit;
                for (&g, &c) in &row {
                    let delta = factor.checked_mul(c).ok_or(HomologyError::Overflow)?;
                    let value = relation
                        .get(&g)
                        .copied()
                        .unwrap_or_default()
                        .checked_sub(delta)
                        .ok_or(HomologyError::Overflow)?;
                    if value == 0 {
                        relation.remove(&g);
                        self.occurrences[g].remove(&index);
                    } else {
                        relation.insert(g, value);
                        self.occurrences[g].insert(index);
                    }
                }
            }
            self.eliminated[generator] = true;
        }
        Ok(())
    }

    /// The presented group.
    ///
    /// # Errors
    ///
    /// Returns [`HomologyError::Overflow`] if the reduction overflows.
    pub fn abelian_group(mut self) -> Result<AbelianGroup, HomologyError> {
        self.eliminate_units()?;

        let mut row_of = vec![usize::MAX; self.eliminated.len()];
        let mut rows = 0;
        for (generator, _) in self.eliminated.iter().enumerate().filter(|(_, gone)| !**gone) {
            row_of[generator] = rows;
            rows += 1;
        }

        let columns: Vec<_> = self.relations.iter().filter(|r| !r.is_empty()).collect();
        let mut matrix = vec![vec![0i64; columns.len()]; rows];
        for (column, relation) in columns.iter().enumerate() {
            for (&generator, &coefficient) in *relation {
                matrix[row_of[generator]][column] = coefficient;
            }
        }

        let factors = invariant_factors(matrix)?;
        Ok(AbelianGroup {
            rank: rows - factors.len(),
            torsion: factors.into_iter().filter(|&d| d > 1).collect(),
        })
    }
}

/// Face classes crossed by a spanning forest of the dual graph.
fn dual_spanning_forest(table: &GluingTable, skeleton: &Skeleton) -> Vec<bool> {
    let mut in_forest = vec![false; skeleton.face_count()];
    let mut reached = vec![false; table.len()];

    for root in 0..table.len() {
        if reached[root] {
            continue;
        }
        reached[root] = true;
        let mut stack = vec![root];
        while let Some(tet) = stack.pop() {
            for (face, gluing) in (0u8..4).zip(&table.tetrahedra()[tet]) {
                if !reached[gluing.partner] {
                    reached[gluing.partner] = true;
                    in_forest[skeleton.face_of(tet, face).0] = true;
                    stack.push(gluing.partner);
                }
            }
        }
    }
    in_forest
}

/// Signed face classes crossed while walking once around edge `a -> b` of `tet`.
///
/// The walk tracks the edge `(a, b)` and its opposite edge `(c, d)`, always leaving
/// through the face opposite `d` and swapping the roles of `c` and `d` on arrival.
fn edge_cycle(
    table: &GluingTable,
    skeleton: &Skeleton,
    tet: usize,
    a: u8,
    b: u8,
) -> Result<Vec<(usize, i64)>, HomologyError> {
    let open = HomologyError::OpenEdgeCycle { tet, a, b };
    let (c, d) = TETRAHEDRON_EDGES[5 - edge_index(a, b)];
    let start = (tet, a, b, c, d);

    let mut flag = start;
    let mut crossings = Vec::new();
    // each of the 24 flags of a tetrahedron is visited at most once
    for _ in 0..=24 * table.len() {
        let (t, x, y, z, w) = flag;
        let gluing = table.gluing(t, w).ok_or_else(|| open.clone())?;
        crossings.push(skeleton.face_of(t, w));
        let perm = gluing.perm;
        flag = (
            gluing.partner,
            perm.apply(x),
            perm.apply(y),
            perm.apply(w),
            perm.apply(z),
        );
        if flag == start {
            return Ok(crossings);
        }
    }
    Err(open)
}

/// `H1` of the manifold described by `table`, with ideal vertices truncated.
///
/// # Errors
///
/// Returns [`HomologyError::Overflow`] if the reduction overflows, or
/// [`HomologyError::OpenEdgeCycle`] if `table` is not the table `skeleton` was built from.
pub fn first_homology(
    table: &GluingTable,
    skeleton: &Skeleton,
) -> Result<AbelianGroup, HomologyError> {
    let in_forest = dual_spanning_forest(table, skeleton);
    let mut generator_of = vec![None; in_forest.len()];
    let mut generators = 0;
    for (slot, _) in generator_of
        .iter_mut()
        .zip(&in_forest)
        .filter(|(_, tree)| !**tree)
    {
        *slot = Some(generators);
        generators += 1;
    }

    let mut presentation = Presentation::new(generators);
    for (tet, a, b) in skeleton.edge_representatives() {
        let crossings = edge_cycle(table, skeleton, tet, a, b)?;
        presentation.add_relation(
            crossings
                .into_iter()
                .filter_map(|(class, sign)| generator_of[class].map(|g| (g, sign))),
        )?;
    }

    log::trace!(
        "Dual presentation: {} generators, {} relations",
        presentation.generator_count(),
        presentation.relation_count()
    );
    presentation.abelian_group()
}
