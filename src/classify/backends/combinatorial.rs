//! Built-in classifier working purely from the gluing table.
//!
//! A triangulation is reported as a 3-manifold when its gluings are reciprocated
//! and no edge is identified with itself in reverse. Vertices whose link is not a
//! sphere are ideal: they stand for cusps or other boundary of the manifold left
//! after truncating them. Manifolds additionally get their first homology. Volume
//! needs a hyperbolic structure, which this backend does not compute, so
//! hyperbolicity stays unknown.

use crate::classify::homology::{HomologyError, first_homology};
use crate::classify::skeleton::Skeleton;
use crate::classify::traits::{Classification, GluingTable, ManifoldClassifier};

/// Errors from the combinatorial classifier.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    /// Homology computation failed
    #[error(transparent)]
    Homology(#[from] HomologyError),
}

/// Classifier based on edge validity and dual-complex homology.
#[derive(Debug, Clone)]
pub struct CombinatorialClassifier {
    homology: bool,
}

impl Default for CombinatorialClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl CombinatorialClassifier {
    /// Creates a classifier that also computes `H1`.
    #[must_use]
    pub const fn new() -> Self {
        Self { homology: true }
    }

    /// Creates a classifier that only decides validity.
    #[must_use]
    pub const fn without_homology() -> Self {
        Self { homology: false }
    }
}

impl ManifoldClassifier for CombinatorialClassifier {
    type Error = ClassifyError;

    fn name(&self) -> &'static str {
        "combinatorial"
    }

    fn classify(&mut self, table: &GluingTable) -> Result<Classification, Self::Error> {
        if table.is_empty() {
            log::debug!("Empty triangulation is not a manifold");
            return Ok(Classification::invalid());
        }

        let skeleton = match Skeleton::build(table) {
            Ok(skeleton) => skeleton,
            Err(defect) => {
                log::debug!("Not a manifold: {defect}");
                return Ok(Classification::invalid());
            }
        };

        if !skeleton.edges_valid() {
            log::debug!(
                "Not a manifold: {} edge identifications reverse an edge",
                skeleton.invalid_edge_count()
            );
            return Ok(Classification::invalid());
        }

        let ideal = skeleton.ideal_vertex_count();
        if ideal > 0 {
            log::debug!(
                "{ideal} ideal vertices, link Euler characteristics {:?}",
                skeleton.link_euler_characteristics()
            );
        }

        let homology_h1 = if self.homology {
            Some(first_homology(table, &skeleton)?.to_string())
        } else {
            None
        };

        log::trace!(
            "Manifold with V={}, E={}, F={}, T={}",
            skeleton.vertex_count(),
            skeleton.edge_count(),
            skeleton.face_count(),
            skeleton.tetrahedron_count()
        );
        Ok(Classification::manifold(None, homology_h1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::traits::FaceGluing;
    use crate::triangulation::generator::{Triangulation, TriangulationParams};
    use crate::triangulation::perm::Perm4;

    fn classify(n: u32, s: u32, p: u32, m: u32, t: u32) -> Classification {
        let table = Triangulation::generate(TriangulationParams::new(n, s, p, m, t))
            .expect("Failed to generate triangulation")
            .into_absolute()
            .gluing_table();
        CombinatorialClassifier::new()
            .classify(&table)
            .expect("Failed to classify")
    }

    #[test]
    fn test_double_tetrahedron_is_sphere() {
        let to = |partner| FaceGluing {
            partner,
            perm: Perm4::IDENTITY,
        };
        let table = GluingTable::new(vec![[to(1); 4], [to(0); 4]]);
        let verdict = CombinatorialClassifier::new()
            .classify(&table)
            .expect("Failed to classify");
        assert_eq!(verdict.is_manifold, Some(true));
        assert_eq!(verdict.homology_h1.as_deref(), Some("0"));
        assert_eq!(verdict.volume, None);
        assert_eq!(verdict.is_hyperbolic(), None);
    }

    #[test]
    fn test_lens_space() {
        let verdict = classify(2, 1, 1, 0, 0);
        assert_eq!(verdict.is_manifold, Some(true));
        assert_eq!(verdict.homology_h1.as_deref(), Some("Z_3"));
    }

    #[test]
    fn test_simply_connected_examples() {
        for (n, s, p, m, t) in [(1, 1, 0, 0, 0), (1, 1, 1, 0, 0), (2, 1, 1, 0, 2), (1, 2, 1, 0, 0)] {
            let verdict = classify(n, s, p, m, t);
            assert_eq!(verdict.is_manifold, Some(true), "n={n} s={s} p={p} m={m} t={t}");
            assert_eq!(verdict.homology_h1.as_deref(), Some("0"));
        }
    }

    #[test]
    fn test_torus_cusp_is_ideal_manifold() {
        let verdict = classify(2, 1, 1, 1, 0);
        assert_eq!(verdict.is_manifold, Some(true));
        assert_eq!(verdict.homology_h1.as_deref(), Some("Z"));
    }

    #[test]
    fn test_higher_genus_ideal_vertex_is_manifold() {
        let verdict = classify(3, 1, 2, 1, 2);
        assert_eq!(verdict.is_manifold, Some(true));
        assert_eq!(verdict.homology_h1.as_deref(), Some("2 Z + Z_2"));
    }

    #[test]
    fn test_reversed_edge_is_rejected() {
        let fold = FaceGluing {
            partner: 0,
            perm: Perm4::new([1, 0, 3, 2]).expect("valid permutation"),
        };
        let rest = FaceGluing {
            partner: 0,
            perm: Perm4::SWAP_23,
        };
        let table = GluingTable::new(vec![[fold, fold, rest, rest]]);
        let verdict = CombinatorialClassifier::new()
            .classify(&table)
            .expect("Failed to classify");
        assert_eq!(verdict, Classification::invalid());
    }

    #[test]
    fn test_without_homology() {
        let table = Triangulation::generate(TriangulationParams::new(2, 1, 1, 0, 0))
            .expect("Failed to generate triangulation")
            .into_absolute()
            .gluing_table();
        let verdict = CombinatorialClassifier::without_homology()
            .classify(&table)
            .expect("Failed to classify");
        assert_eq!(verdict, Classification::manifold(None, None));
    }

    #[test]
    fn test_empty_table() {
        let verdict = CombinatorialClassifier::new()
            .classify(&GluingTable::new(Vec::new()))
            .expect("Failed to classify");
        assert_eq!(verdict.is_manifold, Some(false));
    }
}
