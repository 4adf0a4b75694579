//! Classifier capability interface.
//!
//! The census hands each normalized triangulation to a [`ManifoldClassifier`]
//! as a plain [`GluingTable`]: `N` tetrahedra, each with four face gluings
//! keyed by face id (the excluded vertex). A classifier answers with a
//! [`Classification`]; nothing in the generator depends on how it is computed.

use crate::triangulation::perm::Perm4;
use serde::{Deserialize, Serialize};

/// Volume above which a manifold is reported hyperbolic.
pub const HYPERBOLIC_VOLUME_THRESHOLD: f64 = 0.8;

/// Where one face of a tetrahedron is glued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceGluing {
    /// Flat index of the partner tetrahedron
    pub partner: usize,
    /// Vertex map onto the partner; face `f` lands on partner face `perm[f]`
    pub perm: Perm4,
}

/// Face gluings of a whole triangulation in flat-index form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GluingTable {
    tetrahedra: Vec<[FaceGluing; 4]>,
}

impl GluingTable {
    /// Creates a table; entry `i` lists the gluings of tetrahedron `i` by face id 0..4.
    #[must_use]
    pub const fn new(tetrahedra: Vec<[FaceGluing; 4]>) -> Self {
        Self { tetrahedra }
    }

    /// Number of tetrahedra.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tetrahedra.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tetrahedra.is_empty()
    }

    /// Gluing of face `face` of tetrahedron `tet`.
    #[must_use]
    pub fn gluing(&self, tet: usize, face: u8) -> Option<&FaceGluing> {
        self.tetrahedra.get(tet)?.get(usize::from(face))
    }

    /// Per-tetrahedron gluings.
    #[must_use]
    pub fn tetrahedra(&self) -> &[[FaceGluing; 4]] {
        &self.tetrahedra
    }
}

/// Outcome of classifying one triangulation.
///
/// `None` fields print as `N/A`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Whether the triangulation is a valid 3-manifold, possibly with ideal vertices; `None` if
    /// classification failed
    pub is_manifold: Option<bool>,
    /// Hyperbolic volume, when the classifier can compute one
    pub volume: Option<f64>,
    /// First homology group in text form
    pub homology_h1: Option<String>,
}

impl Classification {
    /// Verdict for a triangulation that is not a manifold.
    #[must_use]
    pub const fn invalid() -> Self {
        Self {
            is_manifold: Some(false),
            volume: None,
            homology_h1: None,
        }
    }

    /// Verdict for a valid manifold.
    #[must_use]
    pub const fn manifold(volume: Option<f64>, homology_h1: Option<String>) -> Self {
        Self {
            is_manifold: Some(true),
            volume,
            homology_h1,
        }
    }

    /// Verdict when the classifier itself failed.
    #[must_use]
    pub const fn unknown() -> Self {
        Self {
            is_manifold: None,
            volume: None,
            homology_h1: None,
        }
    }

    /// Hyperbolicity, known only for manifolds with a computed volume.
    #[must_use]
    pub fn is_hyperbolic(&self) -> Option<bool> {
        match (self.is_manifold, self.volume) {
            (Some(true), Some(volume)) => Some(volume > HYPERBOLIC_VOLUME_THRESHOLD),
            _ => None,
        }
    }
}

/// A topology engine able to classify gluing tables.
pub trait ManifoldClassifier {
    /// Error type for classification failures
    type Error: std::error::Error + 'static;

    /// Classifier identifier for logging
    fn name(&self) -> &'static str;

    /// Classify the triangulation described by `table`
    ///
    /// # Errors
    /// Returns error if the classifier cannot produce a verdict
    fn classify(&mut self, table: &GluingTable) -> Result<Classification, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hyperbolic_threshold() {
        assert_eq!(Classification::manifold(Some(2.03), None).is_hyperbolic(), Some(true));
        assert_eq!(Classification::manifold(Some(0.8), None).is_hyperbolic(), Some(false));
        assert_eq!(Classification::manifold(None, None).is_hyperbolic(), None);
        assert_eq!(Classification::invalid().is_hyperbolic(), None);
        assert_eq!(Classification::unknown().is_manifold, None);
    }

    #[test]
    fn test_gluing_lookup() {
        let glue = FaceGluing {
            partner: 1,
            perm: Perm4::IDENTITY,
        };
        let table = GluingTable::new(vec![[glue; 4], [FaceGluing { partner: 0, ..glue }; 4]]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.gluing(1, 3).map(|g| g.partner), Some(0));
        assert!(table.gluing(1, 4).is_none());
        assert!(table.gluing(2, 0).is_none());
    }
}
