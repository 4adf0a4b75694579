//! Error types for the census library.

use crate::triangulation::ids::RelativeId;
use crate::triangulation::tetrahedron::FaceSlot;

/// Main error type for census operations.
#[derive(Debug, thiserror::Error)]
pub enum CensusError {
    /// Invalid sweep or generation configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A face slot was never assigned a gluing by the pairing rules
    #[error("Face {slot} of tetrahedron {tetrahedron} was left unpaired")]
    UnpairedFace {
        /// Tetrahedron owning the face
        tetrahedron: RelativeId,
        /// The unpaired slot
        slot: FaceSlot,
    },

    /// A face was glued onto itself
    #[error("Face {slot} of tetrahedron {tetrahedron} is glued to itself")]
    SelfGluedFace {
        /// Tetrahedron owning the face
        tetrahedron: RelativeId,
        /// The offending slot
        slot: FaceSlot,
    },

    /// Following a gluing and its partner did not return to the origin face
    #[error(
        "Gluing {origin}:{slot} -> {partner}:{partner_slot} is not reciprocated by the partner face"
    )]
    InvolutionViolation {
        /// Tetrahedron the gluing starts from
        origin: RelativeId,
        /// Face slot the gluing starts from
        slot: FaceSlot,
        /// Tetrahedron the gluing lands on
        partner: RelativeId,
        /// Face slot the gluing lands on
        partner_slot: FaceSlot,
    },

    /// I/O failure on the console or the census output file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON rendering failure
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for census operations.
pub type CensusResult<T> = Result<T, CensusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CensusError::InvalidConfig("n_min > n_max".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: n_min > n_max");

        let err = CensusError::UnpairedFace {
            tetrahedron: RelativeId::new(1, 2),
            slot: FaceSlot::F023,
        };
        assert_eq!(
            err.to_string(),
            "Face F023 of tetrahedron (1, 2) was left unpaired"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::other("disk full");
        let err: CensusError = io.into();
        assert!(matches!(err, CensusError::Io(_)));
        assert!(err.to_string().contains("disk full"));
    }
}
