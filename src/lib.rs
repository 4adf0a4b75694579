#![allow(clippy::multiple_crate_versions)]
#![warn(missing_docs)]

//! Census of 3-manifolds obtained by face-pairing a subdivided ball.
//!
//! The ball is cut into `2n` chunks of `2s+p` tetrahedra. Four fixed rules
//! glue every face of every tetrahedron; the parameters `m` (shift) and `t`
//! (rotation) twist how the two hemispheres meet. The census sweeps ranges of
//! these parameters and classifies each resulting triangulation.
//!
//! # Key Features
//!
//! - Two-phase generation: a builder collects gluings, and only a fully paired,
//!   involution-checked triangulation comes out
//! - Distinct relative `(chunk, position)` and flat tetrahedron ids with a
//!   one-way conversion
//! - Pluggable classifiers behind [`ManifoldClassifier`], with a built-in
//!   combinatorial backend (edge validity, ideal vertices and first homology)
//! - Deterministic sweep order with CSV output
//!
//! # Example
//!
//! ```rust
//! use manifold_census::{CombinatorialClassifier, Triangulation, TriangulationParams};
//! use manifold_census::ManifoldClassifier;
//!
//! let tri = Triangulation::generate(TriangulationParams::new(2, 1, 1, 0, 0))?;
//! assert_eq!(tri.len(), 12);
//!
//! let table = tri.into_absolute().gluing_table();
//! let verdict = CombinatorialClassifier::new().classify(&table)?;
//! assert_eq!(verdict.is_manifold, Some(true));
//! assert_eq!(verdict.homology_h1.as_deref(), Some("Z_3"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::io::{self, Write};

// Module declarations (avoiding mod.rs files)
/// Error types for the census library.
pub mod errors;

/// Command-line configuration.
pub mod config;

/// Parameter-space sweep and its outputs.
pub mod census;

/// Face-paired triangulations of the subdivided ball.
pub mod triangulation {
    /// Relative and absolute tetrahedron identifiers.
    pub mod ids;
    /// Permutations of the four tetrahedron vertices.
    pub mod perm;
    /// Tetrahedra and their four faces.
    pub mod tetrahedron;
    /// The four pairing rules and the two-phase builder.
    pub mod generator;
    /// Conversion to flat tetrahedron indices.
    pub mod normalize;
    /// Fixed-width pairing table.
    pub mod table;
}

/// Manifold classification of gluing tables.
///
/// The census only depends on the [`traits::ManifoldClassifier`] capability;
/// backends implement it.
pub mod classify {
    /// Classifier capability trait and its data types.
    pub mod traits;
    /// Vertex, edge and face classes of a glued triangulation.
    pub mod skeleton;
    /// Smith normal form and first homology.
    pub mod homology;

    /// Classifier implementations.
    pub mod backends {
        /// Built-in combinatorial classifier.
        pub mod combinatorial;

        /// Mock classifier for testing.
        pub mod mock;
    }
}

// Re-exports for convenience
pub use census::{
    CSV_HEADER, CensusParams, CensusRecord, CensusSummary, CsvSink, ParameterSpace, evaluate,
    run_census,
};
pub use classify::backends::combinatorial::{ClassifyError, CombinatorialClassifier};
pub use classify::traits::{
    Classification, FaceGluing, GluingTable, HYPERBOLIC_VOLUME_THRESHOLD, ManifoldClassifier,
};
pub use config::{CensusCli, Command, GenerateConfig, SweepConfig, SweepPresets};
pub use errors::{CensusError, CensusResult};
pub use triangulation::generator::{Triangulation, TriangulationBuilder, TriangulationParams};
pub use triangulation::ids::{AbsoluteId, RelativeId};
pub use triangulation::perm::Perm4;
pub use triangulation::tetrahedron::{Face, FaceSlot, Tetrahedron};

/// Builds one triangulation, prints its pairing table and classifies it.
///
/// # Errors
///
/// Returns generation, serialization and I/O errors.
pub fn run_generate<W: Write + ?Sized>(
    config: &GenerateConfig,
    out: &mut W,
) -> CensusResult<CensusRecord> {
    let params = config.params();
    log::info!("Generating triangulation with {params}");

    let tri = Triangulation::generate(params)?;
    log::info!(
        "Triangulation created with {} tetrahedra in {} chunks",
        tri.len(),
        params.chunk_count()
    );

    let tri = if config.absolute {
        let tri = tri.into_absolute();
        write!(out, "{tri}")?;
        tri
    } else {
        write!(out, "{tri}")?;
        tri.into_absolute()
    };

    let table = tri.gluing_table();
    if config.json {
        serde_json::to_writer_pretty(&mut *out, &table)?;
        writeln!(out)?;
    }

    let classification = match CombinatorialClassifier::new().classify(&table) {
        Ok(classification) => classification,
        Err(e) => {
            log::warn!("Classification failed: {e}");
            Classification::unknown()
        }
    };
    let record = CensusRecord {
        params: CensusParams::from(params),
        tetrahedra: table.len(),
        classification,
    };
    record.write_report(out)?;
    Ok(record)
}

/// Runs the subcommand selected on the command line, writing reports to stdout.
///
/// # Errors
///
/// Returns [`CensusError::InvalidConfig`] for bad sweep ranges, and any
/// generation or I/O error.
pub fn run(cli: &CensusCli) -> CensusResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match &cli.command {
        Command::Sweep(config) => {
            let mut classifier = if config.no_homology {
                CombinatorialClassifier::without_homology()
            } else {
                CombinatorialClassifier::new()
            };
            let summary = run_census(config, &mut classifier, &mut out)?;
            log::info!(
                "Found {} manifolds in {} combinations",
                summary.manifolds,
                summary.combinations
            );
        }
        Command::Generate(config) => {
            run_generate(config, &mut out)?;
        }
    }
    Ok(())
}
