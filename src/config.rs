//! Command-line configuration for the census.
//!
//! Two subcommands share one binary:
//! - `sweep` enumerates a range of parameters and classifies every combination
//! - `generate` builds a single triangulation and prints its pairing table

use crate::errors::{CensusError, CensusResult};
use crate::triangulation::generator::TriangulationParams;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Census of 3-manifolds built from face-paired ball triangulations.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct CensusCli {
    /// Operation to run
    #[command(subcommand)]
    pub command: Command,
}

impl CensusCli {
    /// Builds a new instance of `CensusCli` from command line arguments.
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }
}

/// Subcommands of the `census` binary.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Classify every combination of a parameter range
    Sweep(SweepConfig),
    /// Build one triangulation and print its pairing table
    Generate(GenerateConfig),
}

/// Ranges and outputs of a parameter sweep.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct SweepConfig {
    /// Smallest number of faces per hemisphere
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub n_min: u32,

    /// Largest number of faces per hemisphere
    #[arg(long, default_value = "2", value_parser = clap::value_parser!(u32).range(1..))]
    pub n_max: u32,

    /// Smallest total number of subdivisions
    #[arg(long, default_value = "2", value_parser = clap::value_parser!(u32).range(1..))]
    pub r_min: u32,

    /// Largest total number of subdivisions
    #[arg(long, default_value = "3", value_parser = clap::value_parser!(u32).range(1..))]
    pub r_max: u32,

    /// CSV file receiving one row per combination
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Suppress the per-combination console report
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,

    /// Decide validity only, skipping first homology
    #[arg(long, default_value = "false")]
    pub no_homology: bool,
}

impl SweepConfig {
    /// Creates a sweep over inclusive `n` and `r` ranges, reporting to the console only.
    #[must_use]
    pub const fn new(n_range: (u32, u32), r_range: (u32, u32)) -> Self {
        Self {
            n_min: n_range.0,
            n_max: n_range.1,
            r_min: r_range.0,
            r_max: r_range.1,
            output: None,
            quiet: false,
            no_homology: false,
        }
    }

    /// Inclusive range of `n`.
    #[must_use]
    pub const fn n_range(&self) -> (u32, u32) {
        (self.n_min, self.n_max)
    }

    /// Inclusive range of `r`.
    #[must_use]
    pub const fn r_range(&self) -> (u32, u32) {
        (self.r_min, self.r_max)
    }

    /// Validates the configuration parameters.
    ///
    /// # Errors
    ///
    /// Returns [`CensusError::InvalidConfig`] if a range is empty or starts at zero.
    pub fn validate(&self) -> CensusResult<()> {
        if self.n_min == 0 {
            return Err(CensusError::InvalidConfig(
                "Number of faces per hemisphere must be at least 1".to_string(),
            ));
        }

        if self.n_min > self.n_max {
            return Err(CensusError::InvalidConfig(format!(
                "Empty n range: n_min {} exceeds n_max {}",
                self.n_min, self.n_max
            )));
        }

        if self.r_min > self.r_max {
            return Err(CensusError::InvalidConfig(format!(
                "Empty r range: r_min {} exceeds r_max {}",
                self.r_min, self.r_max
            )));
        }

        if self.r_max < 2 {
            log::warn!("r_max {} < 2 leaves no valid s, the sweep is empty", self.r_max);
        }

        Ok(())
    }
}

/// Parameters of a single triangulation.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct GenerateConfig {
    /// Faces per hemisphere
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub n: u32,

    /// Longitudinal subdivisions
    #[arg(short, long)]
    pub s: u32,

    /// Equatorial subdivisions
    #[arg(short, long, default_value = "0")]
    pub p: u32,

    /// Face shift
    #[arg(short, long, default_value = "0")]
    pub m: u32,

    /// Face rotation
    #[arg(short, long, default_value = "0")]
    pub t: u32,

    /// Print flat tetrahedron indices instead of (chunk, position) pairs
    #[arg(long, default_value = "false")]
    pub absolute: bool,

    /// Also print the gluing table as JSON
    #[arg(long, default_value = "false")]
    pub json: bool,
}

impl GenerateConfig {
    /// Creates a config for one parameter point, printing the relative table only.
    #[must_use]
    pub const fn new(params: TriangulationParams) -> Self {
        Self {
            n: params.n,
            s: params.s,
            p: params.p,
            m: params.m,
            t: params.t,
            absolute: false,
            json: false,
        }
    }

    /// Generator parameters.
    #[must_use]
    pub const fn params(&self) -> TriangulationParams {
        TriangulationParams::new(self.n, self.s, self.p, self.m, self.t)
    }
}

/// Sweep presets for quick testing.
#[derive(Debug, Clone)]
pub struct SweepPresets;

impl SweepPresets {
    /// Three combinations of six tetrahedra each.
    #[must_use]
    pub const fn tiny() -> SweepConfig {
        SweepConfig::new((1, 1), (2, 2))
    }

    /// Every combination with `n ≤ 2` and `r ≤ 3`.
    #[must_use]
    pub const fn small() -> SweepConfig {
        SweepConfig::new((1, 2), (2, 3))
    }
}
