//! Parameter-space sweep.
//!
//! Walks every `(r, s, n, m, t)` combination in a fixed nested order, builds
//! and classifies one triangulation per combination, and streams the verdicts
//! to the console and to a CSV file.

use crate::classify::traits::{Classification, ManifoldClassifier};
use crate::config::SweepConfig;
use crate::errors::CensusResult;
use crate::triangulation::generator::{Triangulation, TriangulationParams};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Column names of the CSV output, in row order.
pub const CSV_HEADER: &str = "n, r, s, m, t, Manifold, Hyperbolic, Volume, HomologyH1";

const NOT_APPLICABLE: &str = "N/A";

/// One point of the parameter space, named the way the sweep enumerates it.
///
/// `r = s + p` is the total number of subdivisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CensusParams {
    /// Faces per hemisphere
    pub n: u32,
    /// Total subdivisions
    pub r: u32,
    /// Longitudinal subdivisions
    pub s: u32,
    /// Face shift
    pub m: u32,
    /// Face rotation
    pub t: u32,
}

impl CensusParams {
    /// Creates a parameter point.
    #[must_use]
    pub const fn new(n: u32, r: u32, s: u32, m: u32, t: u32) -> Self {
        Self { n, r, s, m, t }
    }

    /// Equatorial subdivisions `r - s`.
    #[must_use]
    pub const fn p(&self) -> u32 {
        self.r.saturating_sub(self.s)
    }

    /// Generator parameters for this point.
    #[must_use]
    pub const fn triangulation_params(&self) -> TriangulationParams {
        TriangulationParams::new(self.n, self.s, self.p(), self.m, self.t)
    }
}

impl From<TriangulationParams> for CensusParams {
    fn from(params: TriangulationParams) -> Self {
        Self::new(params.n, params.s + params.p, params.s, params.m, params.t)
    }
}

impl fmt::Display for CensusParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "R={}, N={}, S={}, M={}, T={}",
            self.r, self.n, self.s, self.m, self.t
        )
    }
}

/// Inclusive ranges of `n` and `r` to sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterSpace {
    n_range: (u32, u32),
    r_range: (u32, u32),
}

impl ParameterSpace {
    /// Creates the space for `n ∈ n_range`, `r ∈ r_range` (both inclusive).
    #[must_use]
    pub const fn new(n_range: (u32, u32), r_range: (u32, u32)) -> Self {
        Self { n_range, r_range }
    }

    /// Every combination in sweep order: `r` outermost, then `s ∈ [1, r-1]`,
    /// `n`, `m ∈ [0, n-1]` and innermost `t ∈ [0, r+s-1]`.
    pub fn iter(&self) -> impl Iterator<Item = CensusParams> + use<> {
        let (n_min, n_max) = self.n_range;
        let (r_min, r_max) = self.r_range;
        (r_min..=r_max).flat_map(move |r| {
            (1..r).flat_map(move |s| {
                (n_min..=n_max).flat_map(move |n| {
                    (0..n).flat_map(move |m| {
                        (0..r + s).map(move |t| CensusParams::new(n, r, s, m, t))
                    })
                })
            })
        })
    }

    /// Number of combinations.
    #[must_use]
    pub fn len(&self) -> usize {
        let (n_min, n_max) = self.n_range;
        let (r_min, r_max) = self.r_range;
        let n_total: usize = (n_min..=n_max).map(|n| n as usize).sum();
        (r_min..=r_max)
            .flat_map(|r| (1..r).map(move |s| (r + s) as usize))
            .map(|t_count| t_count * n_total)
            .sum()
    }

    /// Whether the space has no combinations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IntoIterator for &ParameterSpace {
    type Item = CensusParams;
    type IntoIter = Box<dyn Iterator<Item = CensusParams>>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Result of evaluating one parameter point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CensusRecord {
    /// Where in the space this record sits
    pub params: CensusParams,
    /// Tetrahedra in the generated triangulation
    pub tetrahedra: usize,
    /// Classifier verdict
    pub classification: Classification,
}

fn flag(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "True",
        Some(false) => "False",
        None => NOT_APPLICABLE,
    }
}

impl CensusRecord {
    /// `Manifold` column.
    #[must_use]
    pub fn manifold_field(&self) -> &'static str {
        flag(self.classification.is_manifold)
    }

    /// `Hyperbolic` column.
    #[must_use]
    pub fn hyperbolic_field(&self) -> &'static str {
        flag(self.classification.is_hyperbolic())
    }

    /// `Volume` column.
    #[must_use]
    pub fn volume_field(&self) -> String {
        self.classification
            .volume
            .map_or_else(|| NOT_APPLICABLE.to_string(), |volume| volume.to_string())
    }

    /// `HomologyH1` column.
    #[must_use]
    pub fn homology_field(&self) -> &str {
        self.classification
            .homology_h1
            .as_deref()
            .unwrap_or(NOT_APPLICABLE)
    }

    /// One CSV row without the line terminator.
    #[must_use]
    pub fn csv_row(&self) -> String {
        let CensusParams { n, r, s, m, t } = self.params;
        [
            n.to_string(),
            r.to_string(),
            s.to_string(),
            m.to_string(),
            t.to_string(),
            self.manifold_field().to_string(),
            self.hyperbolic_field().to_string(),
            self.volume_field(),
            self.homology_field().to_string(),
        ]
        .join(", ")
    }

    /// Writes the multi-line console report.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn write_report<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self.params)?;
        writeln!(out, "Manifold?\t{}", self.manifold_field())?;
        writeln!(out, "Hyperbolic?\t{}", self.hyperbolic_field())?;
        writeln!(out, "Volume:\t\t{}", self.volume_field())?;
        writeln!(out, "HomologyH1:\t{}", self.homology_field())
    }
}

/// Generates, normalizes and classifies the triangulation at `params`.
///
/// A classifier failure does not abort: it is logged and recorded as an
/// all-`N/A` verdict.
///
/// # Errors
///
/// Returns an error if the generated triangulation fails its gluing checks.
pub fn evaluate<C: ManifoldClassifier>(
    params: CensusParams,
    classifier: &mut C,
) -> CensusResult<CensusRecord> {
    let table = Triangulation::generate(params.triangulation_params())?
        .into_absolute()
        .gluing_table();

    let classification = match classifier.classify(&table) {
        Ok(classification) => classification,
        Err(e) => {
            log::warn!("{} classifier failed at {params}: {e}", classifier.name());
            Classification::unknown()
        }
    };

    Ok(CensusRecord {
        params,
        tetrahedra: table.len(),
        classification,
    })
}

/// Streams records as CSV rows after a single header row.
#[derive(Debug)]
pub struct CsvSink<W: Write> {
    writer: W,
    rows: usize,
}

impl<W: Write> CsvSink<W> {
    /// Wraps `writer` and writes the header.
    ///
    /// # Errors
    ///
    /// Returns any error from writing the header.
    pub fn new(mut writer: W) -> io::Result<Self> {
        writeln!(writer, "{CSV_HEADER}")?;
        Ok(Self { writer, rows: 0 })
    }

    /// Appends one row.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn write_record(&mut self, record: &CensusRecord) -> io::Result<()> {
        writeln!(self.writer, "{}", record.csv_row())?;
        self.rows += 1;
        Ok(())
    }

    /// Rows written so far, header excluded.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Flushes and returns the writer.
    ///
    /// # Errors
    ///
    /// Returns any error from flushing.
    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Tallies of a finished sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CensusSummary {
    /// Combinations evaluated
    pub combinations: usize,
    /// Combinations classified as manifolds
    pub manifolds: usize,
    /// Manifolds classified as hyperbolic
    pub hyperbolic: usize,
    /// Combinations the classifier could not decide
    pub failures: usize,
}

impl CensusSummary {
    /// Counts one record.
    pub fn record(&mut self, record: &CensusRecord) {
        self.combinations += 1;
        match record.classification.is_manifold {
            Some(true) => self.manifolds += 1,
            Some(false) => {}
            None => self.failures += 1,
        }
        if record.classification.is_hyperbolic() == Some(true) {
            self.hyperbolic += 1;
        }
    }
}

impl fmt::Display for CensusSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} combinations, {} manifolds, {} hyperbolic, {} unclassified",
            self.combinations, self.manifolds, self.hyperbolic, self.failures
        )
    }
}

/// Runs a full sweep.
///
/// Reports go to `console` unless the config is quiet; rows go to the
/// configured CSV file, which is flushed and closed before returning.
///
/// # Errors
///
/// Returns [`CensusError::InvalidConfig`](crate::errors::CensusError::InvalidConfig)
/// for bad ranges, and I/O or generation errors as they occur.
pub fn run_census<C, W>(
    config: &SweepConfig,
    classifier: &mut C,
    console: &mut W,
) -> CensusResult<CensusSummary>
where
    C: ManifoldClassifier,
    W: Write + ?Sized,
{
    config.validate()?;
    let space = ParameterSpace::new(config.n_range(), config.r_range());
    log::info!(
        "Sweeping {} combinations (n in {:?}, r in {:?}) with the {} classifier",
        space.len(),
        config.n_range(),
        config.r_range(),
        classifier.name()
    );

    let mut sink = match &config.output {
        Some(path) => {
            log::info!("Writing results to {}", path.display());
            Some(CsvSink::new(BufWriter::new(File::create(path)?))?)
        }
        None => None,
    };

    let mut summary = CensusSummary::default();
    for params in &space {
        let record = evaluate(params, classifier)?;
        log::debug!(
            "{params}: {} tetrahedra, manifold {}",
            record.tetrahedra,
            record.manifold_field()
        );

        if !config.quiet {
            record.write_report(console)?;
        }
        if let Some(sink) = sink.as_mut() {
            sink.write_record(&record)?;
        }
        summary.record(&record);
    }

    if let Some(sink) = sink {
        sink.finish()?;
    }
    console.flush()?;

    log::info!("Sweep finished: {summary}");
    Ok(summary)
}
