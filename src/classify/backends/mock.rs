//! Mock classifier for testing.
//!
//! Returns a scripted verdict and records what it was asked, so census
//! drivers can be tested without running a topology engine.

use crate::classify::traits::{Classification, GluingTable, ManifoldClassifier};

/// Mock classifier errors
#[derive(Debug, thiserror::Error)]
pub enum MockClassifierError {
    /// Failure requested by the test script
    #[error("Scripted failure on call {0}")]
    Scripted(usize),
}

/// Mock classifier for testing
#[derive(Debug, Clone)]
pub struct MockClassifier {
    verdict: Classification,
    fail_on: Vec<usize>,
    calls: Vec<usize>,
}

impl MockClassifier {
    /// Create a mock answering every call with `verdict`
    #[must_use]
    pub const fn new(verdict: Classification) -> Self {
        Self {
            verdict,
            fail_on: Vec::new(),
            calls: Vec::new(),
        }
    }

    /// Create a mock that reports a hyperbolic manifold
    #[must_use]
    pub fn hyperbolic() -> Self {
        Self::new(Classification::manifold(
            Some(2.029_883_212_819_307),
            Some("Z_5".to_string()),
        ))
    }

    /// Fail the calls with these zero-based indices
    #[must_use]
    pub fn failing_on(mut self, calls: &[usize]) -> Self {
        self.fail_on.extend_from_slice(calls);
        self
    }

    /// Tetrahedron counts of every table received, in call order
    #[must_use]
    pub fn calls(&self) -> &[usize] {
        &self.calls
    }
}

impl ManifoldClassifier for MockClassifier {
    type Error = MockClassifierError;

    fn name(&self) -> &'static str {
        "mock"
    }

    fn classify(&mut self, table: &GluingTable) -> Result<Classification, Self::Error> {
        let call = self.calls.len();
        self.calls.push(table.len());
        if self.fail_on.contains(&call) {
            return Err(MockClassifierError::Scripted(call));
        }
        Ok(self.verdict.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mock_records_calls() {
        let mut mock = MockClassifier::new(Classification::invalid());
        let table = GluingTable::new(Vec::new());
        assert_eq!(mock.classify(&table).unwrap(), Classification::invalid());
        assert_eq!(mock.classify(&table).unwrap(), Classification::invalid());
        assert_eq!(mock.calls(), &[0, 0]);
        assert_eq!(mock.name(), "mock");
    }

    #[test]
    fn test_mock_scripted_failure() {
        let mut mock = MockClassifier::hyperbolic().failing_on(&[1]);
        let table = GluingTable::new(Vec::new());
        assert!(mock.classify(&table).is_ok());
        assert!(matches!(
            mock.classify(&table),
            Err(MockClassifierError::Scripted(1))
        ));
        let verdict = mock.classify(&table).unwrap();
        assert_eq!(verdict.is_hyperbolic(), Some(true));
        assert_relative_eq!(verdict.volume.unwrap_or_default(), 2.029_883_212_819_307);
        assert_eq!(mock.calls().len(), 3);
    }
}
