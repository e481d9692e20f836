//! Accumulates diagnostics across the declarations of one source unit.

use crate::error::{BuildError, Diagnostic};

#[derive(Debug, Default)]
pub(crate) struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records the error of a fallible step and returns its value, if any.
    pub(crate) fn collect<T>(&mut self, result: Result<T, Diagnostic>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(diagnostic) => {
                self.diagnostics.push(diagnostic);
                None
            }
        }
    }

    /// Returns `value` if nothing was collected, the collected errors otherwise.
    pub(crate) fn finish<T>(self, value: T) -> Result<T, BuildError> {
        if self.diagnostics.is_empty() {
            Ok(value)
        } else {
            Err(BuildError::new(self.diagnostics))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_empty_is_ok() {
        let collector = DiagnosticCollector::new();
        assert_eq!(collector.finish(7).unwrap(), 7);
    }

    #[test]
    fn test_collector_keeps_all_errors() {
        let mut collector = DiagnosticCollector::new();
        assert_eq!(collector.collect(Ok::<_, Diagnostic>(1)), Some(1));
        assert_eq!(collector.collect(Err::<i32, _>(Diagnostic::error("a"))), None);
        assert_eq!(collector.collect(Err::<i32, _>(Diagnostic::error("b"))), None);

        let err = collector.finish(()).unwrap_err();
        assert_eq!(err.diagnostics().len(), 2);
    }
}
