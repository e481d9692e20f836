//! Error adapter for converting SolscopeError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! When a [`solscope_builder::BuildError`] contains multiple diagnostics, each
//! diagnostic is rendered independently, prefixed by the path of the source
//! unit that produced it.

use std::fmt;

use miette::{
    Diagnostic as MietteDiagnostic, GraphicalReportHandler, GraphicalTheme, LabeledSpan,
};

use solscope::SolscopeError;
use solscope_builder::error::Diagnostic;

/// Adapter for a single builder diagnostic.
///
/// Builder diagnostics carry no spans, so only the code and help text are
/// forwarded to miette.
pub struct DiagnosticAdapter<'a> {
    diag: &'a Diagnostic,
    /// Source unit the diagnostic belongs to
    path: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter.
    pub fn new(diag: &'a Diagnostic, path: &'a str) -> Self {
        Self { diag, path }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .field("path", &self.path)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }
}

/// Adapter for non-diagnostic [`SolscopeError`] variants.
///
/// This adapter handles errors that don't have builder diagnostics, such as
/// I/O errors, malformed bundles, layout errors and filter errors.
pub struct ErrorAdapter<'a>(pub &'a SolscopeError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            SolscopeError::Io(_) => "solscope::io",
            SolscopeError::Build { .. } => "solscope::build",
            SolscopeError::Json(_) => "solscope::json",
            SolscopeError::Layout(_) => "solscope::layout",
            SolscopeError::Filter(_) => "solscope::filter",
            SolscopeError::Config(_) => "solscope::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            SolscopeError::Json(_) => Some(Box::new(
                "expected a JSON list of { \"path\", \"ast\" } entries",
            )),
            _ => None,
        }
    }
}

/// A reportable error that can be rendered by miette.
///
/// This enum wraps either a single diagnostic or a non-diagnostic error,
/// providing a uniform interface for error rendering.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A builder diagnostic.
    Diagnostic(DiagnosticAdapter<'a>),
    /// Any other error.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Convert a [`SolscopeError`] into a list of reportable errors.
///
/// For [`SolscopeError::Build`], this returns one [`Reportable`] for
/// each diagnostic in the error. For other error variants, this returns a
/// single [`Reportable`].
pub fn to_reportables(err: &SolscopeError) -> Vec<Reportable<'_>> {
    match err {
        SolscopeError::Build {
            err: build_err,
            path,
        } if !build_err.diagnostics().is_empty() => build_err
            .diagnostics()
            .iter()
            .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d, path)))
            .collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

/// Renders every reportable of `err` into its own report string.
///
/// A report the handler fails to draw falls back to its plain message.
pub fn render(err: &SolscopeError, theme: GraphicalTheme) -> Vec<String> {
    let handler = GraphicalReportHandler::new_themed(theme);
    to_reportables(err)
        .iter()
        .map(|reportable| {
            let mut report = String::new();
            match handler.render_report(&mut report, reportable) {
                Ok(()) => report,
                Err(_) => reportable.to_string(),
            }
        })
        .collect()
}
