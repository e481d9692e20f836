//! Error and diagnostic system for the model builder.
//!
//! The builder reports problems as [`Diagnostic`]s: a message, an optional
//! [`ErrorCode`] and optional help text. Diagnostics from every top-level
//! declaration of a source unit are collected and returned together as a
//! [`BuildError`], so one bad contract does not hide problems in the next.
//!
//! # Example
//!
//! ```
//! # use solscope_builder::error::{Diagnostic, ErrorCode};
//! let diag = Diagnostic::error("invalid visibility `protected`")
//!     .with_code(ErrorCode::E300)
//!     .with_help("use public, external, internal or private");
//! assert_eq!(diag.code(), Some(ErrorCode::E300));
//! ```

mod build_error;
mod collector;
mod diagnostic;
mod error_code;

pub(crate) use build_error::Result;
pub(crate) use collector::DiagnosticCollector;

pub use build_error::BuildError;
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
