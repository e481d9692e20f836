//! Error types for Solscope operations.
//!
//! [`SolscopeError`] is the error returned by the [`Solscope`](crate::Solscope)
//! facade. The layout engine and the connectivity filter report their own
//! failures through [`LayoutError`] and [`FilterError`], which carry the
//! offending name or type string.

use std::io;

use thiserror::Error;

use solscope_builder::BuildError;
use solscope_core::model::ClassStereotype;

/// The main error type for Solscope operations.
///
/// # Diagnostic Variants
///
/// The `Build` variant keeps the builder's structured diagnostics together with
/// the path of the source unit that failed, so they can be reported one by
/// one.
#[derive(Debug, Error)]
pub enum SolscopeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{path}: {err}")]
    Build { err: BuildError, path: String },

    #[error("Invalid source bundle: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SolscopeError {
    /// Create a new `Build` error for the source unit at `path`.
    pub fn new_build_error(err: BuildError, path: impl Into<String>) -> Self {
        Self::Build {
            err,
            path: path.into(),
        }
    }
}

/// Failures of the storage layout engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("contract `{0}` not found")]
    ContractNotFound(String),

    #[error("`{name}` is {stereotype}; only contracts and structs have a storage layout")]
    NotLayoutable {
        name: String,
        stereotype: ClassStereotype,
    },

    #[error("parent contract `{parent}` of `{child}` not found")]
    ParentNotFound { parent: String, child: String },

    #[error("type `{type_name}` used in `{context}` not found")]
    UnknownType { type_name: String, context: String },

    #[error("unknown elementary type `{0}`")]
    UnknownElementary(String),

    #[error("struct `{0}` contains itself")]
    RecursiveStruct(String),
}

/// Failures of the connectivity filter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("root class `{0}` not found")]
    RootNotFound(String),
}
