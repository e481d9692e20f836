//! Error codes for the builder diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E1xx` - Tree shape errors
//! - `E2xx` - Type name errors
//! - `E3xx` - Declaration errors

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Tree Shape Errors (E1xx)
    // =========================================================================
    /// Root is not a source unit.
    ///
    /// The builder only accepts a `SourceUnit` node as the root of a tree.
    E100,

    /// Unknown contract kind.
    ///
    /// A contract definition's kind was not `contract`, `interface`,
    /// `library` or `abstract`.
    E101,

    // =========================================================================
    // Type Name Errors (E2xx)
    // =========================================================================
    /// Unsupported type name kind.
    ///
    /// A type name node had a kind the resolver does not know. This means the
    /// parser and the model disagree and must not be silently absorbed.
    E200,

    // =========================================================================
    // Declaration Errors (E3xx)
    // =========================================================================
    /// Invalid visibility.
    ///
    /// A visibility keyword other than `default`, `public`, `external`,
    /// `internal` or `private` was found.
    E300,

    /// Missing type name.
    ///
    /// A state variable, struct member or parameter has no type name.
    E301,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E100").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E200 => "E200",
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "root is not a source unit",
            ErrorCode::E101 => "unknown contract kind",
            ErrorCode::E200 => "unsupported type name",
            ErrorCode::E300 => "invalid visibility",
            ErrorCode::E301 => "missing type name",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
