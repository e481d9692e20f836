//! Semantic model builder for Solidity sources.
//!
//! Turns the syntax tree of a source unit, as produced by an external Solidity
//! parser, into the [`Class`](solscope_core::model::Class) entities of the
//! structural model. Type usages and inter-type references are recovered by
//! walking declarations, statements and expressions.
//!
//! # Example
//!
//! ```rust
//! use solscope_builder::{Builder, ImportMode, ImportResolver, ast::Node};
//! use solscope_core::identifier::IdGenerator;
//!
//! let root: Node = serde_json::from_str(
//!     r#"{ "type": "SourceUnit", "children": [
//!         { "type": "ContractDefinition", "name": "Vault", "kind": "contract",
//!           "baseContracts": [], "subNodes": [] }
//!     ] }"#,
//! )
//! .unwrap();
//!
//! let ids = IdGenerator::new();
//! let imports = ImportResolver::new(ImportMode::Flattened);
//! let classes = Builder::new(&ids, &imports).build(&root, "src/Vault.sol").unwrap();
//! assert_eq!(classes[0].name(), "Vault");
//! ```

pub mod ast;
pub mod error;
pub mod type_name;

mod associations;
mod builder;
mod imports;

pub use builder::{Builder, parse_visibility};
pub use error::BuildError;
pub use imports::{DEFAULT_INCLUDE_DIR, ImportMode, ImportResolver};

use solscope_core::{identifier::IdGenerator, model::Class};

/// Builds the classes of one source unit.
///
/// Shorthand for a [`Builder`] over an [`ImportResolver`] with default include
/// directories. Pass the same `ids` to every call that contributes to one
/// model.
///
/// # Errors
///
/// See [`Builder::build`].
pub fn build(
    ids: &IdGenerator,
    root: &ast::Node,
    relative_path: &str,
    mode: ImportMode,
) -> Result<Vec<Class>, BuildError> {
    let imports = ImportResolver::new(mode);
    Builder::new(ids, &imports).build(root, relative_path)
}
