//! Graphviz `dot` emitters.
//!
//! Both diagrams use record-shaped nodes. Output is order-preserving: nodes
//! and edges appear in the order of the input classes and layouts, so equal
//! inputs always produce byte-equal text.
//!
//! # Example
//!
//! ```
//! use solscope::{config::ClassDiagramConfig, export::dot};
//! use solscope_core::{identifier::IdGenerator, model::{Class, ClassStereotype}};
//!
//! let ids = IdGenerator::new();
//! let vault = Class::new(ids.next_id(), "Vault", ClassStereotype::Contract, "/v.sol", "v.sol");
//!
//! let text = dot::class_diagram(&[&vault], &ClassDiagramConfig::default());
//! assert!(text.starts_with("digraph UmlClassDiagram {"));
//! ```

mod class;
mod storage;

pub use class::{ClassDiagram, class_diagram};
pub use storage::{StorageDiagram, storage_diagram};

use std::fmt;

/// Escapes the characters that have a meaning inside a quoted record label.
pub fn escape_label(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '{' | '}' | '<' | '>' | '|' | '"') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Writes the opening of a digraph with the shared node style.
fn write_header(f: &mut fmt::Formatter<'_>, name: &str, rankdir: &str) -> fmt::Result {
    writeln!(f, "digraph {name} {{")?;
    writeln!(f, "rankdir={rankdir}")?;
    writeln!(f, "color=black")?;
    writeln!(f, "arrowhead=open")?;
    writeln!(f, "node [shape=record, style=filled, fillcolor=gray95]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_label() {
        assert_eq!(escape_label("mapping(address=>uint256)"), "mapping(address=\\>uint256)");
        assert_eq!(escape_label("a{b}|\"c\"<d>"), "a\\{b\\}\\|\\\"c\\\"\\<d\\>");
        assert_eq!(escape_label("plain"), "plain");
    }
}
