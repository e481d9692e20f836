//! Structural model of a Solidity code base.
//!
//! The model is produced by the builder from a parsed syntax tree and is the
//! input of the connectivity filter, the storage layout engine and the class
//! diagram exporter.
//!
//! # Organization
//!
//! - [`class`] - [`Class`] entities and their [`ClassStereotype`]
//! - [`member`] - [`Attribute`]s, [`Operator`]s and [`Parameter`]s
//! - [`association`] - [`Association`]s between classes

pub mod association;
pub mod class;
pub mod member;

pub use association::*;
pub use class::*;
pub use member::*;
