//! Solscope Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Solscope model
//! builder, storage layout engine and diagram exporters. It includes:
//!
//! - **Identifiers**: Stable class ids and their generator ([`identifier`] module)
//! - **Model**: Classes, attributes, operators and associations ([`model`] module)
//! - **Catalog**: Name and path aware lookups over a set of classes ([`catalog`] module)
//! - **Storage**: Slot records produced by the layout engine ([`storage`] module)

pub mod catalog;
pub mod identifier;
pub mod model;
pub mod storage;
