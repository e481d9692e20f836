//! Diagram serialization.
//!
//! Exporters consume only the public model: the classes of a (possibly
//! filtered) model, or a computed storage layout.

pub mod dot;
