//! Core compute primitives.
//!
//! Dense row-major storage shared by the contingency table and the
//! correspondence analysis engine.

mod matrix;

pub use matrix::Matrix;
