//! Core types shared by the influent flow model crates.
//!
//! Daily series, the CSV records the command layer reads, and the
//! [`error::ModelError`] taxonomy every stage reports through.

pub mod date_range;
pub mod error;
pub mod observation;
pub mod series;
