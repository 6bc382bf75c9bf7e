//! Seasonal signal derivation for the influent flow model.
//!
//! Raw groundwater level readings are averaged per calendar month,
//! min-max normalized, power transformed, anchored mid-month and then
//! interpolated back to daily resolution with a shape-preserving cubic.
//! The daily result ("alpha") drives groundwater infiltration downstream.

pub mod interpolation;
pub mod monthly;
pub mod seasonal;

pub use seasonal::{SeasonalParams, SeasonalSignal, SeasonalSignalBuilder};
