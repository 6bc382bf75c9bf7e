//! Daily influent composition for a sewershed.
//!
//! Five additive terms are computed per day: domestic and industrial base
//! flow (BWF), rainfall-derived inflow (RDI), groundwater infiltration (GWI)
//! driven by the seasonal alpha signal, and rainfall-induced infiltration
//! (RII) driven by an exponentially decayed rainfall history. The
//! [`influent::InfluentAggregator`] sums them and converts to MGD.

pub mod components;
pub mod convolution;
pub mod influent;
pub mod weekday;

pub use components::{FlowComponentCalculator, FlowComponents, FlowParameters, SingularityPolicy};
pub use influent::{InfluentAggregator, InfluentRecord};
pub use weekday::WeekdayFractions;
