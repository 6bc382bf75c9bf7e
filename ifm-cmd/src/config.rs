//! TOML configuration for the model constants.
//!
//! Every field is optional; anything left out keeps the calibrated default.
//!
//! ```toml
//! [seasonal]
//! beta = 0.33
//! month_window = 24
//! start = "2023-01-01"
//! end = "2024-12-31"
//!
//! [flow]
//! population = 507648.0
//! kd = 0.15
//! singularity_policy = "flag"
//!
//! [flow.industrial_fractions]
//! Mon = 1.0
//! Tue = 1.0
//! Wed = 1.0
//! Thu = 1.0
//! Fri = 1.2
//! Sat = 0.25
//! Sun = 0.25
//!
//! [output]
//! m3_per_mgd = 3785.41
//! ```

use anyhow::Context;
use ifm_data::SeasonalParams;
use ifm_flow::{influent::M3_PER_MILLION_GALLONS, FlowParameters};
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub seasonal: SeasonalParams,
    pub flow: FlowParameters,
    pub output: OutputParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputParams {
    /// Cubic metres per million gallons, for the MGD column.
    pub m3_per_mgd: f64,
}

impl Default for OutputParams {
    fn default() -> Self {
        Self {
            m3_per_mgd: M3_PER_MILLION_GALLONS,
        }
    }
}

impl Config {
    /// Read `path`, or fall back to the defaults when no path is given.
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {path}"))?;
                let config =
                    Self::from_toml_str(&text).with_context(|| format!("parsing config {path}"))?;
                info!("loaded configuration from {path}");
                Ok(config)
            }
            None => {
                info!("no configuration file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.seasonal.validate()?;
        config.flow.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
