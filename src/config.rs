// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rotables Kit Engine - Engine Configuration

//! Tunables for allocation and hub replenishment.
//!
//! Every field has a default, so a partial JSON file only overrides what it
//! names. Call [`EngineConfig::validate`] before handing a config to the engine.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use crate::types::{AirportCode, PerClass, ServiceClass};

/// 30 days of hourly rounds.
pub const DEFAULT_SIMULATION_END_HOURS: u32 = 720;
pub const DEFAULT_SAFETY_MARGIN_HOURS: u32 = 2;
pub const DEFAULT_LOOKAHEAD_HOURS: u32 = 36;
pub const DEFAULT_LOW_VALUE_CUTOFF_HOURS: u32 = 18;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("simulation end must be positive")]
    ZeroSimulationEnd,

    #[error("{class}: purchase buffer {buffer} is negative")]
    NegativeBuffer { class: ServiceClass, buffer: Decimal },

    #[error("{class}: horizon {horizon}h is shorter than lead time {lead_time}h")]
    HorizonBeforeLeadTime { class: ServiceClass, horizon: u32, lead_time: u32 },
}

// ---------------------------------------------------------------------------
// PurchaseTunables
// ---------------------------------------------------------------------------

/// Per-class hub replenishment knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseTunables {
    /// Hours between ordering and the kits becoming usable at the hub.
    pub lead_time_hours: u32,
    /// Forecast window for demand and incoming supply.
    pub horizon_hours: u32,
    /// Relative buffer on top of forecast demand (0.1 = +10%).
    pub buffer: Decimal,
    /// Fixed extra kits on top of the buffered demand.
    pub extra_margin: u32,
}

impl Default for PurchaseTunables {
    fn default() -> Self {
        Self {
            lead_time_hours: 24,
            horizon_hours: 48,
            buffer: dec!(0.10),
            extra_margin: 0,
        }
    }
}

fn default_purchase_tunables() -> PerClass<PurchaseTunables> {
    PerClass::new(
        PurchaseTunables { lead_time_hours: 48, horizon_hours: 72, buffer: dec!(0.10), extra_margin: 2 },
        PurchaseTunables { lead_time_hours: 36, horizon_hours: 60, buffer: dec!(0.10), extra_margin: 5 },
        PurchaseTunables { lead_time_hours: 24, horizon_hours: 48, buffer: dec!(0.08), extra_margin: 5 },
        PurchaseTunables { lead_time_hours: 12, horizon_hours: 36, buffer: dec!(0.05), extra_margin: 20 },
    )
}

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// The only airport replenished by purchase.
    pub hub: AirportCode,
    /// Absolute hour at which the run ends.
    pub simulation_end_hours: u32,
    /// Added to every post-flight processing time.
    pub safety_margin_hours: u32,
    /// Destination demand window for hub departures, anchored at arrival.
    pub lookahead_hours: u32,
    /// No lowest-value purchases once fewer hours than this remain.
    pub low_value_cutoff_hours: u32,
    /// Classes missing from the file keep their own per-class defaults.
    #[serde(deserialize_with = "purchase_over_defaults")]
    pub purchase: PerClass<PurchaseTunables>,
}

fn purchase_over_defaults<'de, D>(deserializer: D) -> Result<PerClass<PurchaseTunables>, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = PerClass::<Option<PurchaseTunables>>::deserialize(deserializer)?;
    let defaults = default_purchase_tunables();
    Ok(PerClass::from_fn(|class| overrides[class].unwrap_or(defaults[class])))
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hub: AirportCode::from("HUB1"),
            simulation_end_hours: DEFAULT_SIMULATION_END_HOURS,
            safety_margin_hours: DEFAULT_SAFETY_MARGIN_HOURS,
            lookahead_hours: DEFAULT_LOOKAHEAD_HOURS,
            low_value_cutoff_hours: DEFAULT_LOW_VALUE_CUTOFF_HOURS,
            purchase: default_purchase_tunables(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simulation_end_hours == 0 {
            return Err(ConfigError::ZeroSimulationEnd);
        }
        for (class, t) in self.purchase.iter() {
            if t.buffer < Decimal::ZERO {
                return Err(ConfigError::NegativeBuffer { class, buffer: t.buffer });
            }
            if t.horizon_hours < t.lead_time_hours {
                return Err(ConfigError::HorizonBeforeLeadTime {
                    class,
                    horizon: t.horizon_hours,
                    lead_time: t.lead_time_hours,
                });
            }
        }
        Ok(())
    }
}
