use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::window::PriceWindow;

pub const DEFAULT_VOLATILITY: f64 = 0.02;

fn default_volatility() -> f64 {
    DEFAULT_VOLATILITY
}

/// Static description an instrument is created from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InstrumentSeed {
    pub symbol: String,
    pub display_name: String,
    pub base_price: f64,
    pub high: f64,
    pub low: f64,
    #[serde(default)]
    pub initial_change: f64,
    #[serde(default = "default_volatility")]
    pub volatility: f64,
    /// Display-only volume label, e.g. "1.2M".
    #[serde(default)]
    pub volume: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One instrument at a point in time. Replaced wholesale on every tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentState {
    pub symbol: String,
    pub display_name: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub high: f64,
    pub low: f64,
    pub volume: String,
    pub window: PriceWindow,
    pub best_buy: f64,
    pub best_sell: f64,
    pub trend: Trend,
}

impl InstrumentState {
    /// Price before `change` was accumulated.
    pub fn baseline(&self) -> f64 {
        self.price - self.change
    }

    pub fn abs_change_percent(&self) -> f64 {
        self.change_percent.abs()
    }
}
