use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::engine::{advance, classify, estimate, generate, percent_change, round2};
use crate::error::ScannerError;
use crate::model::{InstrumentSeed, InstrumentState, PriceWindow, Trend};
use crate::random::{RandomSource, SeededRandom};

pub const DEFAULT_WINDOW_LEN: usize = 60;

/// Aggregate view over the current instrument set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSummary {
    pub tracked: usize,
    pub bullish: usize,
    pub bearish: usize,
    pub neutral: usize,
    /// Symbol with the largest absolute percent move.
    pub top_mover: Option<String>,
    pub tick_count: u64,
    pub last_update: DateTime<Utc>,
    pub running: bool,
}

pub fn validate_seeds(seeds: &[InstrumentSeed]) -> Result<(), ScannerError> {
    let mut seen = HashSet::new();
    for seed in seeds {
        let invalid = |reason: &str| ScannerError::InvalidSeed {
            symbol: seed.symbol.clone(),
            reason: reason.to_string(),
        };
        if seed.symbol.trim().is_empty() {
            return Err(invalid("symbol must not be empty"));
        }
        if !seed.base_price.is_finite() || seed.base_price <= 0.0 {
            return Err(invalid("base_price must be a positive number"));
        }
        if !(seed.volatility > 0.0 && seed.volatility < 1.0) {
            return Err(invalid("volatility must lie in (0, 1)"));
        }
        if !seed.initial_change.is_finite() {
            return Err(invalid("initial_change must be finite"));
        }
        if !seed.high.is_finite() || !seed.low.is_finite() {
            return Err(invalid("high and low must be finite"));
        }
        if seed.high < seed.low {
            return Err(invalid("high must not be below low"));
        }
        if !seen.insert(seed.symbol.as_str()) {
            return Err(ScannerError::DuplicateSymbol(seed.symbol.clone()));
        }
    }
    Ok(())
}

/// Build the starting state for one seed.
///
/// The generated series is followed by the seed's own price, so the window
/// ends at the current price from the first snapshot on.
pub fn initialize_instrument<R: RandomSource + ?Sized>(
    seed: &InstrumentSeed,
    window_len: usize,
    rng: &mut R,
) -> InstrumentState {
    let series = generate(seed.base_price, seed.volatility, window_len, rng);
    let mut window = PriceWindow::from_samples(series);
    window.push(seed.base_price);
    let levels = estimate(window.iter());

    let change_percent = round2(percent_change(
        seed.initial_change,
        seed.base_price - seed.initial_change,
    ));

    InstrumentState {
        symbol: seed.symbol.clone(),
        display_name: seed.display_name.clone(),
        price: seed.base_price,
        change: seed.initial_change,
        change_percent,
        high: seed.high,
        low: seed.low,
        volume: seed.volume.clone(),
        window,
        best_buy: levels.best_buy,
        best_sell: levels.best_sell,
        trend: classify(change_percent),
    }
}

/// Validate `seeds` and build one state per seed, in seed order.
pub fn initialize<R: RandomSource + ?Sized>(
    seeds: &[InstrumentSeed],
    window_len: usize,
    rng: &mut R,
) -> Result<Vec<InstrumentState>, ScannerError> {
    if window_len == 0 {
        return Err(ScannerError::Config("window_len must be > 0".to_string()));
    }
    validate_seeds(seeds)?;
    Ok(seeds
        .iter()
        .map(|seed| initialize_instrument(seed, window_len, &mut *rng))
        .collect())
}

/// Advance every instrument one step. Order is preserved.
pub fn tick<R: RandomSource + ?Sized>(
    current: &[InstrumentState],
    rng: &mut R,
) -> Vec<InstrumentState> {
    current.iter().map(|s| advance(s, &mut *rng)).collect()
}

/// Sort by absolute percent move, largest first. Ties keep input order.
pub fn rank(states: &[InstrumentState]) -> Vec<InstrumentState> {
    let mut ranked = states.to_vec();
    ranked.sort_by(|a, b| b.abs_change_percent().total_cmp(&a.abs_change_percent()));
    ranked
}

/// First entry of [`rank`] without sorting.
pub fn top_mover(states: &[InstrumentState]) -> Option<&InstrumentState> {
    states.iter().reduce(|best, s| {
        if s.abs_change_percent() > best.abs_change_percent() {
            s
        } else {
            best
        }
    })
}

pub fn summarize(
    states: &[InstrumentState],
    tick_count: u64,
    last_update: DateTime<Utc>,
    running: bool,
) -> MarketSummary {
    let count = |trend: Trend| states.iter().filter(|s| s.trend == trend).count();
    MarketSummary {
        tracked: states.len(),
        bullish: count(Trend::Bullish),
        bearish: count(Trend::Bearish),
        neutral: count(Trend::Neutral),
        top_mover: top_mover(states).map(|s| s.symbol.clone()),
        tick_count,
        last_update,
        running,
    }
}

/// Owns the instrument set and the random source driving it.
pub struct MarketSimulator<R: RandomSource = SeededRandom> {
    states: Vec<InstrumentState>,
    rng: R,
    running: bool,
    tick_count: u64,
    last_update: DateTime<Utc>,
}

impl<R: RandomSource> MarketSimulator<R> {
    pub fn new(seeds: &[InstrumentSeed], window_len: usize, mut rng: R) -> Result<Self, ScannerError> {
        let states = initialize(seeds, window_len, &mut rng)?;
        tracing::info!(
            instruments = states.len(),
            window_len,
            "Market simulator initialized"
        );
        Ok(Self {
            states,
            rng,
            running: true,
            tick_count: 0,
            last_update: Utc::now(),
        })
    }

    /// Advance all instruments if running. Returns whether a tick was applied.
    ///
    /// The new collection is computed in full before it replaces the old one.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        let next = tick(&self.states, &mut self.rng);
        self.states = next;
        self.tick_count += 1;
        self.last_update = Utc::now();
        tracing::debug!(
            tick = self.tick_count,
            top_mover = ?top_mover(&self.states).map(|s| s.symbol.as_str()),
            "Simulation tick"
        );
        true
    }

    pub fn set_running(&mut self, running: bool) {
        if self.running != running {
            tracing::info!(running, "Simulation running flag changed");
        }
        self.running = running;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// States ranked by absolute percent move.
    pub fn snapshot(&self) -> Vec<InstrumentState> {
        rank(&self.states)
    }

    /// States in seed order.
    pub fn states(&self) -> &[InstrumentState] {
        &self.states
    }

    pub fn summary(&self) -> MarketSummary {
        summarize(&self.states, self.tick_count, self.last_update, self.running)
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn last_update(&self) -> DateTime<Utc> {
        self.last_update
    }
}
