pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod instrument_catalog;
pub mod model;
pub mod random;
pub mod runner;
pub mod simulator;

pub use simulator::{initialize, tick, MarketSimulator};
