pub mod levels;
pub mod series;
pub mod tick;
pub mod trend;

pub use levels::{estimate, Levels};
pub use series::generate;
pub use tick::{advance, percent_change};
pub use trend::classify;

/// Round to cents, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
