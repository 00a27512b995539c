pub mod instrument;
pub mod window;

pub use instrument::{InstrumentSeed, InstrumentState, Trend, DEFAULT_VOLATILITY};
pub use window::PriceWindow;
