use crate::model::{InstrumentSeed, DEFAULT_VOLATILITY};

fn seed(
    symbol: &str,
    display_name: &str,
    base_price: f64,
    initial_change: f64,
    high: f64,
    low: f64,
    volume: &str,
) -> InstrumentSeed {
    InstrumentSeed {
        symbol: symbol.to_string(),
        display_name: display_name.to_string(),
        base_price,
        high,
        low,
        initial_change,
        volatility: DEFAULT_VOLATILITY,
        volume: volume.to_string(),
    }
}

/// CME micro futures tracked when no instruments are configured.
pub fn default_seeds() -> Vec<InstrumentSeed> {
    vec![
        seed("MES", "Micro E-mini S&P 500", 6012.75, 18.50, 6025.00, 5998.25, "1.2M"),
        seed("MNQ", "Micro E-mini Nasdaq-100", 21458.25, -42.75, 21525.00, 21380.50, "892K"),
        seed("MYM", "Micro E-mini Dow", 44215.00, 156.00, 44350.00, 44050.00, "456K"),
        seed("M2K", "Micro E-mini Russell 2000", 2298.40, -8.20, 2315.00, 2285.60, "234K"),
        seed("MGC", "Micro Gold", 2948.30, 12.40, 2955.00, 2932.80, "178K"),
        seed("MCL", "Micro Crude Oil", 71.24, -0.86, 72.45, 70.88, "567K"),
    ]
}
