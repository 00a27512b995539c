use crate::model::Trend;

/// Percent move (in percentage points) beyond which a trend is called.
pub const TREND_THRESHOLD_PCT: f64 = 0.1;

/// Classify a percent change. The thresholds themselves are neutral.
pub fn classify(change_percent: f64) -> Trend {
    if change_percent > TREND_THRESHOLD_PCT {
        Trend::Bullish
    } else if change_percent < -TREND_THRESHOLD_PCT {
        Trend::Bearish
    } else {
        Trend::Neutral
    }
}
