use serde::Serialize;

use super::round2;

/// Fraction of the distance from the extreme towards the mean.
pub const LEVEL_PULL: f64 = 0.3;

/// Suggested entry (support) and exit (resistance) prices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Levels {
    pub best_buy: f64,
    pub best_sell: f64,
}

/// Support/resistance from a window of prices.
///
/// ```text
/// best_buy  = min + (mean - min) * 0.3
/// best_sell = max - (max - mean) * 0.3
/// ```
///
/// Both are rounded to cents (half away from zero). Rounding is monotone,
/// so `best_buy <= best_sell` always holds; against `min`/`max` the bounds
/// hold to within half a cent. A constant window `[p; n]` collapses to
/// `p` rounded to cents, which is `p` itself only for cent-priced `p`.
///
/// Panics on an empty window.
pub fn estimate<I>(samples: I) -> Levels
where
    I: IntoIterator<Item = f64>,
{
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    let mut sum = 0.0;
    let mut count = 0usize;
    for p in samples {
        lo = lo.min(p);
        hi = hi.max(p);
        sum += p;
        count += 1;
    }
    assert!(count > 0, "level estimate needs a non-empty window");

    let avg = sum / count as f64;
    let support = lo + (avg - lo) * LEVEL_PULL;
    let resistance = hi - (hi - avg) * LEVEL_PULL;

    Levels {
        best_buy: round2(support),
        best_sell: round2(resistance),
    }
}
