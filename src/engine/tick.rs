use super::{classify, estimate, round2};
use crate::model::InstrumentState;
use crate::random::RandomSource;

/// Per-tick price perturbation as a fraction of price (+/- half of this).
pub const TICK_MOVE_FRACTION: f64 = 0.001;

/// `change / baseline * 100`, or `0.0` when the baseline is zero or the
/// result is not finite.
pub fn percent_change(change: f64, baseline: f64) -> f64 {
    if baseline == 0.0 {
        return 0.0;
    }
    let pct = change / baseline * 100.0;
    if pct.is_finite() {
        pct
    } else {
        0.0
    }
}

/// Advance one instrument by a single step.
///
/// The percent change is measured against `price - change` of the incoming
/// state, i.e. the baseline before this tick's move is folded in.
pub fn advance<R: RandomSource + ?Sized>(state: &InstrumentState, rng: &mut R) -> InstrumentState {
    let price_change = (rng.next_unit() - 0.5) * state.price * TICK_MOVE_FRACTION;
    let new_price = round2(state.price + price_change);
    let window = state.window.with_pushed(new_price);

    let raw_change = state.change + price_change;
    let change_percent = round2(percent_change(raw_change, state.baseline()));
    let levels = estimate(window.iter());

    InstrumentState {
        symbol: state.symbol.clone(),
        display_name: state.display_name.clone(),
        price: new_price,
        change: round2(raw_change),
        change_percent,
        high: state.high,
        low: state.low,
        volume: state.volume.clone(),
        window,
        best_buy: levels.best_buy,
        best_sell: levels.best_sell,
        trend: classify(change_percent),
    }
}
