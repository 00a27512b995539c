use crate::random::RandomSource;

/// Lower clamp of the generated band, in tenths of the base price.
pub const BAND_FLOOR_TENTHS: f64 = 9.0;
/// Upper clamp of the generated band, in tenths of the base price.
pub const BAND_CEIL_TENTHS: f64 = 11.0;

/// Clamp edges for `base_price`.
///
/// Scaled by whole tenths so round bases give exact edges (`100.0 * 1.1`
/// would land a ulp above 110).
pub fn band(base_price: f64) -> (f64, f64) {
    (
        base_price * BAND_FLOOR_TENTHS / 10.0,
        base_price * BAND_CEIL_TENTHS / 10.0,
    )
}

/// Generate `length` synthetic prices around `base_price`.
///
/// The walk starts at `base_price * (1 - volatility / 2 + U)` with `U` in
/// `[0, volatility)`. Each step adds `(U2 - 0.5) * volatility * base_price`
/// and clamps into [`band`]; the starting
/// point itself is not emitted.
pub fn generate<R: RandomSource + ?Sized>(
    base_price: f64,
    volatility: f64,
    length: usize,
    rng: &mut R,
) -> Vec<f64> {
    assert!(length > 0, "series length must be > 0");
    assert!(base_price > 0.0, "base price must be positive");

    let (floor, ceil) = band(base_price);

    let mut price = base_price * (1.0 - volatility * 0.5 + rng.next_unit() * volatility);
    let mut out = Vec::with_capacity(length);
    for _ in 0..length {
        let delta = (rng.next_unit() - 0.5) * volatility * base_price;
        price = (price + delta).max(floor).min(ceil);
        out.push(price);
    }
    out
}
