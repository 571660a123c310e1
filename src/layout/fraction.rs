//! Lowest-terms fractions for device pixel ratios.
//!
//! The backing surface is sized in whole multiples of the ratio's denominator
//! so that `css * ratio` is always an integer and repeated resizes never
//! accumulate half-pixel drift.

/// Residual below which the continued-fraction expansion stops (scaled by `denom²`).
pub const FRACTION_EPSILON: f64 = 1e-15;

/// Largest denominator accepted; beyond this the previous convergent is kept.
///
/// A ratio that is not a short fraction (e.g. `1.0000001` from browser zoom)
/// would otherwise expand to a huge denominator, and the surface is padded up
/// to a whole multiple of it.
pub const MAX_DENOMINATOR: u64 = 128;

const MAX_TERMS: usize = 64;

/// Express `value` as `(numerator, denominator)` in lowest terms.
///
/// Uses continued-fraction convergents, which are always reduced. Non-finite
/// or non-positive input yields `(1, 1)`.
pub fn lowest_fraction(value: f64) -> (u32, u32) {
    if !value.is_finite() || value <= 0.0 {
        return (1, 1);
    }

    // convergents h/k, seeded with h[-2]/k[-2] = 0/1 and h[-1]/k[-1] = 1/0
    let (mut h_prev, mut h) = (0_u64, 1_u64);
    let (mut k_prev, mut k) = (1_u64, 0_u64);
    let mut rest = value;

    for _ in 0..MAX_TERMS {
        let term = rest.floor();
        let Some(a) = term_to_u64(term) else {
            break;
        };
        let next = a
            .checked_mul(h)
            .and_then(|v| v.checked_add(h_prev))
            .zip(a.checked_mul(k).and_then(|v| v.checked_add(k_prev)));
        let Some((next_h, next_k)) = next else {
            break;
        };
        if next_k > MAX_DENOMINATOR || next_h > u64::from(u32::MAX) {
            break;
        }
        h_prev = h;
        h = next_h;
        k_prev = k;
        k = next_k;

        let frac = rest - term;
        #[allow(clippy::cast_precision_loss)]
        let scaled_epsilon = FRACTION_EPSILON * (k as f64) * (k as f64);
        if frac < scaled_epsilon {
            break;
        }
        rest = 1.0 / frac;
    }

    match (u32::try_from(h), u32::try_from(k)) {
        (Ok(num), Ok(denom)) if num > 0 && denom > 0 => (num, denom),
        _ => (1, 1),
    }
}

/// Integral backing-surface size for a CSS extent.
///
/// Returns `(device_pixels, displayed_css_extent)` where the displayed extent
/// is rounded up to a multiple of the ratio's denominator.
pub fn backing_extent(css_extent: f64, (num, denom): (u32, u32)) -> (u32, f64) {
    let denom = f64::from(denom.max(1));
    let chunks = (css_extent.max(0.0) / denom).ceil();
    (to_pixels(chunks * f64::from(num)), chunks * denom)
}

/// Convert a non-negative pixel extent to `u32`, saturating.
/// The cast is safe: the value is clamped to `[0, u32::MAX]` first.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn to_pixels(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    value.clamp(0.0, f64::from(u32::MAX)).round() as u32
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn term_to_u64(term: f64) -> Option<u64> {
    if !term.is_finite() || term < 0.0 || term > 1e12 {
        return None;
    }
    Some(term as u64)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(1.0, (1, 1) ; "unit ratio")]
    #[test_case(1.5, (3, 2) ; "one and a half")]
    #[test_case(2.0, (2, 1) ; "retina")]
    #[test_case(1.25, (5, 4) ; "windows 125 percent")]
    #[test_case(1.1, (11, 10) ; "browser zoom 110")]
    #[test_case(0.5, (1, 2) ; "zoomed out")]
    #[test_case(3.0, (3, 1) ; "mobile")]
    fn test_lowest_fraction(value: f64, expected: (u32, u32)) {
        assert_eq!(lowest_fraction(value), expected);
    }

    #[test]
    fn test_degenerate_ratios() {
        assert_eq!(lowest_fraction(0.0), (1, 1));
        assert_eq!(lowest_fraction(-2.0), (1, 1));
        assert_eq!(lowest_fraction(f64::NAN), (1, 1));
        assert_eq!(lowest_fraction(f64::INFINITY), (1, 1));
    }

    #[test]
    fn test_large_denominators_fall_back_to_nearest_convergent() {
        let (num, denom) = lowest_fraction(2.0 / 3.0 + 1e-9);
        assert_eq!((num, denom), (2, 3));
    }

    #[test]
    fn test_backing_extent() {
        assert_eq!(backing_extent(800.0, (1, 1)), (800, 800.0));
        assert_eq!(backing_extent(800.0, (2, 1)), (1600, 800.0));
        // 801 css px at 1.5x rounds up to a whole number of 2px chunks
        assert_eq!(backing_extent(801.0, (3, 2)), (1203, 802.0));
        assert_eq!(backing_extent(-5.0, (3, 2)), (0, 0.0));
    }
}
