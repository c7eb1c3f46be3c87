use crate::model::Point;

/// Valid UV detection wavelengths, in nm
const WAVELENGTH_RANGE: std::ops::RangeInclusive<i64> = 0..=1000;

/// Deltas inspected when estimating the sampling rate
const SAMPLING_WINDOW: usize = 100;

/// Extract a UV wavelength from a curve label.
///
/// Splits on `_` and returns the last token that parses as an integer within
/// 0..=1000 (`"UV 1_280"` gives 280). Returns `None` rather than guessing
/// when no token qualifies.
pub fn parse_wavelength(label: &str) -> Option<u32> {
    label
        .split('_')
        .rev()
        .filter_map(|token| token.trim().parse::<i64>().ok())
        .find(|value| WAVELENGTH_RANGE.contains(value))
        .and_then(|value| u32::try_from(value).ok())
}

/// Approximate sampling rate in points per x-axis unit.
///
/// Averages the strictly positive deltas among the first 100 consecutive
/// x-axis steps. `None` when there is no positive delta.
pub fn estimate_sampling_rate(points: &[Point]) -> Option<f64> {
    let (sum, count) = points
        .windows(2)
        .take(SAMPLING_WINDOW)
        .map(|pair| pair[1].0 - pair[0].0)
        .filter(|delta| *delta > 0.0)
        .fold((0.0_f64, 0_usize), |(sum, count), delta| (sum + delta, count + 1));

    if count == 0 {
        return None;
    }
    let mean = sum / count as f64;
    (mean > 0.0).then(|| 1.0 / mean)
}
