/// Decimal places kept for averages and deltas.
pub const DECIMALS: i32 = 2;

/// Round to [`DECIMALS`] places, halves away from zero.
pub fn round2(x: f64) -> f64 {
    let scale = 10f64.powi(DECIMALS);
    (x * scale).round() / scale
}

/// Rounded mean of the present values; `None` when nothing is present.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| round2(sum / count as f64))
}

/// `round(b - a)` when both sides are present.
pub fn delta(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    Some(round2(b? - a?))
}
