/// Convert an upstream price to the 0-100 scale.
///
/// Values `<= 1.0` are read as fractions, anything larger as already a
/// percentage. A true 1% quote reported as `1.0` is therefore read as 100%.
pub fn scale_to_percent(value: f64) -> f64 {
    if value <= 1.0 {
        value * 100.0
    } else {
        value
    }
}

pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Upstream price (either scale) to a percentage rounded to one decimal.
pub fn price_to_probability(price: f64) -> f64 {
    round_to_tenth(scale_to_percent(price))
}

/// Minimum and maximum over strictly positive values, `(0.0, 0.0)` if there
/// are none.
pub fn positive_bounds<I>(values: I) -> (f64, f64)
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|v| *v > 0.0)
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .unwrap_or((0.0, 0.0))
}
