/// Largest finite value, or `None` when there is none.
pub fn finite_max<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |max: Option<f64>, v| Some(max.map_or(v, |m| m.max(v))))
}

/// Scales `value` onto 0-100 relative to `max`.
///
/// A missing, zero or negative maximum yields `0.0` for everything.
pub fn normalized_index(value: f64, max: Option<f64>) -> f64 {
    match max {
        Some(max) if max > 0.0 && value.is_finite() => (value / max * 100.0).clamp(0.0, 100.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_ignores_non_finite() {
        assert_eq!(finite_max([1.0, f64::NAN, 3.0, f64::INFINITY]), Some(3.0));
        assert_eq!(finite_max(Vec::<f64>::new()), None);
    }

    #[test]
    fn indices_are_clamped() {
        assert_eq!(normalized_index(5.0, Some(10.0)), 50.0);
        assert_eq!(normalized_index(20.0, Some(10.0)), 100.0);
        assert_eq!(normalized_index(-5.0, Some(10.0)), 0.0);
        assert_eq!(normalized_index(5.0, Some(0.0)), 0.0);
        assert_eq!(normalized_index(5.0, None), 0.0);
    }
}
