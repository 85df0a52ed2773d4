/// Mean and population standard deviation (divide by `n`) of `values`.
///
/// Returns `None` for an empty slice.
///
/// # Examples
///
/// ```
/// # use behavia_stats::descriptive::mean_std_dev;
/// let (mean, std_dev) = mean_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
/// assert_eq!(mean, 5.0);
/// assert_eq!(std_dev, 2.0);
///
/// assert_eq!(mean_std_dev(&[8.0, 12.0, 8.0, 12.0]), Some((10.0, 2.0)));
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean_std_dev(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some((mean, variance.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values() {
        assert!(mean_std_dev(&[]).is_none());
    }

    #[test]
    fn test_single_value() {
        assert_eq!(mean_std_dev(&[-4.5]), Some((-4.5, 0.0)));
    }

    #[test]
    fn test_constant_values_have_zero_spread() {
        let (mean, std_dev) = mean_std_dev(&[3.5; 7]).unwrap();
        assert_eq!(mean, 3.5);
        assert_eq!(std_dev, 0.0);
    }

    #[test]
    fn test_population_not_sample_deviation() {
        // sample deviation of [1, 3] would be sqrt(2)
        let (_, std_dev) = mean_std_dev(&[1.0, 3.0]).unwrap();
        assert_eq!(std_dev, 1.0);
    }
}
