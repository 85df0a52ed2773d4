//! Spectral color palette
//!
//! Colors are assigned by rank, not by label value: a palette of `count`
//! colors samples the Spectral colormap at `count` evenly spaced points, so
//! label sets `{0, 1, 2}` and `{10, 20, 30}` get identical colors.

use behavia_stats::histogram::linspace;
use plotters::style::RGBColor;

/// Control points of the Spectral colormap (red → yellow → blue).
const SPECTRAL: [RGBColor; 11] = [
    RGBColor(0x9e, 0x01, 0x42),
    RGBColor(0xd5, 0x3e, 0x4f),
    RGBColor(0xf4, 0x6d, 0x43),
    RGBColor(0xfd, 0xae, 0x61),
    RGBColor(0xfe, 0xe0, 0x8b),
    RGBColor(0xff, 0xff, 0xbf),
    RGBColor(0xe6, 0xf5, 0x98),
    RGBColor(0xab, 0xdd, 0xa4),
    RGBColor(0x66, 0xc2, 0xa5),
    RGBColor(0x32, 0x88, 0xbd),
    RGBColor(0x5e, 0x4f, 0xa2),
];

/// `count` colors sampled evenly across the Spectral colormap.
///
/// # Examples
///
/// ```
/// # use behavia_plot::palette;
/// let colors = palette::spectral(3);
/// assert_eq!(colors.len(), 3);
/// assert_eq!(colors, palette::spectral(3));
/// ```
#[must_use]
pub fn spectral(count: usize) -> Vec<RGBColor> {
    linspace(0.0, 1.0, count)
        .into_iter()
        .map(spectral_at)
        .collect()
}

/// Color at position `t` (clamped to `0.0..=1.0`) of the Spectral colormap.
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation
)]
#[must_use]
pub fn spectral_at(t: f64) -> RGBColor {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let segments = (SPECTRAL.len() - 1) as f64;
    let position = t * segments;
    let lower = (position.floor() as usize).min(SPECTRAL.len() - 2);
    let fraction = position - lower as f64;
    let (a, b) = (SPECTRAL[lower], SPECTRAL[lower + 1]);
    let lerp = |x: u8, y: u8| (f64::from(x) + (f64::from(y) - f64::from(x)) * fraction).round() as u8;
    RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(spectral_at(0.0), SPECTRAL[0]);
        assert_eq!(spectral_at(1.0), SPECTRAL[10]);
        assert_eq!(spectral_at(0.5), SPECTRAL[5]);
        assert_eq!(spectral_at(-3.0), SPECTRAL[0]);
    }

    #[test]
    fn test_single_color_is_first() {
        assert_eq!(spectral(1), [SPECTRAL[0]]);
        assert!(spectral(0).is_empty());
    }

    #[test]
    fn test_palette_spans_colormap() {
        let colors = spectral(11);
        assert_eq!(colors, SPECTRAL);
    }
}
