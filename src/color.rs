use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color scale: continuous value → Color32
// ---------------------------------------------------------------------------

/// Parse `#RRGGBB`.
pub fn hex_color(hex: &str) -> Option<Color32> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}

/// Jet-like scale: blue at the low end through green to red at the high end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    pub min: f64,
    pub max: f64,
}

impl ColorScale {
    /// Scale spanning the finite values, `None` if there are none.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let (min, max) = values
            .iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })?;
        Some(Self { min, max })
    }

    /// Position of `value` on the scale, in `[0, 1]`.
    pub fn normalize(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        if range.abs() < f64::EPSILON || !value.is_finite() {
            return 0.5;
        }
        ((value - self.min) / range).clamp(0.0, 1.0)
    }

    pub fn color_at(t: f64) -> Color32 {
        let hue = (1.0 - t.clamp(0.0, 1.0) as f32) * 240.0;
        let hsl = Hsl::new(hue, 0.85, 0.5);
        let rgb: Srgb = hsl.into_color();
        Color32::from_rgb(
            (rgb.red * 255.0) as u8,
            (rgb.green * 255.0) as u8,
            (rgb.blue * 255.0) as u8,
        )
    }

    /// Split the scale into `n` equal buckets: `(lower, upper, color)`.
    pub fn buckets(&self, n: usize) -> Vec<(f64, f64, Color32)> {
        let n = n.max(1);
        let step = (self.max - self.min) / n as f64;
        (0..n)
            .map(|i| {
                let lo = self.min + step * i as f64;
                let hi = if i + 1 == n { self.max } else { lo + step };
                let mid = (i as f64 + 0.5) / n as f64;
                (lo, hi, Self::color_at(mid))
            })
            .collect()
    }

    /// Bucket index of `value` for [`ColorScale::buckets`] with the same `n`.
    pub fn bucket_of(&self, value: f64, n: usize) -> usize {
        let n = n.max(1);
        ((self.normalize(value) * n as f64) as usize).min(n - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex() {
        assert_eq!(hex_color("#17B897"), Some(Color32::from_rgb(0x17, 0xB8, 0x97)));
        assert_eq!(hex_color("17B897"), None);
        assert_eq!(hex_color("#12"), None);
    }

    #[test]
    fn scale_ends_are_blue_and_red() {
        let blue = ColorScale::color_at(0.0);
        let red = ColorScale::color_at(1.0);
        assert!(blue.b() > blue.r());
        assert!(red.r() > red.b());
    }

    #[test]
    fn bucketing() {
        let scale = ColorScale::from_values(&[0.0, 50.0, f64::NAN, 100.0]).unwrap();
        assert_eq!((scale.min, scale.max), (0.0, 100.0));
        assert_eq!(scale.bucket_of(0.0, 4), 0);
        assert_eq!(scale.bucket_of(49.0, 4), 1);
        assert_eq!(scale.bucket_of(100.0, 4), 3);

        let buckets = scale.buckets(4);
        assert_eq!(buckets.len(), 4);
        assert_eq!(buckets[0].0, 0.0);
        assert_eq!(buckets[3].1, 100.0);
    }

    #[test]
    fn flat_or_empty_scale() {
        assert!(ColorScale::from_values(&[]).is_none());
        let flat = ColorScale::from_values(&[3.0, 3.0]).unwrap();
        assert_eq!(flat.normalize(3.0), 0.5);
    }
}
