//! Fixed palettes and continuous color scales.

use std::fmt;

pub const BLUE: &str = "#3b82f6";
pub const RED: &str = "#ef4444";
pub const GREEN: &str = "#10b981";
pub const AMBER: &str = "#f59e0b";
pub const VIOLET: &str = "#8b5cf6";

/// Line colors for the multi-location chart, indexed by registry position.
pub const SERIES_PALETTE: [&str; 5] = [BLUE, RED, GREEN, AMBER, VIOLET];

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn lerp(self, other: Self, f: f64) -> Self {
        let channel = |a: u8, b: u8| {
            let (a, b) = (f64::from(a), f64::from(b));
            (b - a).mul_add(f, a).round().clamp(0.0, 255.0) as u8
        };
        Self(
            channel(self.0, other.0),
            channel(self.1, other.1),
            channel(self.2, other.2),
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Piecewise-linear color scale over `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    stops: &'static [(f64, Rgb)],
}

/// Green through yellow and orange to red.
pub const EMISSION_SCALE: ColorScale = ColorScale::new(&[
    (0.0, Rgb(0x22, 0xc5, 0x5e)),
    (0.3, Rgb(0xea, 0xb3, 0x08)),
    (0.6, Rgb(0xf9, 0x73, 0x16)),
    (1.0, Rgb(0xef, 0x44, 0x44)),
]);

/// Light grey to deep red.
pub const SO2_SCALE: ColorScale = ColorScale::new(&[
    (0.0, Rgb(220, 220, 220)),
    (0.2, Rgb(245, 195, 157)),
    (0.4, Rgb(245, 160, 105)),
    (1.0, Rgb(178, 10, 28)),
]);

impl ColorScale {
    /// `stops` must be sorted by position and non-empty.
    #[must_use]
    pub const fn new(stops: &'static [(f64, Rgb)]) -> Self {
        Self { stops }
    }

    /// Color at position `t`, clamped to `[0, 1]`.
    #[must_use]
    pub fn at(&self, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let (Some(&(start, first)), Some(&(_, last))) = (self.stops.first(), self.stops.last())
        else {
            return Rgb(0, 0, 0);
        };
        if t <= start {
            return first;
        }
        for pair in self.stops.windows(2) {
            let ((a, from), (b, to)) = (pair[0], pair[1]);
            if t <= b {
                let f = if b > a { (t - a) / (b - a) } else { 0.0 };
                return from.lerp(to, f);
            }
        }
        last
    }

    /// Color of `value` with the scale stretched over `[min, max]`.
    ///
    /// A degenerate domain maps every value to the middle of the scale.
    #[must_use]
    pub fn over(&self, value: f64, min: f64, max: f64) -> Rgb {
        if max > min {
            self.at((value - min) / (max - min))
        } else {
            self.at(0.5)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        assert_eq!(EMISSION_SCALE.at(0.0).to_string(), "#22c55e");
        assert_eq!(EMISSION_SCALE.at(1.0).to_string(), "#ef4444");
        assert_eq!(EMISSION_SCALE.at(0.3).to_string(), "#eab308");
    }

    #[test]
    fn clamps_out_of_range_positions() {
        assert_eq!(SO2_SCALE.at(-3.0), Rgb(220, 220, 220));
        assert_eq!(SO2_SCALE.at(7.0), Rgb(178, 10, 28));
        assert_eq!(SO2_SCALE.at(f64::NAN), Rgb(220, 220, 220));
    }

    #[test]
    fn interpolates_between_stops() {
        let mid = SO2_SCALE.at(0.1);
        assert_eq!(mid, Rgb(233, 208, 189));
    }

    #[test]
    fn degenerate_domain_uses_midpoint() {
        assert_eq!(EMISSION_SCALE.over(42.0, 42.0, 42.0), EMISSION_SCALE.at(0.5));
        assert_eq!(EMISSION_SCALE.over(10.0, 10.0, 20.0), EMISSION_SCALE.at(0.0));
    }
}
