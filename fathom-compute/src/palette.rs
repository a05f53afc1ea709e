//! Gradient color palettes.
//!
//! The renderer only depends on the [`Palette`] trait: a pure function
//! from a continuous iteration value to a color, called once per pixel.
//! [`GradientPalette`] is the stock implementation: ordered color stops,
//! a repeat frequency, and a flat interior color.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Pure sampling contract consumed by the renderer.
pub trait Palette: Sync {
    fn sample(&self, value: f64) -> Rgb;
}

/// A gradient stop at a normalized position in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub position: f64,
    pub color: Rgb,
}

impl ColorStop {
    pub fn new(position: f64, color: Rgb) -> Self {
        Self { position, color }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GradientPalette {
    /// Stops ordered by position.
    pub stops: Vec<ColorStop>,
    /// Iteration span of one full gradient cycle.
    pub frequency: u32,
    /// Color for points that never escaped.
    pub interior: Rgb,
    /// Values at or above this cap are interior.
    pub max_iterations: u32,
}

impl GradientPalette {
    pub fn new(stops: Vec<ColorStop>, frequency: u32, interior: Rgb, max_iterations: u32) -> Self {
        Self {
            stops,
            frequency,
            interior,
            max_iterations,
        }
    }

    /// Black → red → yellow → white.
    pub fn fire(frequency: u32, max_iterations: u32) -> Self {
        Self::new(
            vec![
                ColorStop::new(0.0, Rgb::BLACK),
                ColorStop::new(0.33, Rgb::new(255, 0, 0)),
                ColorStop::new(0.66, Rgb::new(255, 255, 0)),
                ColorStop::new(1.0, Rgb::new(255, 255, 255)),
            ],
            frequency,
            Rgb::BLACK,
            max_iterations,
        )
    }

    /// Black → blue → cyan → white.
    pub fn ocean(frequency: u32, max_iterations: u32) -> Self {
        Self::new(
            vec![
                ColorStop::new(0.0, Rgb::BLACK),
                ColorStop::new(0.33, Rgb::new(0, 0, 255)),
                ColorStop::new(0.66, Rgb::new(0, 255, 255)),
                ColorStop::new(1.0, Rgb::new(255, 255, 255)),
            ],
            frequency,
            Rgb::BLACK,
            max_iterations,
        )
    }
}

impl Palette for GradientPalette {
    fn sample(&self, value: f64) -> Rgb {
        if !value.is_finite() || value >= self.max_iterations as f64 {
            return self.interior;
        }

        // Wrap the continuous value into one gradient cycle.
        let frequency = self.frequency.max(1) as f64;
        let normalized = value.rem_euclid(frequency) / frequency;

        // Bracket between the nearest stops and interpolate.
        let left = self.stops.iter().rev().find(|s| s.position <= normalized);
        let right = self.stops.iter().find(|s| s.position >= normalized);
        match (left, right) {
            (Some(l), Some(r)) => {
                if (r.position - l.position).abs() < f64::EPSILON {
                    return l.color;
                }
                let t = (normalized - l.position) / (r.position - l.position);
                lerp(l.color, r.color, t)
            }
            (Some(l), None) => l.color,
            (None, Some(r)) => r.color,
            (None, None) => self.interior,
        }
    }
}

fn lerp(a: Rgb, b: Rgb, t: f64) -> Rgb {
    let channel = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    Rgb::new(
        channel(a.r, b.r),
        channel(a.g, b.g),
        channel(a.b, b.b),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interior_value_maps_to_interior_color() {
        let mut palette = GradientPalette::fire(40, 100);
        palette.interior = Rgb::new(1, 2, 3);
        assert_eq!(palette.sample(100.0), Rgb::new(1, 2, 3));
        assert_eq!(palette.sample(250.0), Rgb::new(1, 2, 3));
        assert_eq!(palette.sample(f64::NAN), Rgb::new(1, 2, 3));
    }

    #[test]
    fn exact_stop_positions_return_stop_colors() {
        let palette = GradientPalette::fire(100, 1000);
        assert_eq!(palette.sample(0.0), Rgb::BLACK);
        assert_eq!(palette.sample(33.0), Rgb::new(255, 0, 0));
    }

    #[test]
    fn interpolation_between_stops() {
        let palette = GradientPalette::new(
            vec![
                ColorStop::new(0.0, Rgb::BLACK),
                ColorStop::new(1.0, Rgb::new(200, 100, 50)),
            ],
            100,
            Rgb::BLACK,
            1000,
        );
        assert_eq!(palette.sample(50.0), Rgb::new(100, 50, 25));
    }

    #[test]
    fn values_wrap_at_the_gradient_frequency() {
        let palette = GradientPalette::fire(40, 10_000);
        assert_eq!(palette.sample(3.0), palette.sample(43.0));
        assert_eq!(palette.sample(3.0), palette.sample(83.0));
    }

    #[test]
    fn empty_stop_list_falls_back_to_interior() {
        let palette = GradientPalette::new(vec![], 40, Rgb::new(9, 9, 9), 100);
        assert_eq!(palette.sample(5.0), Rgb::new(9, 9, 9));
    }

    #[test]
    fn serde_round_trip() {
        let palette = GradientPalette::ocean(40, 500);
        let json = serde_json::to_string(&palette).unwrap();
        let back: GradientPalette = serde_json::from_str(&json).unwrap();
        assert_eq!(back.stops, palette.stops);
        assert_eq!(back.frequency, palette.frequency);
        assert_eq!(back.interior, palette.interior);
    }
}
