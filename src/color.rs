use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Graduated colour ramp
// ---------------------------------------------------------------------------

/// Maps a numeric range onto a yellow-to-red ramp, echoing the choropleth
/// styling of the pre-rendered maps. Used to colour the department bars.
#[derive(Debug, Clone, Copy)]
pub struct ColorRamp {
    min: f64,
    max: f64,
}

impl ColorRamp {
    /// Build a ramp spanning the given values. An empty or constant input
    /// yields a degenerate ramp that maps everything to the midpoint.
    pub fn new(values: &[f64]) -> Self {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if min.is_finite() && max.is_finite() && max > min {
            ColorRamp { min, max }
        } else {
            ColorRamp { min: 0.0, max: 0.0 }
        }
    }

    /// Colour for a value, clamped to the ramp's range.
    pub fn color_for(&self, value: f64) -> Color32 {
        let t = if self.max > self.min {
            ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
        } else {
            0.5
        };
        // Hue 48° (yellow) down to 8° (deep red), darkening as it goes.
        let hue = 48.0 - 40.0 * t as f32;
        let lightness = 0.72 - 0.28 * t as f32;
        let hsl = Hsl::new(hue, 0.85, lightness);
        let rgb: Srgb = hsl.into_color();
        Color32::from_rgb(
            (rgb.red * 255.0) as u8,
            (rgb.green * 255.0) as u8,
            (rgb.blue * 255.0) as u8,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_map_to_distinct_colours() {
        let ramp = ColorRamp::new(&[0.0, 10.0, 400.0]);
        assert_ne!(ramp.color_for(0.0), ramp.color_for(400.0));
    }

    #[test]
    fn degenerate_input_does_not_panic() {
        let ramp = ColorRamp::new(&[]);
        let _ = ramp.color_for(5.0);
        let constant = ColorRamp::new(&[7.0, 7.0]);
        assert_eq!(constant.color_for(7.0), constant.color_for(100.0));
    }
}
