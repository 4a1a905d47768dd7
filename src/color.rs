use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use binwatch::signal::tracker::TrackerState;
use binwatch::TrackerConfig;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 300.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Peak marker colours: bin → hue, tracker state → emphasis
// ---------------------------------------------------------------------------

/// One hue per bin so the marker colour alone hints at direction.
#[derive(Debug, Clone)]
pub struct BinColors {
    palette: Vec<Color32>,
    default_color: Color32,
}

impl BinColors {
    pub fn new(bins: usize) -> Self {
        BinColors {
            palette: generate_palette(bins),
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, index: usize) -> Color32 {
        self.palette
            .get(index)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Marker colour for a peak given the current tracker state: grey when
    /// nothing is tracked, dimmed bin hue while a run builds, full hue once
    /// the run is stable.
    pub fn marker_color(&self, index: usize, state: &TrackerState, config: &TrackerConfig) -> Color32 {
        if !state.is_tracking() {
            return self.default_color;
        }
        let base = self.color_for(index);
        if state.past_milestone(config) {
            base
        } else {
            base.gamma_multiply(0.45)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_length() {
        assert_eq!(generate_palette(0).len(), 0);
        assert_eq!(generate_palette(128).len(), 128);
    }

    #[test]
    fn out_of_range_bin_is_grey() {
        let colors = BinColors::new(4);
        assert_eq!(colors.color_for(4), Color32::GRAY);
    }

    #[test]
    fn empty_tracker_marker_is_grey() {
        let colors = BinColors::new(4);
        let config = TrackerConfig::default();
        assert_eq!(
            colors.marker_color(2, &TrackerState::EMPTY, &config),
            Color32::GRAY
        );
        let stable = TrackerState {
            anchor_index: Some(2),
            repeat_count: 10,
        };
        assert_eq!(colors.marker_color(2, &stable, &config), colors.color_for(2));
    }
}
