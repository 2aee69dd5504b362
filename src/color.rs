use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Year → color mapping
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues,
/// starting in the blues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (205.0 + (i as f32 / n.max(1) as f32) * 360.0) % 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Stable colour per portfolio year, shared by the loss-ratio bars and the
/// year checklists so a year looks the same everywhere.
#[derive(Debug, Clone)]
pub struct YearColorMap {
    mapping: BTreeMap<i32, Color32>,
    fallback: Color32,
}

impl YearColorMap {
    /// Build the map from the portfolio's ascending year list.
    pub fn new(years: &[i32]) -> Self {
        let palette = generate_palette(years.len());
        let mapping = years
            .iter()
            .copied()
            .zip(palette.into_iter())
            .collect();

        YearColorMap {
            mapping,
            fallback: Color32::GRAY,
        }
    }

    /// Look up the colour for a year; unknown years render grey.
    pub fn color_for(&self, year: i32) -> Color32 {
        self.mapping.get(&year).copied().unwrap_or(self.fallback)
    }
}
