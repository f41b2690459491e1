use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

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
            let hue = (i as f32 / n as f32) * 360.0;
            to_color32(Hsl::new(hue, 0.75, 0.55).into_color())
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Categorical mapping: label → Color32
// ---------------------------------------------------------------------------

/// Maps distinct labels (category tags, comparison groups) to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from labels; duplicates share one colour.
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let unique: Vec<&str> = labels
            .into_iter()
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();
        let palette = generate_palette(unique.len());
        let mapping = unique
            .into_iter()
            .zip(palette)
            .map(|(label, c)| (label.to_string(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}

// ---------------------------------------------------------------------------
// Sequential scale: value → Color32
// ---------------------------------------------------------------------------

/// Linear colour scale between two endpoints, used for region averages.
#[derive(Debug, Clone, Copy)]
pub struct ColorScale {
    min: f64,
    max: f64,
    low: Srgb,
    high: Srgb,
}

impl ColorScale {
    /// Scale over `[min, max]` from pale yellow to deep blue.
    pub fn new(min: f64, max: f64) -> Self {
        ColorScale {
            min,
            max,
            low: Srgb::new(0.99, 0.91, 0.55),
            high: Srgb::new(0.13, 0.19, 0.52),
        }
    }

    pub fn color_for(&self, value: f64) -> Color32 {
        let span = self.max - self.min;
        let t = if span > 0.0 {
            ((value - self.min) / span).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let t = t as f32;
        let lerp = |a: f32, b: f32| a + (b - a) * t;
        to_color32(Srgb::new(
            lerp(self.low.red, self.high.red),
            lerp(self.low.green, self.high.green),
            lerp(self.low.blue, self.high.blue),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert_eq!(generate_palette(5).len(), 5);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn color_map_is_stable_and_deduplicated() {
        let map = ColorMap::new(["Fire", "Water", "Fire"]);
        assert_eq!(map.mapping.len(), 2);
        assert_eq!(map.color_for("Fire"), map.color_for("Fire"));
        assert_ne!(map.color_for("Fire"), map.color_for("Water"));
        assert_eq!(map.color_for("Grass"), Color32::GRAY);
    }

    #[test]
    fn scale_clamps_to_endpoints() {
        let scale = ColorScale::new(300.0, 600.0);
        assert_eq!(scale.color_for(100.0), scale.color_for(300.0));
        assert_eq!(scale.color_for(900.0), scale.color_for(600.0));
        assert_ne!(scale.color_for(300.0), scale.color_for(600.0));
    }
}
