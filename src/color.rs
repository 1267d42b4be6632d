use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn to_rgb(rgb: Srgb) -> RGBColor {
    RGBColor(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.55);
            to_rgb(hsl.into_color())
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Diverging map for signed coefficients
// ---------------------------------------------------------------------------

const COOL: (f32, f32, f32) = (0.230, 0.299, 0.754);
const NEUTRAL: (f32, f32, f32) = (0.865, 0.865, 0.865);
const WARM: (f32, f32, f32) = (0.706, 0.016, 0.150);

/// Blue → grey → red for values in [-1, 1]. `NaN` maps to light grey.
pub fn diverging(value: f64) -> RGBColor {
    if value.is_nan() {
        return RGBColor(240, 240, 240);
    }
    let v = value.clamp(-1.0, 1.0) as f32;
    let (from, to, t) = if v < 0.0 { (NEUTRAL, COOL, -v) } else { (NEUTRAL, WARM, v) };

    // Mix in linear light.
    let from: LinSrgb = Srgb::new(from.0, from.1, from.2).into_color();
    let to: LinSrgb = Srgb::new(to.0, to.1, to.2).into_color();
    to_rgb(from.mix(to, t).into_color())
}

// ---------------------------------------------------------------------------
// Color mapping: category label → RGBColor
// ---------------------------------------------------------------------------

/// Maps the categories of one column to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, RGBColor>,
    default_color: RGBColor,
}

impl ColorMap {
    /// Build a colour map for the given category labels, in order.
    pub fn new<S: AsRef<str>>(labels: &[S]) -> Self {
        let palette = generate_palette(labels.len());
        let mapping = labels
            .iter()
            .zip(palette)
            .map(|(label, c)| (label.as_ref().to_string(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: RGBColor(128, 128, 128),
        }
    }

    /// Look up the colour for a given category.
    pub fn color_for(&self, label: &str) -> RGBColor {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}
