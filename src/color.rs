use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

/// Backend-neutral 8-bit RGB colour, converted into plotters and egui colours
/// at the drawing sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Default bar fill (`#1f77b4`).
pub const DEFAULT_BAR: Rgb = Rgb(0x1f, 0x77, 0xb4);

impl From<Rgb> for Color32 {
    fn from(c: Rgb) -> Self {
        Color32::from_rgb(c.0, c.1, c.2)
    }
}

impl From<Rgb> for RGBColor {
    fn from(c: Rgb) -> Self {
        RGBColor(c.0, c.1, c.2)
    }
}

/// How bars are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarColoring {
    /// Every bar uses [`DEFAULT_BAR`].
    #[default]
    Uniform,
    /// Each algorithm gets its own hue, stable across panels.
    ByAlgorithm,
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// One colour per category, in category order.
pub fn bar_colors(n: usize, coloring: BarColoring) -> Vec<Rgb> {
    match coloring {
        BarColoring::Uniform => vec![DEFAULT_BAR; n],
        BarColoring::ByAlgorithm => generate_palette(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_uses_default_blue() {
        assert_eq!(bar_colors(3, BarColoring::Uniform), vec![DEFAULT_BAR; 3]);
    }

    #[test]
    fn palette_hues_are_distinct() {
        let colors = bar_colors(5, BarColoring::ByAlgorithm);
        assert_eq!(colors.len(), 5);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }
}
