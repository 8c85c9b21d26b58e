use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generators
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            hsl_to_color32(Hsl::new(hue, 0.65, 0.55))
        })
        .collect()
}

/// Generates `n` shades of a single hue, dark to light, for ranked bar
/// charts (the seaborn `Blues_d` look).
pub fn sequential_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    let hue = 210.0; // blue
    (0..n)
        .map(|i| {
            let t = if n == 1 { 0.0 } else { i as f32 / (n - 1) as f32 };
            let lightness = 0.30 + t * 0.45;
            hsl_to_color32(Hsl::new(hue, 0.60, lightness))
        })
        .collect()
}

/// A single accent colour for uniform bar groups (the source dashboard's
/// `#72BCD4`).
pub const ACCENT: Color32 = Color32::from_rgb(0x72, 0xBC, 0xD4);

fn hsl_to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}
