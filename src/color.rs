use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Mix, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
/// Used for pie segments and to vary the accent colour across charts.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
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
// Diverging map for the correlation heatmap
// ---------------------------------------------------------------------------

/// Map a correlation value in `[-1, 1]` onto a blue → white → red ramp.
/// NaN (undefined correlation) renders as a neutral grey.
pub fn diverging(value: f64) -> Color32 {
    if value.is_nan() {
        return Color32::from_gray(90);
    }
    let t = value.clamp(-1.0, 1.0) as f32;

    let white = Srgb::new(0.93_f32, 0.93, 0.93).into_linear();
    let blue = Srgb::new(0.23_f32, 0.30, 0.75).into_linear();
    let red = Srgb::new(0.80_f32, 0.22, 0.20).into_linear();

    let mixed = if t < 0.0 {
        white.mix(blue, -t)
    } else {
        white.mix(red, t)
    };
    let rgb: Srgb = Srgb::from_linear(mixed);
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_entries() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(6);
        assert_eq!(colors.len(), 6);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn diverging_endpoints() {
        let lo = diverging(-1.0);
        let hi = diverging(1.0);
        let mid = diverging(0.0);
        assert!(lo.b() > lo.r(), "negative end should lean blue");
        assert!(hi.r() > hi.b(), "positive end should lean red");
        assert!(mid.r() > 200 && mid.g() > 200 && mid.b() > 200);
    }
}
