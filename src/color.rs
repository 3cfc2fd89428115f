use palette::Srgb;
use plotters::style::RGBColor;

use crate::error::ExploreError;

// ---------------------------------------------------------------------------
// Colour names → RGB
// ---------------------------------------------------------------------------

/// Parse a chart colour.
///
/// Accepts CSS/SVG names (`skyblue`), hex (`#87ceeb`, `#fff`) and the
/// single-letter codes `b g r c m y k w`.
pub fn parse_color(spec: &str) -> Result<RGBColor, ExploreError> {
    let trimmed = spec.trim();
    let lower = trimmed.to_ascii_lowercase();

    if let Some(rgb) = short_code(&lower) {
        return Ok(rgb);
    }
    if let Some(named) = palette::named::from_str(&lower) {
        return Ok(to_rgb(named));
    }
    if trimmed.starts_with('#') {
        if let Ok(hex) = trimmed.parse::<Srgb<u8>>() {
            return Ok(to_rgb(hex));
        }
    }
    Err(ExploreError::invalid("color", spec))
}

fn short_code(code: &str) -> Option<RGBColor> {
    let rgb = match code {
        "b" => (0, 0, 255),
        "g" => (0, 128, 0),
        "r" => (255, 0, 0),
        "c" => (0, 191, 191),
        "m" => (191, 0, 191),
        "y" => (191, 191, 0),
        "k" => (0, 0, 0),
        "w" => (255, 255, 255),
        _ => return None,
    };
    Some(RGBColor(rgb.0, rgb.1, rgb.2))
}

fn to_rgb(c: Srgb<u8>) -> RGBColor {
    RGBColor(c.red, c.green, c.blue)
}
