//! Parsing of the tagged color strings used by icon manifests.
//!
//! Manifest colors look like `srgb:1.00000,0.60392,0.33725,1.00000` or
//! `display-p3:0.2,0.4,0.6`. The color-space tag is required but otherwise
//! ignored; the first three components are taken as red, green and blue.

use image::Rgba;
use palette::Srgb;

/// Fallback for any color string that cannot be parsed.
pub const WHITE: Srgb<u8> = Srgb::new(255, 255, 255);

/// Parses a tagged color string into an 8-bit RGB color.
///
/// Each channel is `round(component * 255)` after clamping the component to
/// `0.0..=1.0`. Any malformed input yields [`WHITE`]; this never fails and
/// never returns a partially parsed color.
pub fn parse_tagged_color(value: &str) -> Srgb<u8> {
    try_parse(value).unwrap_or(WHITE)
}

fn try_parse(value: &str) -> Option<Srgb<u8>> {
    let mut parts = value.split(':');
    let (tag, components) = (parts.next()?, parts.next()?);
    if parts.next().is_some() || tag.trim().is_empty() {
        return None;
    }

    let mut channels = components.split(',').map(parse_component);
    let red = channels.next()??;
    let green = channels.next()??;
    let blue = channels.next()??;

    Some(Srgb::new(red, green, blue))
}

fn parse_component(raw: &str) -> Option<u8> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some((value.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// Returns the color as a fully opaque RGBA pixel.
pub fn opaque_pixel(color: Srgb<u8>) -> Rgba<u8> {
    Rgba([color.red, color.green, color.blue, 255])
}
