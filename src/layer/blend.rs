//! Alpha compositing of layer pixels onto the canvas.

use image::{Rgba, RgbaImage};

/// Composites `src` onto `dest` with its top-left corner at `(x, y)`.
///
/// The source alpha acts as the blend mask (source over destination).
/// Pixels falling outside `dest` are clipped, so negative or oversized
/// placements are legal.
pub fn composite_over(dest: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64) {
    let dest_width = dest.width() as i64;
    let dest_height = dest.height() as i64;

    // Clip the source rectangle against the destination up front.
    let sx_start = x.saturating_neg().clamp(0, src.width() as i64) as u32;
    let sy_start = y.saturating_neg().clamp(0, src.height() as i64) as u32;
    let sx_end = dest_width.saturating_sub(x).clamp(0, src.width() as i64) as u32;
    let sy_end = dest_height.saturating_sub(y).clamp(0, src.height() as i64) as u32;

    for sy in sy_start..sy_end {
        for sx in sx_start..sx_end {
            let dx = (x + sx as i64) as u32;
            let dy = (y + sy as i64) as u32;

            let src_pixel = src.get_pixel(sx, sy);
            if src_pixel[3] == 0 {
                continue;
            }

            let dst_pixel = dest.get_pixel(dx, dy);
            let blended = alpha_blend(*src_pixel, *dst_pixel);
            dest.put_pixel(dx, dy, blended);
        }
    }
}

/// Alpha blends two RGBA pixels (source over destination).
fn alpha_blend(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;

    let out_a = sa + da * (1.0 - sa);

    if out_a == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |s: u8, d: u8| -> u8 {
        let sf = s as f32 / 255.0;
        let df = d as f32 / 255.0;
        let out = (sf * sa + df * da * (1.0 - sa)) / out_a;
        (out * 255.0).round() as u8
    };

    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}
