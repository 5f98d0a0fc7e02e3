//! Side-by-side sheet of every algorithm's output.

use eink_quantize::QuantizedFrame;
use tiny_skia::{Color, FilterQuality, IntSize, Pixmap, PixmapPaint, Transform};

use crate::error::ImageError;

/// Space between tiles, in sheet pixels.
const GAP: u32 = 8;

/// Lay `frames` out left to right at `scale`, on a neutral grey sheet.
///
/// Tiles are scaled with nearest-neighbor sampling so the dither pattern
/// survives. Returns RGBA PNG bytes.
pub fn render_contact_sheet(frames: &[QuantizedFrame], scale: f32) -> Result<Vec<u8>, ImageError> {
    let Some(first) = frames.first() else {
        return Err(ImageError::PngEncode("no frames to lay out".to_string()));
    };
    let tile_w = (first.width() as f32 * scale).round().max(1.0) as u32;
    let tile_h = (first.height() as f32 * scale).round().max(1.0) as u32;
    let count = frames.len() as u32;

    let mut sheet = Pixmap::new(count * tile_w + (count + 1) * GAP, tile_h + 2 * GAP)
        .ok_or(ImageError::PixmapAllocation)?;
    sheet.fill(Color::from_rgba8(128, 128, 128, 255));

    let paint = PixmapPaint {
        quality: FilterQuality::Nearest,
        ..Default::default()
    };

    for (i, frame) in frames.iter().enumerate() {
        let size = IntSize::from_wh(frame.width() as u32, frame.height() as u32)
            .ok_or(ImageError::PixmapAllocation)?;
        // Quantized colors are opaque, so straight RGBA is already premultiplied
        let tile = Pixmap::from_vec(frame.to_rgba(), size).ok_or(ImageError::PixmapAllocation)?;

        let x = GAP + i as u32 * (tile_w + GAP);
        let transform = Transform::from_translate(x as f32, GAP as f32).pre_scale(scale, scale);
        sheet.draw_pixmap(0, 0, tile.as_ref(), &paint, transform, None);
    }

    tracing::debug!(
        tiles = frames.len(),
        width = sheet.width(),
        height = sheet.height(),
        "Rendered contact sheet"
    );
    sheet
        .encode_png()
        .map_err(|e| ImageError::PngEncode(e.to_string()))
}
