//! Indexed PNG previews of quantized frames.
//!
//! The palette goes into PLTE and the pixels stay palette indices, so a
//! preview shows exactly the colors the panel will be asked to show.

use std::io::Cursor;

use eink_quantize::{Palette, PackedBuffer, QuantizedFrame};

use crate::error::ImageError;

/// Encode palette indices as an indexed PNG, then re-compress with oxipng.
pub fn encode_indexed_png(
    indices: &[u8],
    width: u32,
    height: u32,
    palette: &Palette,
) -> Result<Vec<u8>, ImageError> {
    let expected = width as usize * height as usize;
    if indices.len() != expected {
        return Err(ImageError::WrongBufferSize {
            size: indices.len(),
            expected,
        });
    }

    let (depth, bits) = match palette.len() {
        1..=2 => (png::BitDepth::One, 1),
        3..=4 => (png::BitDepth::Two, 2),
        _ => (png::BitDepth::Four, 4),
    };
    let plte: Vec<u8> = palette.colors().iter().flat_map(|c| c.to_bytes()).collect();
    let packed = pack_nbits(indices, width, bits);

    let png_bytes = encode_png(width, height, depth, &plte, &packed)?;

    let optimized = oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    )
    .unwrap_or(png_bytes);
    Ok(optimized)
}

/// Preview of one algorithm's output.
pub fn encode_frame_png(frame: &QuantizedFrame) -> Result<Vec<u8>, ImageError> {
    encode_indexed_png(
        frame.indices(),
        frame.width() as u32,
        frame.height() as u32,
        frame.palette(),
    )
}

/// Preview of a packed panel buffer, read back against the 7-color palette.
pub fn encode_packed_png(packed: &PackedBuffer) -> Result<Vec<u8>, ImageError> {
    let palette = Palette::acep7();
    let mut indices = packed.unpack();
    // Nibbles the panel would not know are shown as white
    for idx in indices.iter_mut().filter(|i| **i as usize >= palette.len()) {
        *idx = 1;
    }
    encode_indexed_png(
        &indices,
        packed.width() as u32,
        packed.height() as u32,
        &palette,
    )
}

fn encode_png(
    width: u32,
    height: u32,
    bit_depth: png::BitDepth,
    plte: &[u8],
    packed: &[u8],
) -> Result<Vec<u8>, ImageError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(bit_depth);
        encoder.set_compression(png::Compression::Fast);
        encoder.set_filter(png::FilterType::NoFilter);
        encoder.set_palette(plte);
        let mut writer = encoder
            .write_header()
            .map_err(|e| ImageError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(packed)
            .map_err(|e| ImageError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// Pack indices into PNG row data at 1, 2 or 4 bits per pixel.
///
/// Rows are padded to a whole byte, leftmost pixel in the high bits.
fn pack_nbits(indices: &[u8], width: u32, bits: u8) -> Vec<u8> {
    let pixels_per_byte = 8 / bits as usize;
    let bytes_per_row = (width as usize).div_ceil(pixels_per_byte);
    let mask = (1u8 << bits) - 1;
    let mut packed = Vec::with_capacity(bytes_per_row * (indices.len() / width.max(1) as usize));

    for row in indices.chunks(width as usize) {
        for group in row.chunks(pixels_per_byte) {
            let byte = group.iter().enumerate().fold(0u8, |acc, (i, &idx)| {
                acc | (idx & mask) << (8 - bits - i as u8 * bits)
            });
            packed.push(byte);
        }
    }

    packed
}
