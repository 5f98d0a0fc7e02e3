//! PNG decoding into a [`SourceImage`].

use std::io::Cursor;

use eink_quantize::SourceImage;

use crate::error::InputRejected;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Refuse to allocate for anything larger than this many pixels.
const MAX_PIXELS: u64 = 64 * 1024 * 1024;

/// Decode a PNG file into straight RGBA8 and validate it as a source photo.
///
/// Palette, grayscale and 16-bit images are normalized to 8-bit RGBA.
pub fn decode_png(bytes: &[u8]) -> Result<SourceImage, InputRejected> {
    if !bytes.starts_with(&PNG_SIGNATURE) {
        return Err(InputRejected::NotAnImage(
            "missing PNG signature".to_string(),
        ));
    }

    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e| InputRejected::NotAnImage(e.to_string()))?;

    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };
    if width as u64 * height as u64 > MAX_PIXELS {
        return Err(eink_quantize::SourceError::TooLarge { width, height }.into());
    }

    let mut buf = vec![0; reader.output_buffer_size()];
    let frame = reader
        .next_frame(&mut buf)
        .map_err(|e| InputRejected::NotAnImage(e.to_string()))?;
    buf.truncate(frame.buffer_size());

    let rgba = match frame.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        png::ColorType::Indexed => {
            return Err(InputRejected::NotAnImage(
                "palette image was not expanded".to_string(),
            ))
        }
    };

    tracing::debug!(width, height, color_type = ?frame.color_type, "Decoded PNG");
    Ok(SourceImage::from_rgba(width, height, rgba)?)
}
