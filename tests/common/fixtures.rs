//! Test fixtures and constants.

use inkframe::models::DisplaySpec;

/// Boundary used by hand-built multipart bodies
pub const MULTIPART_BOUNDARY: &str = "inkframe-test-boundary";

/// Size of one packed 448x600 frame
pub fn packed_len() -> usize {
    DisplaySpec::PANEL_565.packed_len()
}

/// A packed frame with every byte set to `byte`
pub fn packed_frame(byte: u8) -> Vec<u8> {
    vec![byte; packed_len()]
}

/// A single-part multipart/form-data body
pub fn multipart_body(field: &str, filename: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{MULTIPART_BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

/// Encode straight RGBA as a PNG file
pub fn png_from_rgba(width: u32, height: u32, rgba: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(rgba).unwrap();
    }
    out
}

/// A one-color PNG photo
pub fn solid_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let rgba = [rgb[0], rgb[1], rgb[2], 255].repeat((width * height) as usize);
    png_from_rgba(width, height, &rgba)
}

/// A PNG photo with a horizontal grey ramp, so dithers differ
pub fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for _y in 0..height {
        for x in 0..width {
            let v = (x * 255 / width.max(2).saturating_sub(1)).min(255) as u8;
            rgba.extend_from_slice(&[v, v, v, 255]);
        }
    }
    png_from_rgba(width, height, &rgba)
}
