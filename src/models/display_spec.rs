use crate::error::ImageError;

/// Panel geometry and color count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySpec {
    pub width: u32,
    pub height: u32,
    pub colors: usize,
}

impl DisplaySpec {
    /// Waveshare 5.65" ACeP: 600x448 landscape, driven as a 448x600 portrait canvas
    pub const PANEL_565: Self = Self {
        width: eink_quantize::CANVAS_WIDTH as u32,
        height: eink_quantize::CANVAS_HEIGHT as u32,
        colors: 7,
    };

    /// Bytes in a packed frame (two pixels per byte)
    pub fn packed_len(&self) -> usize {
        self.width as usize * self.height as usize / 2
    }

    /// Validate that a received buffer is exactly one packed frame
    pub fn validate_size(&self, bytes: usize) -> Result<(), ImageError> {
        if bytes != self.packed_len() {
            Err(ImageError::WrongBufferSize {
                size: bytes,
                expected: self.packed_len(),
            })
        } else {
            Ok(())
        }
    }
}
