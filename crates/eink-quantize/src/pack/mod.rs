//! 4-bit packing of palette indices into the panel's wire format.
//!
//! # Layout
//!
//! Rows are packed top to bottom; within a row, pixels are taken in pairs
//! left to right. Each pair becomes one byte with the even pixel in the
//! high nibble:
//!
//! ```text
//! byte = (index[x] & 0x0F) << 4 | (index[x + 1] & 0x0F)
//! ```
//!
//! A 448x600 canvas packs to exactly 134,400 bytes. There is no header.

use std::fmt;

/// Error returned when indices cannot be packed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackError {
    /// Width must be even so every row fills whole bytes.
    OddWidth(usize),
    /// `indices.len()` does not match `width * height`.
    LengthMismatch { expected: usize, actual: usize },
}

impl fmt::Display for PackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackError::OddWidth(w) => write!(f, "cannot pack odd width {}", w),
            PackError::LengthMismatch { expected, actual } => write!(
                f,
                "expected {} indices, got {}",
                expected, actual
            ),
        }
    }
}

impl std::error::Error for PackError {}

/// Packed 4-bit buffer, ready to hand to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedBuffer {
    bytes: Vec<u8>,
    width: usize,
    height: usize,
}

impl PackedBuffer {
    /// Wrap bytes received from elsewhere (for example by the panel
    /// simulator), checking the length against the dimensions.
    pub fn from_bytes(bytes: Vec<u8>, width: usize, height: usize) -> Result<Self, PackError> {
        if width % 2 != 0 {
            return Err(PackError::OddWidth(width));
        }
        let expected = width * height / 2;
        if bytes.len() != expected {
            return Err(PackError::LengthMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            bytes,
            width,
            height,
        })
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }

    /// Expand back to one index per pixel.
    pub fn unpack(&self) -> Vec<u8> {
        unpack(&self.bytes)
    }
}

impl AsRef<[u8]> for PackedBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Pack palette indices, two per byte.
///
/// Only the low nibble of each index is kept.
///
/// # Errors
///
/// - [`PackError::OddWidth`] if `width` is odd
/// - [`PackError::LengthMismatch`] if `indices.len() != width * height`
///
/// # Example
///
/// ```
/// use eink_quantize::pack;
///
/// let packed = pack(&[0, 1, 2, 3], 4, 1).unwrap();
/// assert_eq!(packed.as_bytes(), &[0x01, 0x23]);
/// ```
pub fn pack(indices: &[u8], width: usize, height: usize) -> Result<PackedBuffer, PackError> {
    if width % 2 != 0 {
        return Err(PackError::OddWidth(width));
    }
    if indices.len() != width * height {
        return Err(PackError::LengthMismatch {
            expected: width * height,
            actual: indices.len(),
        });
    }

    // Rows have even width, so pairing across the flat slice never
    // straddles a row boundary.
    let bytes = indices
        .chunks_exact(2)
        .map(|pair| (pair[0] & 0x0F) << 4 | (pair[1] & 0x0F))
        .collect();

    Ok(PackedBuffer {
        bytes,
        width,
        height,
    })
}

/// Expand packed bytes to one index per pixel, high nibble first.
pub fn unpack(bytes: &[u8]) -> Vec<u8> {
    let mut indices = Vec::with_capacity(bytes.len() * 2);
    for &byte in bytes {
        indices.push(byte >> 4);
        indices.push(byte & 0x0F);
    }
    indices
}
