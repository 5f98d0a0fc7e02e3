//! Color types
//!
//! The pipeline works on plain 8-bit RGB. There is no gamma handling: palette
//! matching is Euclidean distance over the raw channel values, which is what
//! the panel firmware's lookup table was tuned against.
//!
//! # Example
//!
//! ```
//! use eink_quantize::Rgb;
//!
//! let orange = Rgb::new(255, 140, 0);
//! assert_eq!(orange.to_string(), "#FF8C00");
//! assert_eq!(Rgb::new(128, 128, 128).luma(), 128.0);
//! ```

mod rgb;

pub(crate) use rgb::luma;
pub use rgb::Rgb;
