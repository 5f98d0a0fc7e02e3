//! inkframe - photos for 7-color e-paper frames
//!
//! Crops a photo onto the 448x600 panel canvas, compares the dithering
//! algorithms from `eink-quantize`, packs the chosen one to 4 bits per
//! pixel and uploads it to the frame. This library exposes the modules
//! used by the `inkframe` binary and the integration tests.

pub mod api;
pub mod error;
pub mod models;
pub mod rendering;
pub mod server;
pub mod services;
