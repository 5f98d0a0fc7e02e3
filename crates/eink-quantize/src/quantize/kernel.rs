//! Diffusion kernels: where a pixel's quantization error goes.
//!
//! Each kernel specifies how quantization error is distributed to
//! neighboring pixels that have not been visited yet in raster order.

/// Weights for spreading one pixel's error onto its unvisited neighbors.
///
/// Each entry is an offset `(dx, dy)` and a weight. A neighbor receives
/// `error * weight / divisor`; neighbors outside the image drop their share.
///
/// # Error Propagation
///
/// The total error propagated is `sum(weights) / divisor`. Floyd-Steinberg
/// propagates 100%; Atkinson intentionally propagates only 75%.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    /// (dx, dy, weight) entries.
    ///
    /// - `dx`: horizontal offset (positive = right)
    /// - `dy`: vertical offset (never negative)
    /// - `weight`: numerator, see `divisor`
    pub entries: &'static [(i32, i32, u8)],

    /// Common denominator of the weights.
    pub divisor: u8,
}

impl Kernel {
    /// Fraction of the error this kernel passes on when no neighbor is clipped.
    pub fn propagation(&self) -> f32 {
        let total: u32 = self.entries.iter().map(|&(_, _, w)| w as u32).sum();
        total as f32 / self.divisor as f32
    }
}

/// Floyd-Steinberg: four neighbors, all of the error.
///
/// Weights sum to 16/16.
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[
        (1, 0, 7),  // right
        (-1, 1, 3), // below left
        (0, 1, 5),  // below
        (1, 1, 1),  // below right
    ],
    divisor: 16,
};

/// Atkinson: six neighbors, three quarters of the error.
///
/// Weights sum to 6/8; the dropped quarter keeps highlights and shadows
/// clean on a small palette.
///
/// ```text
///        X   1   1
///    1   1   1
///        1
/// ```
pub const ATKINSON: Kernel = Kernel {
    entries: &[
        (1, 0, 1),  // right
        (2, 0, 1),  // two right
        (-1, 1, 1), // below left
        (0, 1, 1),  // below
        (1, 1, 1),  // below right
        (0, 2, 1),  // two below
    ],
    divisor: 8,
};
