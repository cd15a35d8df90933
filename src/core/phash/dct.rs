//! Separable 2-D DCT-II over a square pixel block.
//!
//! The perceptual hash only needs the low-frequency corner of the
//! transform, so this is a plain O(n^3) implementation rather than a
//! fast factorized one; at 32x32 input it is nowhere near a bottleneck.

use std::f64::consts::PI;

/// Compute the 2-D DCT-II of a `size` x `size` block, row-major input.
///
/// Returns the full coefficient matrix, row-major, with the DC term at
/// index 0.
pub fn dct_2d(block: &[f64], size: usize) -> Vec<f64> {
    debug_assert_eq!(block.len(), size * size);

    // Rows first, then columns. DCT-II is separable.
    let mut rows = vec![0.0; size * size];
    for y in 0..size {
        let row = &block[y * size..(y + 1) * size];
        let out = &mut rows[y * size..(y + 1) * size];
        dct_1d(row, out, size);
    }

    let mut coeffs = vec![0.0; size * size];
    let mut column = vec![0.0; size];
    let mut transformed = vec![0.0; size];
    for x in 0..size {
        for y in 0..size {
            column[y] = rows[y * size + x];
        }
        dct_1d(&column, &mut transformed, size);
        for y in 0..size {
            coeffs[y * size + x] = transformed[y];
        }
    }

    coeffs
}

fn dct_1d(input: &[f64], output: &mut [f64], size: usize) {
    let n = size as f64;
    for (k, out) in output.iter_mut().enumerate() {
        let mut sum = 0.0;
        for (i, &value) in input.iter().enumerate() {
            sum += value * (PI * (2.0 * i as f64 + 1.0) * k as f64 / (2.0 * n)).cos();
        }
        let scale = if k == 0 {
            (1.0 / n).sqrt()
        } else {
            (2.0 / n).sqrt()
        };
        *out = scale * sum;
    }
}
