//! # Perceptual Hash Module
//!
//! DCT-based perceptual hashing (pHash).
//!
//! ## How It Works
//! 1. Resize the image to 32x32 grayscale
//! 2. Apply a 2-D DCT to extract frequency information
//! 3. Keep the top-left 8x8 low-frequency block, minus the DC term
//! 4. Emit one bit per coefficient: 1 if above the block median
//!
//! The result is a 63-bit signature that survives re-encoding, resizing
//! and small edits. Two signatures are compared by Hamming distance.
//!
//! Signatures are only meaningful against signatures built with the same
//! parameters. The parameters here are compile-time constants, so every
//! signature in one build is comparable with every other; nothing is
//! persisted or versioned.

mod dct;

use image::{imageops, GrayImage};
use serde::{Deserialize, Serialize};

/// Side of the square the image is reduced to before the transform.
const REDUCED_SIZE: u32 = 32;
/// Side of the retained low-frequency coefficient block.
const BLOCK_SIZE: usize = 8;
/// Signature length: the 8x8 block minus the DC term.
pub const SIGNATURE_BITS: u32 = (BLOCK_SIZE * BLOCK_SIZE - 1) as u32;

/// Default Hamming-distance threshold under which two images are
/// considered similar.
pub const DEFAULT_THRESHOLD: u32 = 10;

/// A fixed-length binary fingerprint of one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerceptualSignature {
    bits: u64,
}

impl PerceptualSignature {
    /// Hamming distance to another signature: the number of differing
    /// bit positions. Always in `[0, SIGNATURE_BITS]`.
    pub fn distance(&self, other: &Self) -> u32 {
        (self.bits ^ other.bits).count_ones()
    }

    /// Hexadecimal rendering, 16 chars.
    pub fn to_hex(&self) -> String {
        format!("{:016x}", self.bits)
    }

    #[cfg(test)]
    fn from_bits(bits: u64) -> Self {
        Self { bits }
    }
}

impl std::fmt::Display for PerceptualSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Outcome of one pHash comparison.
#[derive(Debug, Clone, Copy)]
pub struct HashDistance {
    pub difference: u32,
    pub similar: bool,
}

/// Compute the perceptual signature of a grayscale image.
pub fn signature(image: &GrayImage) -> PerceptualSignature {
    let reduced = imageops::resize(
        image,
        REDUCED_SIZE,
        REDUCED_SIZE,
        imageops::FilterType::Triangle,
    );

    let block: Vec<f64> = reduced.pixels().map(|p| p.0[0] as f64).collect();
    let coeffs = dct::dct_2d(&block, REDUCED_SIZE as usize);

    // Low-frequency corner in raster order, skipping the DC term. The DC
    // term only encodes average brightness and would dominate the median.
    let mut retained = Vec::with_capacity(SIGNATURE_BITS as usize);
    for y in 0..BLOCK_SIZE {
        for x in 0..BLOCK_SIZE {
            if y == 0 && x == 0 {
                continue;
            }
            retained.push(coeffs[y * REDUCED_SIZE as usize + x]);
        }
    }

    let med = median(&retained);

    let mut bits = 0u64;
    for (i, &coeff) in retained.iter().enumerate() {
        if coeff > med {
            bits |= 1 << i;
        }
    }

    PerceptualSignature { bits }
}

/// Compare two images by perceptual-hash distance.
///
/// `similar` is true when the Hamming distance does not exceed
/// `threshold`.
pub fn hash_distance(
    reference: &PerceptualSignature,
    candidate: &PerceptualSignature,
    threshold: u32,
) -> HashDistance {
    let difference = reference.distance(candidate);
    HashDistance {
        difference,
        similar: difference <= threshold,
    }
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
