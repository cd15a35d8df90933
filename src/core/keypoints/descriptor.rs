//! Rotated binary descriptors (BRIEF-style).
//!
//! Each descriptor is 256 intensity comparisons between pixel pairs in a
//! patch around the keypoint. The pair layout is a fixed pseudorandom
//! pattern, identical for every image in a build; before sampling it is
//! rotated by the keypoint orientation, which makes the comparisons hold
//! up when the image itself is rotated.

use super::detector::Keypoint;
use image::GrayImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Descriptor length in bytes (256 bits).
pub const DESCRIPTOR_BYTES: usize = 32;

/// Test points are drawn from this half-window around the keypoint.
/// After rotation the farthest sample sits at ~13 * sqrt(2) = 18.4 px,
/// inside the detector's border margin.
const PATCH_HALF: i32 = 13;

/// Seed for the sampling pattern. Changing it invalidates every
/// previously computed descriptor, so it is a fixed constant.
const PATTERN_SEED: u64 = 0x5eed_0b5e_55ed_cafe;

/// A fixed-length binary descriptor for one keypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryDescriptor(pub [u8; DESCRIPTOR_BYTES]);

impl BinaryDescriptor {
    /// Hamming distance: differing bit count across all 256 bits.
    pub fn distance(&self, other: &Self) -> u32 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum()
    }
}

/// The fixed pattern of pixel pairs each descriptor bit compares.
pub struct SamplingPattern {
    pairs: Vec<(i32, i32, i32, i32)>,
}

impl SamplingPattern {
    pub fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(PATTERN_SEED);
        let pairs = (0..DESCRIPTOR_BYTES * 8)
            .map(|_| {
                (
                    rng.random_range(-PATCH_HALF..=PATCH_HALF),
                    rng.random_range(-PATCH_HALF..=PATCH_HALF),
                    rng.random_range(-PATCH_HALF..=PATCH_HALF),
                    rng.random_range(-PATCH_HALF..=PATCH_HALF),
                )
            })
            .collect();
        Self { pairs }
    }

    /// Describe one keypoint by sampling the pattern rotated to the
    /// keypoint's orientation.
    pub fn describe(&self, image: &GrayImage, keypoint: &Keypoint) -> BinaryDescriptor {
        let (sin, cos) = keypoint.angle.sin_cos();
        let mut bytes = [0u8; DESCRIPTOR_BYTES];

        for (bit, &(px, py, qx, qy)) in self.pairs.iter().enumerate() {
            let p = sample_rotated(image, keypoint, px, py, sin, cos);
            let q = sample_rotated(image, keypoint, qx, qy, sin, cos);
            if p < q {
                bytes[bit / 8] |= 1 << (bit % 8);
            }
        }

        BinaryDescriptor(bytes)
    }
}

impl Default for SamplingPattern {
    fn default() -> Self {
        Self::new()
    }
}

fn sample_rotated(image: &GrayImage, keypoint: &Keypoint, dx: i32, dy: i32, sin: f32, cos: f32) -> u8 {
    let rx = (cos * dx as f32 - sin * dy as f32).round() as i64;
    let ry = (sin * dx as f32 + cos * dy as f32).round() as i64;
    let x = (keypoint.x as i64 + rx).clamp(0, image.width() as i64 - 1);
    let y = (keypoint.y as i64 + ry).clamp(0, image.height() as i64 - 1);
    image.get_pixel(x as u32, y as u32).0[0]
}
