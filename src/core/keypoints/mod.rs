//! # Keypoints Module
//!
//! ORB-style keypoint matching: FAST corner detection, orientation
//! assignment, rotated binary descriptors and brute-force Hamming
//! matching with cross-check.
//!
//! ## Pipeline
//! 1. `detector` - oriented FAST-9 corners, strongest first, capped at
//!    `max_features`
//! 2. `descriptor` - 256-bit comparisons sampled relative to the
//!    keypoint orientation
//! 3. `matcher` - mutual nearest-neighbour pairing, sorted best-first
//! 4. `render` - optional side-by-side match visualization

pub mod descriptor;
pub mod detector;
pub mod matcher;
pub mod render;

pub use descriptor::{BinaryDescriptor, SamplingPattern, DESCRIPTOR_BYTES};
pub use detector::Keypoint;
pub use matcher::{match_descriptors, DescriptorMatch};

use image::GrayImage;

/// Default cap on detected features per image.
pub const DEFAULT_MAX_FEATURES: usize = 10_000;
/// Default FAST-9 intensity threshold.
pub const DEFAULT_FAST_THRESHOLD: u8 = 20;

/// Detector/descriptor configuration.
#[derive(Debug, Clone)]
pub struct KeypointConfig {
    /// Upper bound on keypoints per image; also caps how many matches
    /// the visualization draws.
    pub max_features: usize,
    /// FAST corner threshold; lower finds more (weaker) corners.
    pub fast_threshold: u8,
}

impl Default for KeypointConfig {
    fn default() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
            fast_threshold: DEFAULT_FAST_THRESHOLD,
        }
    }
}

/// Keypoints and their index-aligned descriptors for one image.
pub struct KeypointSet {
    pub keypoints: Vec<Keypoint>,
    pub descriptors: Vec<BinaryDescriptor>,
}

impl KeypointSet {
    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }
}

/// Extracts keypoint sets with one shared sampling pattern.
pub struct KeypointEngine {
    config: KeypointConfig,
    pattern: SamplingPattern,
}

impl KeypointEngine {
    pub fn new(config: KeypointConfig) -> Self {
        Self {
            config,
            pattern: SamplingPattern::new(),
        }
    }

    /// Detect and describe keypoints. An image without detectable
    /// corners yields an empty set; that is a valid result, not an
    /// error.
    pub fn extract(&self, image: &GrayImage) -> KeypointSet {
        let keypoints = detector::detect(image, self.config.fast_threshold, self.config.max_features);
        let descriptors = keypoints
            .iter()
            .map(|kp| self.pattern.describe(image, kp))
            .collect();

        KeypointSet {
            keypoints,
            descriptors,
        }
    }

    pub fn config(&self) -> &KeypointConfig {
        &self.config
    }
}

/// Match percentage over the smaller keypoint set, rounded to two
/// decimals. Zero keypoints on either side gives 0 instead of dividing
/// by zero.
pub fn match_percent(match_count: usize, reference_count: usize, candidate_count: usize) -> f64 {
    let denominator = reference_count.min(candidate_count);
    if denominator == 0 {
        return 0.0;
    }
    let percent = match_count as f64 / denominator as f64 * 100.0;
    (percent * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageBuffer;

    fn noise_image(width: u32, height: u32, seed: u64) -> GrayImage {
        let mut state = seed;
        let mut next = move || {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (state >> 33) as u8
        };
        let pixels: Vec<u8> = (0..width * height).map(|_| next()).collect();
        ImageBuffer::from_vec(width, height, pixels).unwrap()
    }

    #[test]
    fn keypoints_and_descriptors_are_index_aligned() {
        let engine = KeypointEngine::new(KeypointConfig::default());
        let set = engine.extract(&noise_image(128, 128, 3));

        assert!(!set.is_empty());
        assert_eq!(set.keypoints.len(), set.descriptors.len());
    }

    #[test]
    fn image_matched_against_itself_is_near_complete() {
        let engine = KeypointEngine::new(KeypointConfig::default());
        let image = noise_image(160, 120, 11);
        let a = engine.extract(&image);
        let b = engine.extract(&image);

        let matches = match_descriptors(&a.descriptors, &b.descriptors);
        let percent = match_percent(matches.len(), a.len(), b.len());

        assert!(matches.len() <= a.len().min(b.len()));
        assert!(
            percent >= 95.0,
            "self-match should be near 100%, got {percent}%"
        );
        for m in &matches {
            assert_eq!(m.distance, 0);
        }
    }

    #[test]
    fn match_percent_guards_zero_denominator() {
        assert_eq!(match_percent(0, 0, 10), 0.0);
        assert_eq!(match_percent(0, 10, 0), 0.0);
        assert_eq!(match_percent(0, 0, 0), 0.0);
    }

    #[test]
    fn match_percent_rounds_to_two_decimals() {
        // 1/3 * 100 = 33.333... -> 33.33
        assert_eq!(match_percent(1, 3, 5), 33.33);
        assert_eq!(match_percent(2, 3, 3), 66.67);
        assert_eq!(match_percent(3, 3, 7), 100.0);
    }

    #[test]
    fn extraction_is_reproducible() {
        let engine = KeypointEngine::new(KeypointConfig::default());
        let image = noise_image(128, 128, 21);

        let a = engine.extract(&image);
        let b = engine.extract(&image);

        assert_eq!(a.len(), b.len());
        for (da, db) in a.descriptors.iter().zip(&b.descriptors) {
            assert_eq!(da, db);
        }
    }
}
