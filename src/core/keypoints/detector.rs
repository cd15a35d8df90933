//! FAST corner detection with orientation assignment.
//!
//! Detection itself comes from imageproc's FAST-9 implementation. Each
//! kept corner is then given an orientation by the intensity-centroid
//! method: the angle between the corner and the centroid of pixel
//! intensities in a circular patch around it. Sampling the descriptor
//! relative to this angle is what buys rotation invariance.

use image::GrayImage;
use imageproc::corners::corners_fast9;

/// Radius of the circular patch used for the intensity centroid.
const CENTROID_RADIUS: i32 = 15;

/// Keypoints closer than this to an image border are discarded so the
/// oriented descriptor window never leaves the image.
pub const BORDER_MARGIN: u32 = 20;

/// A detected corner with position, detector response and orientation.
#[derive(Debug, Clone, Copy)]
pub struct Keypoint {
    pub x: u32,
    pub y: u32,
    /// FAST corner response; higher is a stronger corner.
    pub score: f32,
    /// Orientation in radians, assigned by intensity centroid.
    pub angle: f32,
}

/// Detect up to `max_features` oriented FAST corners.
///
/// Corners are ranked by detector response so the cap keeps the
/// strongest ones. Ties are broken by raster position, which keeps the
/// detector fully deterministic.
pub fn detect(image: &GrayImage, fast_threshold: u8, max_features: usize) -> Vec<Keypoint> {
    let (width, height) = image.dimensions();
    if width <= 2 * BORDER_MARGIN || height <= 2 * BORDER_MARGIN {
        return Vec::new();
    }

    let mut corners: Vec<_> = corners_fast9(image, fast_threshold)
        .into_iter()
        .filter(|c| {
            c.x >= BORDER_MARGIN
                && c.y >= BORDER_MARGIN
                && c.x < width - BORDER_MARGIN
                && c.y < height - BORDER_MARGIN
        })
        .collect();

    corners.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| (a.y, a.x).cmp(&(b.y, b.x)))
    });
    corners.truncate(max_features);

    corners
        .into_iter()
        .map(|c| Keypoint {
            x: c.x,
            y: c.y,
            score: c.score,
            angle: orientation(image, c.x, c.y),
        })
        .collect()
}

/// Intensity-centroid orientation of the patch around `(cx, cy)`.
fn orientation(image: &GrayImage, cx: u32, cy: u32) -> f32 {
    let (width, height) = image.dimensions();
    let mut m10 = 0f64;
    let mut m01 = 0f64;

    for dy in -CENTROID_RADIUS..=CENTROID_RADIUS {
        for dx in -CENTROID_RADIUS..=CENTROID_RADIUS {
            if dx * dx + dy * dy > CENTROID_RADIUS * CENTROID_RADIUS {
                continue;
            }
            let x = cx as i64 + dx as i64;
            let y = cy as i64 + dy as i64;
            if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
                continue;
            }
            let intensity = image.get_pixel(x as u32, y as u32).0[0] as f64;
            m10 += dx as f64 * intensity;
            m01 += dy as f64 * intensity;
        }
    }

    (m01.atan2(m10)) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma};

    /// Deterministic noise image; FAST finds plenty of corners in it.
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
    fn flat_image_has_no_keypoints() {
        let image: GrayImage = ImageBuffer::from_pixel(100, 100, Luma([128u8]));
        assert!(detect(&image, 20, 1000).is_empty());
    }

    #[test]
    fn tiny_image_has_no_keypoints() {
        let image = noise_image(30, 30, 7);
        assert!(detect(&image, 20, 1000).is_empty());
    }

    #[test]
    fn noise_image_yields_keypoints_inside_margin() {
        let image = noise_image(128, 128, 42);
        let keypoints = detect(&image, 20, 10_000);

        assert!(!keypoints.is_empty());
        for kp in &keypoints {
            assert!(kp.x >= BORDER_MARGIN && kp.x < 128 - BORDER_MARGIN);
            assert!(kp.y >= BORDER_MARGIN && kp.y < 128 - BORDER_MARGIN);
        }
    }

    #[test]
    fn max_features_caps_and_keeps_strongest() {
        let image = noise_image(128, 128, 42);
        let all = detect(&image, 20, 10_000);
        let capped = detect(&image, 20, 10);

        assert!(all.len() > 10);
        assert_eq!(capped.len(), 10);
        let weakest_kept = capped.last().unwrap().score;
        for kp in &all[10..] {
            assert!(kp.score <= weakest_kept);
        }
    }

    #[test]
    fn detection_is_deterministic() {
        let image = noise_image(128, 128, 99);
        let a = detect(&image, 20, 500);
        let b = detect(&image, 20, 500);

        assert_eq!(a.len(), b.len());
        for (ka, kb) in a.iter().zip(&b) {
            assert_eq!((ka.x, ka.y), (kb.x, kb.y));
            assert_eq!(ka.angle, kb.angle);
        }
    }
}
