//! Side-by-side match visualization.
//!
//! Renders the reference image on the left, the candidate on the right,
//! and a coloured line per kept match connecting the two keypoints.
//! Only keypoints that participate in a drawn match get a circle.

use super::detector::Keypoint;
use super::matcher::DescriptorMatch;
use crate::error::OutputError;
use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_line_segment_mut};
use std::path::{Path, PathBuf};

const KEYPOINT_RADIUS: i32 = 4;

/// Rotating line colours so adjacent matches stay distinguishable.
const PALETTE: [Rgb<u8>; 6] = [
    Rgb([230, 60, 60]),
    Rgb([60, 200, 60]),
    Rgb([70, 120, 230]),
    Rgb([230, 180, 40]),
    Rgb([200, 70, 200]),
    Rgb([60, 200, 200]),
];

/// Draw the first `limit` matches (they arrive best-first) on a
/// side-by-side canvas.
pub fn render_matches(
    reference: &GrayImage,
    candidate: &GrayImage,
    reference_keypoints: &[Keypoint],
    candidate_keypoints: &[Keypoint],
    matches: &[DescriptorMatch],
    limit: usize,
) -> RgbImage {
    let width = reference.width() + candidate.width();
    let height = reference.height().max(candidate.height());

    let mut canvas: RgbImage = RgbImage::from_pixel(width, height, Rgb([0, 0, 0]));
    blit_gray(&mut canvas, reference, 0);
    blit_gray(&mut canvas, candidate, reference.width());

    let offset = reference.width() as f32;
    for (i, m) in matches.iter().take(limit).enumerate() {
        let ref_kp = &reference_keypoints[m.reference_idx];
        let cand_kp = &candidate_keypoints[m.candidate_idx];
        let color = PALETTE[i % PALETTE.len()];

        draw_hollow_circle_mut(
            &mut canvas,
            (ref_kp.x as i32, ref_kp.y as i32),
            KEYPOINT_RADIUS,
            color,
        );
        draw_hollow_circle_mut(
            &mut canvas,
            (cand_kp.x as i32 + offset as i32, cand_kp.y as i32),
            KEYPOINT_RADIUS,
            color,
        );
        draw_line_segment_mut(
            &mut canvas,
            (ref_kp.x as f32, ref_kp.y as f32),
            (cand_kp.x as f32 + offset, cand_kp.y as f32),
            color,
        );
    }

    canvas
}

/// Persist a rendered visualization under `output_dir`, named after the
/// candidate's base name. Returns the written path.
pub fn save_visualization(
    canvas: &RgbImage,
    output_dir: &Path,
    candidate_path: &Path,
) -> Result<PathBuf, OutputError> {
    let stem = candidate_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("candidate");
    let output_path = output_dir.join(format!("matches_orb_{}.png", stem));

    canvas
        .save(&output_path)
        .map_err(|e| OutputError::WriteImage {
            path: output_path.clone(),
            reason: e.to_string(),
        })?;

    Ok(output_path)
}

fn blit_gray(canvas: &mut RgbImage, source: &GrayImage, x_offset: u32) {
    for (x, y, pixel) in source.enumerate_pixels() {
        let v = pixel.0[0];
        canvas.put_pixel(x + x_offset, y, Rgb([v, v, v]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma};
    use tempfile::TempDir;

    fn gray(width: u32, height: u32, value: u8) -> GrayImage {
        ImageBuffer::from_pixel(width, height, Luma([value]))
    }

    fn keypoint(x: u32, y: u32) -> Keypoint {
        Keypoint {
            x,
            y,
            score: 1.0,
            angle: 0.0,
        }
    }

    #[test]
    fn canvas_is_side_by_side() {
        let reference = gray(40, 30, 100);
        let candidate = gray(60, 50, 200);

        let canvas = render_matches(&reference, &candidate, &[], &[], &[], 10);

        assert_eq!(canvas.dimensions(), (100, 50));
        // Left half carries the reference, right half the candidate.
        assert_eq!(canvas.get_pixel(5, 5).0, [100, 100, 100]);
        assert_eq!(canvas.get_pixel(45, 5).0, [200, 200, 200]);
        // Area below the shorter image stays black.
        assert_eq!(canvas.get_pixel(5, 40).0, [0, 0, 0]);
    }

    #[test]
    fn matched_keypoints_are_drawn() {
        let reference = gray(50, 50, 0);
        let candidate = gray(50, 50, 0);
        let ref_kps = vec![keypoint(25, 25)];
        let cand_kps = vec![keypoint(25, 25)];
        let matches = vec![DescriptorMatch {
            reference_idx: 0,
            candidate_idx: 0,
            distance: 0,
        }];

        let canvas = render_matches(&reference, &candidate, &ref_kps, &cand_kps, &matches, 10);

        let colored = canvas
            .pixels()
            .filter(|p| p.0 != [0, 0, 0])
            .count();
        assert!(colored > 0, "expected drawn circles and a line");
    }

    #[test]
    fn limit_zero_draws_nothing() {
        let reference = gray(50, 50, 0);
        let candidate = gray(50, 50, 0);
        let ref_kps = vec![keypoint(25, 25)];
        let cand_kps = vec![keypoint(30, 30)];
        let matches = vec![DescriptorMatch {
            reference_idx: 0,
            candidate_idx: 0,
            distance: 0,
        }];

        let canvas = render_matches(&reference, &candidate, &ref_kps, &cand_kps, &matches, 0);
        assert!(canvas.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn visualization_is_persisted_with_candidate_stem() {
        let dir = TempDir::new().unwrap();
        let canvas = RgbImage::from_pixel(10, 10, Rgb([1, 2, 3]));

        let path = save_visualization(&canvas, dir.path(), Path::new("/some/where/photo.webp"))
            .unwrap();

        assert!(path.exists());
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "matches_orb_photo.png"
        );
    }
}
