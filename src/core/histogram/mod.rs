//! # Histogram Module
//!
//! Color-distribution comparison over a 2-D hue/saturation histogram.
//!
//! ## How It Works
//! 1. Convert each pixel to HSV and drop the value channel, so the
//!    comparison reacts to color, not brightness
//! 2. Accumulate a 50 (hue) x 60 (saturation) bin grid
//! 3. Min-max normalize bin counts into [0, 1]
//! 4. Score the two grids with a selectable statistical metric
//!
//! ## Verdict direction
//! Correlation and intersection grow with similarity, chi-square and
//! Bhattacharyya shrink with it. The threshold comparison flips
//! accordingly; getting this table wrong silently inverts every verdict,
//! so it lives in exactly one place (`HistogramMethod::is_similar`).

use image::RgbImage;
use serde::{Deserialize, Serialize};

/// Hue bins (hue range 0..360 degrees).
const HUE_BINS: usize = 50;
/// Saturation bins (range 0..1).
const SAT_BINS: usize = 60;

/// Default similarity threshold for the default (correlation) method.
pub const DEFAULT_THRESHOLD: f64 = 0.8;

/// Statistical comparison metric between two normalized histograms.
///
/// Correlation scores near 1.0 mean identical color content, 0.8-0.99
/// very similar, 0.5-0.9 resembling, below 0.5 distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistogramMethod {
    /// Pearson correlation in [-1, 1]; higher is more similar.
    Correlation,
    /// Chi-square distance, >= 0; lower is more similar.
    ChiSquare,
    /// Bin-wise minimum overlap; higher is more similar.
    Intersection,
    /// Bhattacharyya distance in [0, 1]; lower is more similar.
    Bhattacharyya,
}

impl HistogramMethod {
    /// Apply the method's verdict direction to a score.
    pub fn is_similar(&self, similarity: f64, threshold: f64) -> bool {
        match self {
            HistogramMethod::Correlation | HistogramMethod::Intersection => {
                similarity >= threshold
            }
            HistogramMethod::ChiSquare | HistogramMethod::Bhattacharyya => {
                similarity <= threshold
            }
        }
    }
}

impl Default for HistogramMethod {
    fn default() -> Self {
        HistogramMethod::Correlation
    }
}

impl std::fmt::Display for HistogramMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistogramMethod::Correlation => write!(f, "correlation"),
            HistogramMethod::ChiSquare => write!(f, "chi-square"),
            HistogramMethod::Intersection => write!(f, "intersection"),
            HistogramMethod::Bhattacharyya => write!(f, "bhattacharyya"),
        }
    }
}

/// A min-max normalized hue/saturation histogram.
#[derive(Debug, Clone)]
pub struct HsHistogram {
    bins: Vec<f64>,
}

impl HsHistogram {
    /// Build the histogram of an RGB image.
    pub fn from_rgb(image: &RgbImage) -> Self {
        let mut bins = vec![0.0f64; HUE_BINS * SAT_BINS];

        for pixel in image.pixels() {
            let [r, g, b] = pixel.0;
            let (hue, saturation) = hue_saturation(r, g, b);

            let h_bin = ((hue / 360.0 * HUE_BINS as f64) as usize).min(HUE_BINS - 1);
            let s_bin = ((saturation * SAT_BINS as f64) as usize).min(SAT_BINS - 1);
            bins[h_bin * SAT_BINS + s_bin] += 1.0;
        }

        normalize_min_max(&mut bins);
        Self { bins }
    }

    /// Score this histogram against another with the given method.
    pub fn compare(&self, other: &Self, method: HistogramMethod) -> f64 {
        match method {
            HistogramMethod::Correlation => correlation(&self.bins, &other.bins),
            HistogramMethod::ChiSquare => chi_square(&self.bins, &other.bins),
            HistogramMethod::Intersection => intersection(&self.bins, &other.bins),
            HistogramMethod::Bhattacharyya => bhattacharyya(&self.bins, &other.bins),
        }
    }
}

/// Hue in degrees [0, 360) and saturation in [0, 1] of an RGB pixel.
fn hue_saturation(r: u8, g: u8, b: u8) -> (f64, f64) {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let chroma = max - min;

    let hue = if chroma == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / chroma).rem_euclid(6.0))
    } else if max == g {
        60.0 * ((b - r) / chroma + 2.0)
    } else {
        60.0 * ((r - g) / chroma + 4.0)
    };

    let saturation = if max == 0.0 { 0.0 } else { chroma / max };

    (hue, saturation)
}

/// Scale bins into [0, 1]. A flat histogram (max == min) collapses to
/// all zeros.
fn normalize_min_max(bins: &mut [f64]) {
    let max = bins.iter().cloned().fold(f64::MIN, f64::max);
    let min = bins.iter().cloned().fold(f64::MAX, f64::min);
    let range = max - min;

    if range == 0.0 {
        bins.iter_mut().for_each(|b| *b = 0.0);
        return;
    }
    bins.iter_mut().for_each(|b| *b = (*b - min) / range);
}

fn correlation(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        covariance += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    let denominator = (var_a * var_b).sqrt();
    if denominator == 0.0 {
        // Zero-variance histogram: correlation is undefined, so fall
        // back to exact equality.
        return if a == b { 1.0 } else { 0.0 };
    }
    covariance / denominator
}

fn chi_square(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .filter(|(&x, _)| x > 0.0)
        .map(|(&x, &y)| (x - y) * (x - y) / x)
        .sum()
}

fn intersection(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(&x, &y)| x.min(y)).sum()
}

fn bhattacharyya(a: &[f64], b: &[f64]) -> f64 {
    let sum_a: f64 = a.iter().sum();
    let sum_b: f64 = b.iter().sum();
    if sum_a == 0.0 || sum_b == 0.0 {
        // No mass on one side: identical if both empty, else maximally
        // distant.
        return if a == b { 0.0 } else { 1.0 };
    }

    let coefficient: f64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| (x * y).sqrt())
        .sum::<f64>()
        / (sum_a * sum_b).sqrt();

    (1.0 - coefficient.min(1.0)).sqrt()
}

/// Round a similarity score the way the report format expects.
pub fn round_similarity(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
