//! # Comparator Module
//!
//! The façade callers talk to: one reference image, an ordered list of
//! candidates, one result record per candidate in input order.
//!
//! The reference raster is decoded once per call and its derived state
//! (signature, keypoint set, histogram) is computed once and shared
//! across candidates. Nothing is cached between calls: a façade holds
//! only the reference path.
//!
//! A candidate that cannot be decoded aborts the whole batch. Reporting
//! a broken file as "0% similar" would be a silent lie; the caller gets
//! the `DecodeError` instead.

use crate::core::decoder;
use crate::core::histogram::{self, HsHistogram, HistogramMethod};
use crate::core::keypoints::{self, match_descriptors, KeypointConfig, KeypointEngine};
use crate::core::metadata;
use crate::core::phash;
use crate::error::{CompareError, OutputError, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Options for `compare_phash`.
#[derive(Debug, Clone)]
pub struct PhashOptions {
    /// Maximum Hamming distance still considered similar.
    pub threshold: u32,
}

impl Default for PhashOptions {
    fn default() -> Self {
        Self {
            threshold: phash::DEFAULT_THRESHOLD,
        }
    }
}

/// Options for `compare_orb`.
#[derive(Debug, Clone)]
pub struct OrbOptions {
    /// Cap on detected keypoints per image; also caps drawn matches.
    pub max_features: usize,
    /// FAST corner threshold.
    pub fast_threshold: u8,
    /// Render and persist a side-by-side match visualization.
    pub save_output: bool,
    /// Directory for rendered visualizations; created if absent.
    pub output_dir: PathBuf,
}

impl Default for OrbOptions {
    fn default() -> Self {
        Self {
            max_features: keypoints::DEFAULT_MAX_FEATURES,
            fast_threshold: keypoints::DEFAULT_FAST_THRESHOLD,
            save_output: false,
            output_dir: PathBuf::from("orb_results"),
        }
    }
}

/// Options for `compare_histograms`.
#[derive(Debug, Clone)]
pub struct HistogramOptions {
    pub method: HistogramMethod,
    pub threshold: f64,
}

impl Default for HistogramOptions {
    fn default() -> Self {
        Self {
            method: HistogramMethod::Correlation,
            threshold: histogram::DEFAULT_THRESHOLD,
        }
    }
}

/// Perceptual-hash comparison record.
///
/// Serialized field names keep the legacy report schema consumed by
/// existing tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhashRecord {
    #[serde(rename = "imagen")]
    pub image: String,
    #[serde(rename = "diferencia")]
    pub difference: u32,
    #[serde(rename = "hash_original")]
    pub reference_hash: String,
    #[serde(rename = "hash_comparada")]
    pub candidate_hash: String,
    #[serde(rename = "fecha_modificacion")]
    pub modified_at: String,
    #[serde(rename = "son_similares")]
    pub similar: bool,
}

/// Keypoint-matching comparison record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeypointRecord {
    #[serde(rename = "imagen")]
    pub image: String,
    #[serde(rename = "coincidencias")]
    pub match_count: usize,
    #[serde(rename = "total_keypoints_original")]
    pub reference_keypoints: usize,
    #[serde(rename = "total_keypoints_comparada")]
    pub candidate_keypoints: usize,
    /// `match_percent` formatted as "NN.NN%".
    #[serde(rename = "porcentaje_coincidencias")]
    pub match_percent_text: String,
    #[serde(skip)]
    pub match_percent: f64,
    #[serde(rename = "fecha_modificacion")]
    pub modified_at: String,
    #[serde(rename = "pathOutput")]
    pub output_path: Option<String>,
}

/// Histogram comparison record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramRecord {
    #[serde(rename = "imagen")]
    pub image: String,
    #[serde(rename = "similitud")]
    pub similarity: f64,
    #[serde(rename = "son_similares")]
    pub similar: bool,
}

/// Any engine's record, so callers can carry mixed results and match
/// exhaustively.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ComparisonRecord {
    Phash(PhashRecord),
    Keypoint(KeypointRecord),
    Histogram(HistogramRecord),
}

/// Compares candidate images against one fixed reference image.
pub struct ImageComparator {
    reference_path: PathBuf,
}

impl ImageComparator {
    pub fn new(reference_path: impl Into<PathBuf>) -> Self {
        Self {
            reference_path: reference_path.into(),
        }
    }

    pub fn reference_path(&self) -> &Path {
        &self.reference_path
    }

    /// Compare by perceptual-hash distance. One record per candidate,
    /// input order preserved.
    pub fn compare_phash(
        &self,
        candidates: &[PathBuf],
        options: &PhashOptions,
    ) -> Result<Vec<PhashRecord>> {
        if options.threshold > phash::SIGNATURE_BITS {
            return Err(CompareError::Config(format!(
                "pHash threshold {} exceeds signature length {}",
                options.threshold,
                phash::SIGNATURE_BITS
            )));
        }

        let reference = decoder::decode_gray(&self.reference_path)?;
        let reference_sig = phash::signature(&reference);
        debug!(hash = %reference_sig, "reference perceptual hash");

        candidates
            .par_iter()
            .map(|path| {
                let candidate = decoder::decode_gray(path)?;
                let candidate_sig = phash::signature(&candidate);
                debug!(candidate = %path.display(), hash = %candidate_sig, "candidate perceptual hash");

                let outcome = phash::hash_distance(&reference_sig, &candidate_sig, options.threshold);

                Ok(PhashRecord {
                    image: path.display().to_string(),
                    difference: outcome.difference,
                    reference_hash: reference_sig.to_hex(),
                    candidate_hash: candidate_sig.to_hex(),
                    modified_at: metadata::modification_timestamp(path)?,
                    similar: outcome.similar,
                })
            })
            .collect()
    }

    /// Compare by keypoint matching. Reference keypoints are extracted
    /// once and reused for every candidate.
    pub fn compare_orb(
        &self,
        candidates: &[PathBuf],
        options: &OrbOptions,
    ) -> Result<Vec<KeypointRecord>> {
        if options.max_features == 0 {
            return Err(CompareError::Config(
                "max_features must be at least 1".to_string(),
            ));
        }

        let engine = KeypointEngine::new(KeypointConfig {
            max_features: options.max_features,
            fast_threshold: options.fast_threshold,
        });

        let reference = decoder::decode_gray(&self.reference_path)?;
        let reference_set = engine.extract(&reference);
        debug!(
            keypoints = reference_set.len(),
            "reference keypoints extracted"
        );

        if options.save_output {
            fs::create_dir_all(&options.output_dir).map_err(|e| OutputError::CreateDir {
                path: options.output_dir.clone(),
                source: e,
            })?;
        }

        candidates
            .iter()
            .map(|path| {
                let candidate = decoder::decode_gray(path)?;
                let candidate_set = engine.extract(&candidate);

                let matches = match_descriptors(&reference_set.descriptors, &candidate_set.descriptors);
                debug!(
                    candidate = %path.display(),
                    keypoints = candidate_set.len(),
                    matches = matches.len(),
                    "candidate matched"
                );

                let output_path = if options.save_output {
                    let canvas = keypoints::render::render_matches(
                        &reference,
                        &candidate,
                        &reference_set.keypoints,
                        &candidate_set.keypoints,
                        &matches,
                        options.max_features,
                    );
                    let written =
                        keypoints::render::save_visualization(&canvas, &options.output_dir, path)?;
                    Some(written.display().to_string())
                } else {
                    None
                };

                let percent =
                    keypoints::match_percent(matches.len(), reference_set.len(), candidate_set.len());

                Ok(KeypointRecord {
                    image: path.display().to_string(),
                    match_count: matches.len(),
                    reference_keypoints: reference_set.len(),
                    candidate_keypoints: candidate_set.len(),
                    match_percent_text: format!("{:.2}%", percent),
                    match_percent: percent,
                    modified_at: metadata::modification_timestamp(path)?,
                    output_path,
                })
            })
            .collect()
    }

    /// Compare by hue/saturation histogram.
    pub fn compare_histograms(
        &self,
        candidates: &[PathBuf],
        options: &HistogramOptions,
    ) -> Result<Vec<HistogramRecord>> {
        if !options.threshold.is_finite() {
            return Err(CompareError::Config(
                "histogram threshold must be finite".to_string(),
            ));
        }

        let reference = decoder::decode_rgb(&self.reference_path)?;
        let reference_hist = HsHistogram::from_rgb(&reference);

        candidates
            .par_iter()
            .map(|path| {
                let candidate = decoder::decode_rgb(path)?;
                let candidate_hist = HsHistogram::from_rgb(&candidate);

                let similarity =
                    histogram::round_similarity(reference_hist.compare(&candidate_hist, options.method));
                debug!(
                    candidate = %path.display(),
                    method = %options.method,
                    similarity,
                    "histograms compared"
                );

                Ok(HistogramRecord {
                    image: path.display().to_string(),
                    similarity,
                    similar: options.method.is_similar(similarity, options.threshold),
                })
            })
            .collect()
    }
}
