//! # Core Module
//!
//! The comparison engine, independent of any front end.
//!
//! ## Modules
//! - `decoder` - Decodes image files into engine-ready rasters
//! - `phash` - DCT-based perceptual hashing
//! - `keypoints` - FAST/BRIEF-style keypoint detection and matching
//! - `histogram` - Hue/saturation histogram comparison
//! - `metadata` - File timestamps for audit fields
//! - `comparator` - The façade callers talk to

pub mod comparator;
pub mod decoder;
pub mod histogram;
pub mod keypoints;
pub mod metadata;
pub mod phash;

// Re-export commonly used types
pub use comparator::{
    ComparisonRecord, HistogramOptions, HistogramRecord, ImageComparator, KeypointRecord,
    OrbOptions, PhashOptions, PhashRecord,
};
pub use histogram::HistogramMethod;
pub use phash::PerceptualSignature;
