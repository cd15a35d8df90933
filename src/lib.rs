//! # Image Comparator
//!
//! Decides whether raster images are the same, similar or different
//! using three independent metrics:
//! - **Perceptual hash** - DCT-based binary signature, Hamming distance
//! - **Keypoint matching** - oriented FAST corners with binary
//!   descriptors, brute-force matched with cross-check
//! - **Color histogram** - hue/saturation distribution compared with a
//!   statistical metric
//!
//! ## Architecture
//! The library is split into a core engine (GUI-agnostic) and a
//! presentation layer:
//! - `core` - decoding, the three engines and the comparator façade
//! - `error` - error types with path context
//! - `cli` lives in the binary
//!
//! ## Example
//! ```rust,ignore
//! use image_comparator::core::{ImageComparator, PhashOptions};
//!
//! let comparator = ImageComparator::new("original.webp");
//! let records = comparator.compare_phash(&candidates, &PhashOptions::default())?;
//! ```

pub mod core;
pub mod error;

// Re-export commonly used types at the crate root
pub use error::{CompareError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point, never by the
/// library itself.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
