//! # img-compare CLI
//!
//! Command-line interface for the image comparator.
//!
//! ## Usage
//! ```bash
//! img-compare phash original.webp test1.png test2.png --threshold 10
//! img-compare orb original.webp test1.png --save-output --out-dir results
//! img-compare histogram original.webp test1.png --method correlation
//! ```

mod cli;

use image_comparator::Result;

fn main() -> Result<()> {
    image_comparator::init_tracing();
    cli::run()
}
