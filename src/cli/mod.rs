//! # CLI Module
//!
//! Command-line interface for the image comparator.
//!
//! ## Usage
//! ```bash
//! # Perceptual-hash comparison
//! img-compare phash original.webp test1.png test2.png
//!
//! # Keypoint matching with rendered output
//! img-compare orb original.webp test1.png --save-output --out-dir results
//!
//! # Histogram comparison, JSON output
//! img-compare histogram original.webp test1.png --output json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use image_comparator::core::{
    HistogramMethod, HistogramOptions, HistogramRecord, ImageComparator, KeypointRecord,
    OrbOptions, PhashOptions, PhashRecord,
};
use image_comparator::error::{CompareError, Result};
use indicatif::ProgressBar;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Image Comparator - same, similar or different?
#[derive(Parser, Debug)]
#[command(name = "img-compare")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare by perceptual-hash distance
    Phash {
        /// Reference image every candidate is compared against
        reference: PathBuf,

        /// Candidate images, compared in the given order
        #[arg(required = true)]
        candidates: Vec<PathBuf>,

        /// Maximum Hamming distance still considered similar
        #[arg(short, long, default_value = "10")]
        threshold: u32,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },

    /// Compare by keypoint matching (oriented FAST + binary descriptors)
    Orb {
        /// Reference image every candidate is compared against
        reference: PathBuf,

        /// Candidate images, compared in the given order
        #[arg(required = true)]
        candidates: Vec<PathBuf>,

        /// Cap on detected keypoints per image
        #[arg(long, default_value = "10000")]
        max_features: usize,

        /// FAST corner threshold (lower finds more corners)
        #[arg(long, default_value = "20")]
        fast_threshold: u8,

        /// Render side-by-side match visualizations
        #[arg(long)]
        save_output: bool,

        /// Directory for rendered visualizations
        #[arg(long, default_value = "orb_results")]
        out_dir: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },

    /// Compare by hue/saturation histogram
    Histogram {
        /// Reference image every candidate is compared against
        reference: PathBuf,

        /// Candidate images, compared in the given order
        #[arg(required = true)]
        candidates: Vec<PathBuf>,

        /// Comparison metric
        #[arg(short, long, default_value = "correlation")]
        method: Method,

        /// Similarity threshold (direction depends on the metric)
        #[arg(short, long, default_value = "0.8")]
        threshold: f64,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Method {
    /// Pearson correlation; higher is more similar
    Correlation,
    /// Chi-square distance; lower is more similar
    ChiSquare,
    /// Bin-wise overlap; higher is more similar
    Intersection,
    /// Bhattacharyya distance; lower is more similar
    Bhattacharyya,
}

impl From<Method> for HistogramMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Correlation => HistogramMethod::Correlation,
            Method::ChiSquare => HistogramMethod::ChiSquare,
            Method::Intersection => HistogramMethod::Intersection,
            Method::Bhattacharyya => HistogramMethod::Bhattacharyya,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Phash {
            reference,
            candidates,
            threshold,
            output,
        } => {
            let comparator = ImageComparator::new(reference);
            let records = comparator.compare_phash(&candidates, &PhashOptions { threshold })?;
            match output {
                OutputFormat::Json => print_json(&records)?,
                OutputFormat::Pretty => print_phash(&records, threshold),
            }
        }
        Commands::Orb {
            reference,
            candidates,
            max_features,
            fast_threshold,
            save_output,
            out_dir,
            output,
        } => {
            let comparator = ImageComparator::new(reference);
            let options = OrbOptions {
                max_features,
                fast_threshold,
                save_output,
                output_dir: out_dir,
            };

            // Keypoint extraction dominates the runtime; show a spinner
            // so a large batch does not look hung.
            let spinner = ProgressBar::new_spinner().with_message("matching keypoints...");
            spinner.enable_steady_tick(Duration::from_millis(100));
            let records = comparator.compare_orb(&candidates, &options);
            spinner.finish_and_clear();
            let records = records?;

            match output {
                OutputFormat::Json => print_json(&records)?,
                OutputFormat::Pretty => print_orb(&records),
            }
        }
        Commands::Histogram {
            reference,
            candidates,
            method,
            threshold,
            output,
        } => {
            let comparator = ImageComparator::new(reference);
            let options = HistogramOptions {
                method: method.into(),
                threshold,
            };
            let records = comparator.compare_histograms(&candidates, &options)?;
            match output {
                OutputFormat::Json => print_json(&records)?,
                OutputFormat::Pretty => print_histogram(&records),
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(records: &[T]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)
        .map_err(|e| CompareError::Config(format!("failed to serialize results: {e}")))?;
    println!("{json}");
    Ok(())
}

fn verdict(similar: bool) -> console::StyledObject<&'static str> {
    if similar {
        style("similar").green().bold()
    } else {
        style("different").red().bold()
    }
}

fn print_phash(records: &[PhashRecord], threshold: u32) {
    let term = Term::stdout();
    term.write_line(&format!(
        "{} (threshold {})",
        style("Perceptual hash comparison").bold().cyan(),
        threshold
    ))
    .ok();

    for record in records {
        term.write_line(&format!(
            "  {} distance {:>2}  [{} vs {}]  modified {}  -> {}",
            style(&record.image).bold(),
            record.difference,
            record.reference_hash,
            record.candidate_hash,
            style(&record.modified_at).dim(),
            verdict(record.similar),
        ))
        .ok();
    }
}

fn print_orb(records: &[KeypointRecord]) {
    let term = Term::stdout();
    term.write_line(&format!("{}", style("Keypoint comparison").bold().cyan()))
        .ok();

    for record in records {
        let mut line = format!(
            "  {} {} matches ({} of {}x{} keypoints)  modified {}",
            style(&record.image).bold(),
            record.match_count,
            record.match_percent_text,
            record.reference_keypoints,
            record.candidate_keypoints,
            style(&record.modified_at).dim(),
        );
        if let Some(path) = &record.output_path {
            line.push_str(&format!("  saved {}", style(path).underlined()));
        }
        term.write_line(&line).ok();
    }
}

fn print_histogram(records: &[HistogramRecord]) {
    let term = Term::stdout();
    term.write_line(&format!("{}", style("Histogram comparison").bold().cyan()))
        .ok();

    for record in records {
        term.write_line(&format!(
            "  {} similarity {:.4}  -> {}",
            style(&record.image).bold(),
            record.similarity,
            verdict(record.similar),
        ))
        .ok();
    }
}
