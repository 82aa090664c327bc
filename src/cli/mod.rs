//! # CLI Module
//!
//! Command-line interface for the media archiver.
//!
//! ## Usage
//! ```bash
//! # Deduplicate ~/camera-roll into ~/archive, one folder per day
//! media-sort ~/camera-roll ~/archive
//!
//! # Monthly buckets, deleting sources once they are safely archived
//! media-sort ~/camera-roll ~/archive --granularity month --delete-source
//!
//! # Only report which extensions are present
//! media-sort ~/camera-roll ~/archive --no-scan
//! ```

use clap::{Parser, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use media_sorter::core::{ArchiveConfig, ArchiveEngine, BucketGranularity, FileTypeSet};
use media_sorter::Result;
use std::path::PathBuf;

/// Media Sorter - deduplicate photos and videos into a dated archive
#[derive(Parser, Debug)]
#[command(name = "media-sort")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to pull media files from
    source: PathBuf,

    /// Archive directory to deduplicate into
    dest: PathBuf,

    /// Custom extension list, replacing the built-in photo/video set
    #[arg(short, long, num_args = 1..)]
    extensions: Vec<String>,

    /// Add custom extensions to the built-in set instead of replacing it
    #[arg(long, requires = "extensions")]
    add_extensions: bool,

    /// Date-bucket granularity
    #[arg(short, long, default_value = "day")]
    granularity: Granularity,

    /// Report the extension census only; process no files
    #[arg(long)]
    no_scan: bool,

    /// Walk and count candidate files without copying anything
    #[arg(long)]
    no_copy: bool,

    /// Delete source files after a successful copy or a duplicate skip
    #[arg(long)]
    delete_source: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Granularity {
    /// One folder per day (YYYYMMDD)
    Day,
    /// One folder per month (YYYYMM)
    Month,
    /// One folder per year (YYYY)
    Year,
}

impl From<Granularity> for BucketGranularity {
    fn from(granularity: Granularity) -> Self {
        match granularity {
            Granularity::Day => BucketGranularity::Day,
            Granularity::Month => BucketGranularity::Month,
            Granularity::Year => BucketGranularity::Year,
        }
    }
}

impl Cli {
    fn into_config(self) -> ArchiveConfig {
        let types = if self.extensions.is_empty() {
            FileTypeSet::defaults()
        } else if self.add_extensions {
            FileTypeSet::defaults_with(&self.extensions)
        } else {
            FileTypeSet::from_custom(&self.extensions)
        };

        ArchiveConfig {
            source: self.source,
            archive_root: self.dest,
            types,
            granularity: self.granularity.into(),
            delete_source: self.delete_source,
            scan_enabled: !self.no_scan,
            copy_enabled: !self.no_copy,
        }
    }
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let term = Term::stderr();

    term.write_line(&format!(
        "{} {}",
        style("Media Sorter").bold().cyan(),
        style(env!("CARGO_PKG_VERSION")).dim()
    ))
    .ok();

    let config = cli.into_config();
    let mut engine = ArchiveEngine::open(config)?;

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {pos} files {msg}")
            .expect("valid progress template"),
    );

    let summary = engine.run_with_progress(|path| {
        progress.inc(1);
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            progress.set_message(name.to_string());
        }
    })?;
    progress.finish_and_clear();

    if !summary.census.recognized.is_empty() {
        term.write_line(&format!(
            "Recognized extensions present: {}",
            summary
                .census
                .recognized
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        ))
        .ok();
    }
    if !summary.census.other.is_empty() {
        term.write_line(&format!(
            "Other extensions present: {}",
            style(
                summary
                    .census
                    .other
                    .iter()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            )
            .dim()
        ))
        .ok();
    }

    term.write_line(&format!(
        "{} {} considered, {} copied, {} duplicates skipped, {} failed",
        style("Done:").bold().green(),
        summary.total,
        style(summary.copied).green(),
        style(summary.skipped_duplicates).yellow(),
        if summary.failed > 0 {
            style(summary.failed).red()
        } else {
            style(summary.failed).dim()
        },
    ))
    .ok();

    Ok(())
}
