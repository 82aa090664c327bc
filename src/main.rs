//! # media-sort CLI
//!
//! Command-line interface for the media archiver.
//!
//! ## Usage
//! ```bash
//! media-sort ~/camera-roll ~/archive --granularity month
//! media-sort ~/camera-roll ~/archive --no-copy
//! ```

mod cli;

use media_sorter::Result;

fn main() -> Result<()> {
    media_sorter::init_tracing();
    cli::run()
}
