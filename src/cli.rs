//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Keep a local archive of followed comic series in sync with the vendor.
///
/// Each run optionally discovers new series ids, adds ids to the watch list,
/// then downloads every free, published chapter of the watched series that
/// is not already on disk.
#[derive(Parser, Debug)]
#[command(name = "chapter-sync")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Probe the vendor for series ids and refresh the known-series table
    #[arg(long, alias = "generate-listing")]
    pub discover: bool,

    /// Add series ids to the watch list (comma separated or repeated)
    #[arg(short = 'w', long = "watch", alias = "to-watch", value_name = "IDS", value_delimiter = ',', num_args = 1..)]
    pub watch: Vec<i64>,

    /// Fetch every chapter again, ignoring the ledger, prices and publish flags
    #[arg(short, long)]
    pub force: bool,

    /// Only sync these series ids (comma separated or repeated)
    #[arg(short = 'u', long = "update", alias = "update-list", value_name = "IDS", value_delimiter = ',', num_args = 1..)]
    pub update: Vec<i64>,

    /// Print the watch list with downloaded chapter counts and exit
    #[arg(long)]
    pub list: bool,

    /// Config file (default: $XDG_CONFIG_HOME/chapter-sync/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// SQLite state file (default: ./chapters.db)
    #[arg(long = "db", value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Folder chapters are written under (default: ./data)
    #[arg(long, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Delay before each chapter fetch in milliseconds (max 600000)
    #[arg(long, value_parser = clap::value_parser!(u64).range(0..=600_000))]
    pub chapter_delay_ms: Option<u64>,

    /// Delay after each discovery probe in milliseconds (max 60000)
    #[arg(long, value_parser = clap::value_parser!(u64).range(0..=60_000))]
    pub probe_delay_ms: Option<u64>,

    /// Discovery stops before this series id
    #[arg(long, value_parser = clap::value_parser!(i64).range(2..=1_000_000))]
    pub max_series_id: Option<i64>,

    /// Skip chapters whose publication time is still in the future
    #[arg(long)]
    pub skip_future: bool,
}
