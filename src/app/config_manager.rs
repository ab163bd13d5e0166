//! Configuration lifecycle: merge CLI flags over file config, resolve defaults.

use std::path::PathBuf;
use std::time::Duration;

use chapter_sync_core::DEFAULT_API_BASE_URL;
use chapter_sync_core::download::{DEFAULT_CHAPTER_DELAY, DEFAULT_PROBE_DELAY};
use chapter_sync_core::sync::DEFAULT_MAX_SERIES_ID;

use crate::app_config::FileConfig;
use crate::cli::Args;

/// Default SQLite state file.
pub(crate) const DEFAULT_DB_PATH: &str = "./chapters.db";

/// Default chapter folder root.
pub(crate) const DEFAULT_DATA_DIR: &str = "./data";

/// Settings after CLI and file config are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedSettings {
    pub(crate) data_dir: PathBuf,
    pub(crate) db_path: PathBuf,
    pub(crate) chapter_delay: Duration,
    pub(crate) probe_delay: Duration,
    pub(crate) max_series_id: i64,
    pub(crate) api_base_url: String,
    pub(crate) skip_future: bool,
}

/// Merges explicit CLI values over file values over built-in defaults.
pub(crate) fn resolve_settings(args: &Args, file: Option<&FileConfig>) -> ResolvedSettings {
    let file = file.cloned().unwrap_or_default();

    ResolvedSettings {
        data_dir: args
            .data_dir
            .clone()
            .or(file.data_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
        db_path: args
            .db_path
            .clone()
            .or(file.db_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
        chapter_delay: args
            .chapter_delay_ms
            .or(file.chapter_delay_ms)
            .map_or(DEFAULT_CHAPTER_DELAY, Duration::from_millis),
        probe_delay: args
            .probe_delay_ms
            .or(file.probe_delay_ms)
            .map_or(DEFAULT_PROBE_DELAY, Duration::from_millis),
        max_series_id: args
            .max_series_id
            .or(file.max_series_id)
            .unwrap_or(DEFAULT_MAX_SERIES_ID),
        api_base_url: file
            .api_base_url
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        skip_future: args.skip_future || file.skip_future.unwrap_or(false),
    }
}

/// Log level used when `RUST_LOG` is unset.
///
/// Priority: `-q` > `-v`/`-vv` > config `verbosity` > `info`.
pub(crate) fn resolve_default_log_level(args: &Args, file: Option<&FileConfig>) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbose {
        0 => file
            .and_then(|cfg| cfg.verbosity)
            .map_or("info", |verbosity| verbosity.log_level()),
        1 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::app_config::VerbositySetting;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["chapter-sync"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_without_file() {
        let settings = resolve_settings(&args(&[]), None);
        assert_eq!(settings.data_dir, PathBuf::from("./data"));
        assert_eq!(settings.db_path, PathBuf::from("./chapters.db"));
        assert_eq!(settings.chapter_delay, Duration::from_secs(5));
        assert_eq!(settings.probe_delay, Duration::from_secs(1));
        assert_eq!(settings.max_series_id, 1000);
        assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
        assert!(!settings.skip_future);
    }

    #[test]
    fn test_file_values_fill_gaps_and_cli_wins() {
        let file = FileConfig {
            data_dir: Some(PathBuf::from("/file/data")),
            chapter_delay_ms: Some(7000),
            max_series_id: Some(1200),
            skip_future: Some(true),
            ..FileConfig::default()
        };

        let settings = resolve_settings(
            &args(&["--data-dir", "/cli/data", "--max-series-id", "50"]),
            Some(&file),
        );

        assert_eq!(settings.data_dir, PathBuf::from("/cli/data"));
        assert_eq!(settings.chapter_delay, Duration::from_millis(7000));
        assert_eq!(settings.max_series_id, 50);
        assert!(settings.skip_future);
    }

    #[test]
    fn test_log_level_priority() {
        let file = FileConfig {
            verbosity: Some(VerbositySetting::Verbose),
            ..FileConfig::default()
        };
        assert_eq!(resolve_default_log_level(&args(&[]), None), "info");
        assert_eq!(resolve_default_log_level(&args(&[]), Some(&file)), "debug");
        assert_eq!(resolve_default_log_level(&args(&["-vv"]), Some(&file)), "trace");
        assert_eq!(resolve_default_log_level(&args(&["-q", "-v"]), Some(&file)), "error");
    }
}
