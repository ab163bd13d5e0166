//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// File configuration for chapter-sync defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Root folder chapters are written under.
    pub data_dir: Option<PathBuf>,
    /// SQLite state file.
    pub db_path: Option<PathBuf>,
    /// Delay before each chapter fetch, in milliseconds.
    pub chapter_delay_ms: Option<u64>,
    /// Delay after each discovery probe, in milliseconds.
    pub probe_delay_ms: Option<u64>,
    /// Exclusive upper bound for discovery.
    pub max_series_id: Option<i64>,
    /// Vendor API host.
    pub api_base_url: Option<String>,
    /// Skip chapters whose publication time is in the future.
    pub skip_future: Option<bool>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
}

/// Largest accepted chapter delay (10 minutes).
pub const MAX_CHAPTER_DELAY_MS: u64 = 600_000;
/// Largest accepted probe delay (1 minute).
pub const MAX_PROBE_DELAY_MS: u64 = 60_000;
/// Largest accepted discovery ceiling.
pub const MAX_SERIES_ID_LIMIT: i64 = 1_000_000;

impl FileConfig {
    /// Validates config values against runtime and CLI constraints.
    pub fn validate(&self) -> Result<()> {
        if let Some(delay) = self.chapter_delay_ms
            && delay > MAX_CHAPTER_DELAY_MS
        {
            bail!(
                "Invalid config value for `chapter_delay_ms`: {delay}. Expected range: 0..={MAX_CHAPTER_DELAY_MS}"
            );
        }

        if let Some(delay) = self.probe_delay_ms
            && delay > MAX_PROBE_DELAY_MS
        {
            bail!(
                "Invalid config value for `probe_delay_ms`: {delay}. Expected range: 0..={MAX_PROBE_DELAY_MS}"
            );
        }

        if let Some(ceiling) = self.max_series_id
            && !(2..=MAX_SERIES_ID_LIMIT).contains(&ceiling)
        {
            bail!(
                "Invalid config value for `max_series_id`: {ceiling}. Expected range: 2..={MAX_SERIES_ID_LIMIT}"
            );
        }

        if let Some(base_url) = self.api_base_url.as_deref() {
            url::Url::parse(base_url).with_context(|| {
                format!("Invalid config value for `api_base_url`: '{base_url}'")
            })?;
        }

        Ok(())
    }
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Returns the stable string label for display output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Verbose => "verbose",
            Self::Quiet => "quiet",
            Self::Debug => "debug",
        }
    }

    /// Tracing filter level for this setting.
    #[must_use]
    pub fn log_level(self) -> &'static str {
        match self {
            Self::Default => "info",
            Self::Verbose => "debug",
            Self::Quiet => "error",
            Self::Debug => "trace",
        }
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/chapter-sync/config.toml`
/// 2. `$HOME/.config/chapter-sync/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("chapter-sync")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("chapter-sync")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from `explicit` when given, otherwise from the default path
/// if a file exists there.
///
/// An explicit path that does not exist is an error; a missing default file
/// is not.
pub fn load_file_config_from(explicit: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        let config = load_file_config(path)?;
        return Ok(LoadedConfig {
            path: Some(path.to_path_buf()),
            config: Some(config),
        });
    }

    let path = resolve_default_config_path();
    let Some(path_ref) = path.as_deref() else {
        return Ok(LoadedConfig { path, config: None });
    };

    if !path_ref.exists() {
        return Ok(LoadedConfig { path, config: None });
    }

    let config = load_file_config(path_ref)?;
    Ok(LoadedConfig {
        path,
        config: Some(config),
    })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let invalid = || format!("Invalid `{key}` value on line {line_no}");

        match key {
            "data_dir" => {
                cfg.data_dir = Some(PathBuf::from(
                    parse_string_literal(value).with_context(invalid)?,
                ));
            }
            "db_path" => {
                cfg.db_path = Some(PathBuf::from(
                    parse_string_literal(value).with_context(invalid)?,
                ));
            }
            "chapter_delay_ms" => {
                cfg.chapter_delay_ms = Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "probe_delay_ms" => {
                cfg.probe_delay_ms = Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "max_series_id" => {
                let parsed = parse_integer_u64(value).with_context(invalid)?;
                let ceiling = i64::try_from(parsed)
                    .map_err(|_| anyhow::anyhow!("max_series_id out of range for i64"))?;
                cfg.max_series_id = Some(ceiling);
            }
            "api_base_url" => {
                cfg.api_base_url = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "skip_future" => {
                cfg.skip_future = Some(parse_boolean(value).with_context(invalid)?);
            }
            "verbosity" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!("Invalid `verbosity` value '{parsed}' on line {line_no}")
                })?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        _ => bail!("Expected one of: default, verbose, quiet, debug"),
    }
}

fn parse_boolean(raw_value: &str) -> Result<bool> {
    match raw_value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => bail!("Expected 'true' or 'false'"),
    }
}
