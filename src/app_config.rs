//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use covers_core::MAX_CONCURRENCY;

const APP_CONFIG_DIR: &str = "covers";
const CONFIG_FILE_NAME: &str = "config.toml";

/// TOML-style file configuration for scraper defaults.
#[derive(Debug, Clone, Default)]
pub struct FileConfig {
    /// Listing page to scrape.
    pub listing_url: Option<String>,
    /// Origin used to absolutize and canonicalize links.
    pub base_url: Option<String>,
    /// Directory images are saved into.
    pub output_dir: Option<PathBuf>,
    /// Location of the URL manifest.
    pub manifest_path: Option<PathBuf>,
    /// Default concurrency (same range as CLI).
    pub concurrency: Option<u8>,
    /// HTTP connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// Whole-request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// User-Agent override.
    pub user_agent: Option<String>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
}

impl FileConfig {
    /// Validates config values against runtime and CLI constraints.
    pub fn validate(&self) -> Result<()> {
        if let Some(concurrency) = self.concurrency
            && !(1..=MAX_CONCURRENCY).contains(&usize::from(concurrency))
        {
            bail!(
                "Invalid config value for `concurrency`: {concurrency}. Expected range: 1..={MAX_CONCURRENCY}"
            );
        }
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("timeout_secs", self.timeout_secs)?;
        validate_http_url("listing_url", self.listing_url.as_deref())?;
        validate_http_url("base_url", self.base_url.as_deref())?;
        if let Some(user_agent) = &self.user_agent
            && user_agent.trim().is_empty()
        {
            bail!("Invalid config value for `user_agent`: must not be empty");
        }
        Ok(())
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

fn validate_http_url(field: &str, value: Option<&str>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    let parsed = url::Url::parse(value)
        .with_context(|| format!("Invalid config value for `{field}`: '{value}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        bail!("Invalid config value for `{field}`: '{value}'. Expected an http(s) URL");
    }
    Ok(())
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
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
/// 1. `$XDG_CONFIG_HOME/covers/config.toml`
/// 2. `$HOME/.config/covers/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join(APP_CONFIG_DIR)
                .join(CONFIG_FILE_NAME),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(APP_CONFIG_DIR)
            .join(CONFIG_FILE_NAME),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from default path if present.
pub fn load_default_file_config() -> Result<LoadedConfig> {
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
        let line_number = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_number}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let invalid = || format!("Invalid `{key}` value on line {line_number}");

        match key {
            "listing_url" => {
                cfg.listing_url = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "base_url" => {
                cfg.base_url = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "output_dir" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                cfg.output_dir = Some(PathBuf::from(parsed));
            }
            "manifest_path" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                cfg.manifest_path = Some(PathBuf::from(parsed));
            }
            "concurrency" => {
                cfg.concurrency = Some(parse_unsigned(value).with_context(invalid)?);
            }
            "connect_timeout_secs" => {
                cfg.connect_timeout_secs = Some(parse_unsigned(value).with_context(invalid)?);
            }
            "timeout_secs" => {
                cfg.timeout_secs = Some(parse_unsigned(value).with_context(invalid)?);
            }
            "user_agent" => {
                cfg.user_agent = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "verbosity" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!("Invalid `verbosity` value '{parsed}' on line {line_number}")
                })?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_number}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Drops a `#` comment unless the `#` sits inside a quoted string.
fn strip_inline_comment(line: &str) -> &str {
    let mut quoted = false;
    let cut = line.char_indices().find(|&(_, ch)| {
        if ch == '"' {
            quoted = !quoted;
        }
        ch == '#' && !quoted
    });
    cut.map_or(line, |(index, _)| &line[..index])
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    raw_value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .map(ToString::to_string)
        .ok_or_else(|| anyhow!("Expected double-quoted string"))
}

fn parse_unsigned<T: TryFrom<u64>>(raw_value: &str) -> Result<T> {
    let value: u64 = raw_value
        .parse()
        .with_context(|| format!("Expected non-negative integer, got '{raw_value}'"))?;
    T::try_from(value).map_err(|_| anyhow!("Integer {value} is out of range"))
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
