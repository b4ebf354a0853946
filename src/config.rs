use anyhow::{Result, anyhow};
use chrono_tz::Tz;
use std::env;
use std::path::PathBuf;

use crate::dayone::paginate::DEFAULT_PAGE_SIZE;
use crate::dayone::types::LocationBlock;
use crate::error::ExportError;

pub const DEFAULT_JOURNAL_NAME: &str = "From Daylio";
pub const DEFAULT_EXPORT_DIR: &str = "./exports";
pub const MAX_ENTRIES_PER_EXPORT: usize = 99;
pub const DEFAULT_TIMEZONE: &str = "UTC";

#[derive(Debug, Clone, PartialEq)]
pub struct QuirkConfig {
    pub alone_time_scoring: bool,
    pub auto_home_location: bool,
    pub home_address: Option<LocationBlock>,
}

impl Default for QuirkConfig {
    fn default() -> Self {
        Self {
            alone_time_scoring: true,
            auto_home_location: true,
            home_address: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransformConfig {
    pub quirks: QuirkConfig,
    pub timezone: String,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            quirks: QuirkConfig::default(),
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    pub export_dir: PathBuf,
    pub journal_name: String,
    pub page_size: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            journal_name: DEFAULT_JOURNAL_NAME.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Snapshot of the environment switches, taken once at job start. `LOG_LEVEL`
/// is read earlier by [`crate::logging::init`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportConfig {
    pub transform: TransformConfig,
    pub output: OutputConfig,
    pub stable_ids: bool,
}

pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;
}

pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

impl<F> EnvSource for F
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        self(key)
    }
}

fn env_non_empty(src: &impl EnvSource, var: &str) -> Option<String> {
    src.get(var)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// Switches count as set for any non-empty value, including "0" and "false".
fn env_flag(src: &impl EnvSource, var: &str) -> bool {
    env_non_empty(src, var).is_some()
}

fn env_or_string(src: &impl EnvSource, var: &str, fallback: &str) -> String {
    env_non_empty(src, var).unwrap_or_else(|| fallback.to_string())
}

fn env_or_usize(src: &impl EnvSource, var: &str, fallback: usize) -> Result<usize> {
    match env_non_empty(src, var) {
        Some(v) => v
            .parse::<usize>()
            .map_err(|err| anyhow!("invalid {var} `{v}`: {err}")),
        None => Ok(fallback),
    }
}

fn parse_home_address(raw: &str) -> Result<LocationBlock> {
    serde_json::from_str(raw).map_err(|err| ExportError::InvalidHomeAddress(err.to_string()).into())
}

fn system_timezone() -> Option<String> {
    match iana_time_zone::get_timezone() {
        Ok(name) => Some(name),
        Err(err) => {
            tracing::debug!(error = %err, "could not detect the system timezone");
            None
        }
    }
}

// Unset TZ means the machine's zone; UTC only when that cannot be detected.
fn resolve_timezone(raw: Option<String>, system: impl FnOnce() -> Option<String>) -> String {
    let Some(name) = raw.or_else(system) else {
        return DEFAULT_TIMEZONE.to_string();
    };
    match name.parse::<Tz>() {
        Ok(tz) => tz.name().to_string(),
        Err(_) => {
            tracing::warn!(timezone = %name, "TZ is not a known IANA timezone, passing it through");
            name
        }
    }
}

fn validate(cfg: &ExportConfig) -> Result<()> {
    let size = cfg.output.page_size;
    if size == 0 || size > MAX_ENTRIES_PER_EXPORT {
        return Err(ExportError::InvalidPageSize(size, MAX_ENTRIES_PER_EXPORT).into());
    }
    if cfg.output.journal_name.contains(['/', '\\']) {
        return Err(anyhow!(
            "invalid DAYONE_JOURNAL_NAME: cannot contain path separators"
        ));
    }
    Ok(())
}

pub fn load_from(src: &impl EnvSource) -> Result<ExportConfig> {
    let mut cfg = ExportConfig::default();

    cfg.transform.quirks.alone_time_scoring = !env_flag(src, "NO_ALONE_TIME_SCORING");
    cfg.transform.quirks.auto_home_location = !env_flag(src, "NO_AUTO_HOME_LOCATION");
    cfg.transform.quirks.home_address = env_non_empty(src, "HOME_ADDRESS_JSON")
        .map(|raw| parse_home_address(&raw))
        .transpose()?;
    cfg.transform.timezone = resolve_timezone(env_non_empty(src, "TZ"), system_timezone);

    cfg.output.export_dir = PathBuf::from(env_or_string(
        src,
        "DAYLIO_EXPORT_DIR",
        &cfg.output.export_dir.display().to_string(),
    ));
    cfg.output.journal_name = env_or_string(src, "DAYONE_JOURNAL_NAME", &cfg.output.journal_name);
    cfg.output.page_size = env_or_usize(src, "DAYONE_PAGE_SIZE", cfg.output.page_size)?;

    cfg.stable_ids = env_flag(src, "DAYONE_STABLE_IDS");

    validate(&cfg)?;
    Ok(cfg)
}

pub fn load_config() -> Result<ExportConfig> {
    load_from(&ProcessEnv)
}
