//! Run configuration.
//!
//! Two layers:
//! - [`Configuration`]: the per-run settings (mock mode, word limit, row cap,
//!   API key, model), resolved from a key/value source. In production the
//!   source is the process environment after `.env` has been loaded.
//! - [`Settings`]: optional `config/default.toml` with endpoint, temperature,
//!   timeout, pacing and report title.
//!
//! Both are resolved once in `main` and passed down by reference; nothing
//! below this module reads the environment.

use std::{
    collections::HashMap,
    env, fs,
    path::Path,
    time::Duration,
};

use serde::Deserialize;

use crate::error::AppError;

pub const KEY_MOCK_MODE: &str = "MOCK_MODE";
pub const KEY_WORD_LIMIT: &str = "WORD_LIMIT";
pub const KEY_MAX_ROWS: &str = "MAX_ROWS";
pub const KEY_API_KEY: &str = "OPENAI_API_KEY";
pub const KEY_MODEL: &str = "OPENAI_MODEL";

pub const DEFAULT_MOCK_MODE: bool = true;
pub const DEFAULT_WORD_LIMIT: usize = 75;
pub const DEFAULT_MAX_ROWS: usize = 100;
pub const DEFAULT_MODEL: &str = "gpt-5-mini";

const TRUTHY: [&str; 5] = ["1", "true", "yes", "y", "on"];
const FALSY: [&str; 5] = ["0", "false", "no", "n", "off"];

/// Fully-resolved run configuration. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub mock_mode: bool,
    /// Maximum whitespace-token count of a generated message.
    pub word_limit: usize,
    /// Row cap applied after deduplication.
    pub max_rows: usize,
    /// May be empty; an empty key forces the mock generator.
    pub api_key: String,
    pub model_name: String,
}

/// Settings supplied on the command line. `None` keeps the resolved value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub mock_mode: Option<bool>,
    pub word_limit: Option<usize>,
    pub max_rows: Option<usize>,
    pub api_key: Option<String>,
    pub model_name: Option<String>,
}

impl Configuration {
    /// Returns `true` when this run should use the local template generator.
    pub fn uses_mock(&self) -> bool {
        self.mock_mode || self.api_key.is_empty()
    }

    /// Label shown in reports: `"MOCK"` or `"API"`.
    pub fn mode_label(&self) -> &'static str {
        if self.uses_mock() { "MOCK" } else { "API" }
    }

    /// Build a new configuration with `overrides` applied on top of `self`.
    pub fn with_overrides(&self, overrides: Overrides) -> Self {
        Self {
            mock_mode: overrides.mock_mode.unwrap_or(self.mock_mode),
            word_limit: overrides.word_limit.unwrap_or(self.word_limit),
            max_rows: overrides.max_rows.unwrap_or(self.max_rows),
            api_key: overrides
                .api_key
                .map(|k| k.trim().to_string())
                .unwrap_or_else(|| self.api_key.clone()),
            model_name: overrides.model_name.unwrap_or_else(|| self.model_name.clone()),
        }
    }
}

/// Resolve a [`Configuration`] from a key/value source.
///
/// Malformed integers fail fast with [`AppError::Config`] instead of
/// silently falling back to the default.
pub fn resolve_config(source: &HashMap<String, String>) -> Result<Configuration, AppError> {
    let get = |key: &str| source.get(key).map(String::as_str);

    Ok(Configuration {
        mock_mode: parse_bool(get(KEY_MOCK_MODE), DEFAULT_MOCK_MODE),
        word_limit: parse_usize(KEY_WORD_LIMIT, get(KEY_WORD_LIMIT), DEFAULT_WORD_LIMIT)?,
        max_rows: parse_usize(KEY_MAX_ROWS, get(KEY_MAX_ROWS), DEFAULT_MAX_ROWS)?,
        api_key: get(KEY_API_KEY).map(str::trim).unwrap_or_default().to_string(),
        model_name: get(KEY_MODEL).unwrap_or(DEFAULT_MODEL).to_string(),
    })
}

/// Resolve the run configuration from the process environment.
pub fn load() -> Result<Configuration, AppError> {
    let source: HashMap<String, String> = [KEY_MOCK_MODE, KEY_WORD_LIMIT, KEY_MAX_ROWS, KEY_API_KEY, KEY_MODEL]
        .into_iter()
        .filter_map(|key| env::var(key).ok().map(|v| (key.to_string(), v)))
        .collect();
    resolve_config(&source)
}

/// Interpret a boolean-like setting.
///
/// Truthy and falsy tokens are matched case-insensitively after trimming.
/// Absent or unrecognised values yield `default`.
pub fn parse_bool(value: Option<&str>, default: bool) -> bool {
    let Some(raw) = value else {
        return default;
    };
    let token = raw.trim().to_ascii_lowercase();
    if TRUTHY.contains(&token.as_str()) {
        true
    } else if FALSY.contains(&token.as_str()) {
        false
    } else {
        default
    }
}

fn parse_usize(key: &str, value: Option<&str>, default: usize) -> Result<usize, AppError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .map_err(|e| AppError::Config(format!("{key} must be a non-negative integer, got '{raw}': {e}"))),
    }
}

// ── TOML settings ────────────────────────────────────────────────────────────

/// Remote generator settings (`[llm]`).
#[derive(Debug, Clone)]
pub struct LlmSettings {
    /// Full chat completions endpoint URL.
    pub api_base_url: String,
    /// Sampling temperature (not sent to gpt-5 models).
    pub temperature: f32,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Sleep after each successful remote call.
    pub pacing: Duration,
}

/// Report settings (`[report]`).
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub title: String,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub llm: LlmSettings,
    pub report: ReportSettings,
}

impl Default for LlmSettings {
    fn default() -> Self {
        RawLlm::default().into()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            llm: LlmSettings::default(),
            report: RawReport::default().into(),
        }
    }
}

#[derive(Deserialize, Default)]
struct RawSettings {
    #[serde(default)]
    llm: RawLlm,
    #[serde(default)]
    report: RawReport,
}

#[derive(Deserialize)]
struct RawLlm {
    #[serde(default = "default_api_base_url")]
    api_base_url: String,
    #[serde(default = "default_temperature")]
    temperature: f32,
    #[serde(default = "default_timeout_seconds")]
    timeout_seconds: u64,
    #[serde(default = "default_pacing_ms")]
    pacing_ms: u64,
}

impl Default for RawLlm {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            temperature: default_temperature(),
            timeout_seconds: default_timeout_seconds(),
            pacing_ms: default_pacing_ms(),
        }
    }
}

impl From<RawLlm> for LlmSettings {
    fn from(raw: RawLlm) -> Self {
        Self {
            api_base_url: raw.api_base_url,
            temperature: raw.temperature,
            timeout_seconds: raw.timeout_seconds,
            pacing: Duration::from_millis(raw.pacing_ms),
        }
    }
}

#[derive(Deserialize)]
struct RawReport {
    #[serde(default = "default_report_title")]
    title: String,
}

impl Default for RawReport {
    fn default() -> Self {
        Self { title: default_report_title() }
    }
}

impl From<RawReport> for ReportSettings {
    fn from(raw: RawReport) -> Self {
        Self { title: raw.title }
    }
}

fn default_api_base_url() -> String { "https://api.openai.com/v1/chat/completions".to_string() }
fn default_temperature() -> f32 { 0.6 }
fn default_timeout_seconds() -> u64 { 60 }
fn default_pacing_ms() -> u64 { 200 }
fn default_report_title() -> String { "Outreach Pack".to_string() }

pub const DEFAULT_SETTINGS_PATH: &str = "config/default.toml";

/// Load TOML settings.
///
/// With `explicit = None` the default path is tried and a missing file falls
/// back to built-in defaults. An explicit path must exist.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings, AppError> {
    match explicit {
        Some(path) => load_settings_from(path),
        None => {
            let path = Path::new(DEFAULT_SETTINGS_PATH);
            if path.exists() {
                load_settings_from(path)
            } else {
                tracing::debug!("settings: {} not found, using defaults", path.display());
                Ok(Settings::default())
            }
        }
    }
}

/// Parse settings from an explicit TOML file.
pub fn load_settings_from(path: &Path) -> Result<Settings, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
    let parsed: RawSettings = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;
    Ok(Settings {
        llm: parsed.llm.into(),
        report: parsed.report.into(),
    })
}

// ── test helpers ──────────────────────────────────────────────────────────────

/// Mock-mode configuration for unit tests.
#[cfg(test)]
impl Configuration {
    pub fn test_default() -> Self {
        Self {
            mock_mode: true,
            word_limit: DEFAULT_WORD_LIMIT,
            max_rows: DEFAULT_MAX_ROWS,
            api_key: String::new(),
            model_name: DEFAULT_MODEL.into(),
        }
    }
}
