//! Logging initialisation via tracing-subscriber.
//!
//! Call [`init`] once at startup. Output goes to stderr so stdout stays
//! free for previews and model listings.

use std::env;

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Initialise the global tracing subscriber.
///
/// `level` is any `EnvFilter` directive string (`debug`,
/// `outreach_pack=trace,reqwest=warn`, ...). See [`build_filter`] for how it
/// combines with `RUST_LOG`.
pub fn init(level: &str, prefer_level: bool) -> Result<(), AppError> {
    let rust_log = env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(level, prefer_level, rust_log.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| AppError::Logger(format!("failed to set subscriber: {e}")))
}

/// Pick the filter from the requested `level` and the `RUST_LOG` value.
///
/// With `prefer_level` (an explicit `--log-level` or `OUTREACH_LOG_LEVEL`),
/// `level` wins and `rust_log` only stands in for an unparsable `level`.
/// Otherwise `rust_log` wins and `level` is the fallback.
pub fn build_filter(level: &str, prefer_level: bool, rust_log: Option<&str>) -> Result<EnvFilter, AppError> {
    let (first, second) = if prefer_level { (Some(level), rust_log) } else { (rust_log, Some(level)) };

    let first_err = match first.map(EnvFilter::try_new) {
        Some(Ok(filter)) => return Ok(filter),
        Some(Err(e)) => Some(e),
        None => None,
    };
    match second.map(EnvFilter::try_new) {
        Some(Ok(filter)) => Ok(filter),
        Some(Err(e)) => Err(AppError::Logger(match first_err {
            Some(first_err) => format!("invalid log filter: {first_err}; fallback also invalid: {e}"),
            None => format!("invalid log filter '{level}': {e}"),
        })),
        None => Err(AppError::Logger(match first_err {
            Some(e) => format!("invalid log filter '{level}': {e}"),
            None => "no log filter given".to_string(),
        })),
    }
}
