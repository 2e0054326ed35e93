//! Logging - tracing subscriber on stderr
//!
//! `RUST_LOG` filters (default `info`). `BEELAUNCH_LOG_JSON=1` switches to JSON
//! lines for log shippers; anything else stays human-readable.

use crate::core::paths::env;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn from_env() -> Self { Self::parse(std::env::var(env::LOG_JSON).ok().as_deref()) }

    fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("1") | Some("true") => Self::Json,
            _ => Self::Pretty,
        }
    }
}

pub fn init_logging() {
    init_logging_with(LogFormat::from_env(), "info");
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging_with(format: LogFormat, default_directive: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let builder = fmt::Subscriber::builder().with_env_filter(env_filter).with_writer(std::io::stderr);

    let _ = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
}
