use std::fmt::Display;
use std::str::FromStr;
use std::time::Instant;

use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use crate::errors::BotError;

const DEFAULT_LEVEL: &str = "info";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(BotError::Config(format!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                other
            ))),
        }
    }
}

/// Install the global subscriber. Logs go to stderr; a second call is a no-op.
///
/// `level` is an `EnvFilter` directive such as `debug` or `pr_bot=trace`;
/// an unparseable value falls back to `info`.
pub fn init(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

/// Run one step, logging how long it took and whether it failed
pub fn timed<T, E, F>(operation: &str, step: F) -> Result<T, E>
where
    E: Display,
    F: FnOnce() -> Result<T, E>,
{
    let start = Instant::now();
    let result = step();
    let duration_ms = start.elapsed().as_millis() as u64;

    match &result {
        Ok(_) => debug!(operation, duration_ms, "Operation completed"),
        Err(e) => error!(operation, duration_ms, error = %e, "Operation failed"),
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("TEXT".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init("debug", LogFormat::Text);
        init("not a [valid filter", LogFormat::Json);
    }

    #[test]
    fn test_timed_passes_result_through() {
        let ok: Result<u32, String> = timed("add", || Ok(2 + 2));
        assert_eq!(ok, Ok(4));

        let err: Result<u32, String> = timed("fail", || Err("boom".to_string()));
        assert_eq!(err, Err("boom".to_string()));
    }
}
