//! Logging configuration for the strata node.

use eyre::Result;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Only show errors
    pub quiet: bool,
    /// 0 = info, 1 = debug, 2+ = trace
    pub verbosity: u8,
    /// Extra comma separated filter directives, e.g. `strata_net_transport=trace`
    pub filter: Option<String>,
    pub timestamps: bool,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

/// Build the filter for `config`.
///
/// The filter is built with the following precedence:
/// 1. If `quiet` is set, only errors are shown
/// 2. Otherwise, start with `RUST_LOG` if set, or the level implied by `verbosity`
/// 3. Apply any custom directives from `filter`
pub fn env_filter(config: &LogConfig) -> Result<EnvFilter> {
    if config.quiet {
        return Ok(EnvFilter::new("error"));
    }

    let base_level = match config.verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(base_level));

    if let Some(custom) = &config.filter {
        for directive in custom.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            filter = filter.add_directive(directive.parse()?);
        }
    }

    Ok(filter)
}

/// Install the global tracing subscriber.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let filter = env_filter(config)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match (config.json, config.timestamps) {
        (true, _) => builder.json().try_init(),
        (false, true) => builder.try_init(),
        (false, false) => builder.without_time().try_init(),
    };

    result.map_err(|err| eyre::eyre!("failed to install tracing subscriber: {err}"))
}
