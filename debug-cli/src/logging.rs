use error_common::{DebuggerError, Result};
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Default filter when `RUST_LOG` is unset
pub fn default_filter(verbose: bool) -> String {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    format!("zanzibar_debug={level},debug_cli={level},reqwest=warn,hyper=warn")
}

/// Initialise tracing on stderr so stdout only carries the graph.
///
/// Human-readable output with RFC 3339 timestamps by default, JSON lines when
/// `json` is set. Colours only when stderr is a terminal and `NO_COLOR` is
/// unset.
pub fn init_tracing(verbose: bool, json: bool) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let result = if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .json(),
            )
            .try_init()
    } else {
        let use_colors = std::env::var("NO_COLOR").is_err() && atty::is(atty::Stream::Stderr);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(use_colors)
                    .with_level(true),
            )
            .try_init()
    };

    result.map_err(|e| DebuggerError::Other(anyhow::anyhow!("failed to initialise tracing: {}", e)))
}
