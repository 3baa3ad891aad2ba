use cellar_core::CELLAR_LOG_VAR;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_DIRECTIVE: &str = "info";

/// Initialize the tracing system
///
/// The filter comes from `CELLAR_LOG`, then `RUST_LOG`, then defaults to
/// `info`. Events are written compactly to stderr so they never mix with
/// command output on stdout.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter = filter_from_env(std::env::var(CELLAR_LOG_VAR).ok(), std::env::var("RUST_LOG").ok());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(is_tty())
        .compact()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Pick the first directive that parses, falling back to `info`
fn filter_from_env(cellar_log: Option<String>, rust_log: Option<String>) -> EnvFilter {
    [cellar_log, rust_log]
        .into_iter()
        .flatten()
        .filter(|directive| !directive.trim().is_empty())
        .find_map(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Check if we're running in a TTY environment
fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}
