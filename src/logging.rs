use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter when RUST_LOG is unset
pub const DEFAULT_DIRECTIVE: &str = "ledger_tidy=info";

/// Initializes console logging on stderr so stdout stays clean for reports and JSON.
///
/// `RUST_LOG` wins when set; `verbose` raises the crate's own level to debug.
pub fn init_logging(verbose: bool) {
    let directive = if verbose { "ledger_tidy=debug" } else { DEFAULT_DIRECTIVE };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let console_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init();
}
