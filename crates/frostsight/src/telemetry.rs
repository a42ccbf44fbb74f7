use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Logs go to stderr so tables and SVG on stdout stay pipeable.
pub fn init_cli_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("frostsight=debug,frostsight_client=debug")
    } else {
        EnvFilter::from_default_env()
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .compact()
        .try_init();
}
