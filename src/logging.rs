use tracing::Level;

/// Installs the stdout subscriber shared by both binaries.
pub fn init(verbose: bool) {
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();
}
