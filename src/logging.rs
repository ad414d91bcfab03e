use tracing_subscriber::EnvFilter;

/// Installs the diagnostic subscriber for the binary.
///
/// Library code logs through the `log` facade; the fmt subscriber picks
/// those records up as well. `RUST_LOG` overrides the default filter.
pub fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "game_save_backup=debug"
    } else {
        "game_save_backup=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();

    if let Err(e) = result {
        eprintln!("Failed to initialize logging: {}", e);
    }
}
