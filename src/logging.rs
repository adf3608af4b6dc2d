use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Installs the fmt subscriber once; `-v` raises this crate's level.
pub fn init(verbosity: u8) {
    INIT.call_once(|| {
        let mut filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        if verbosity > 0 {
            let level = if verbosity == 1 {
                Level::DEBUG
            } else {
                Level::TRACE
            };
            if let Ok(directive) = format!("wifi_qr_generator={level}").parse() {
                filter = filter.add_directive(directive);
            }
        }
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_level(true)
            .init();
    });
}
