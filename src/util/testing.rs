use std::env;
use std::sync::Once;
use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

static TEST_SETUP: Once = Once::new();
static CONFIG_ENV: Once = Once::new();

/// Install a global tracing subscriber for tests, once per process.
///
/// Honors `RUST_LOG`; defaults to `debug` for this crate.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        setup_test_logging();
        info!("Test Setup complete");
    });
}

/// Hide the developer's own configuration from tests, once per process.
///
/// Points `XDG_CONFIG_HOME` at a directory that does not exist, so no global
/// config file is found, and clears every `TIMBERYARD_*` variable.
pub fn isolate_config_env() {
    CONFIG_ENV.call_once(|| {
        let empty = env::temp_dir().join(format!("timberyard-no-config-{}", std::process::id()));
        env::set_var("XDG_CONFIG_HOME", &empty);
        for (key, _) in env::vars() {
            if key.starts_with("TIMBERYARD_") {
                env::remove_var(key);
            }
        }
        debug!("isolate_config_env: XDG_CONFIG_HOME={}", empty.display());
    });
}

fn setup_test_logging() {
    let env_filter = env::var("RUST_LOG")
        .ok()
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| EnvFilter::new("timberyard=debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}
