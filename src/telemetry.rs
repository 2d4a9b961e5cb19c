use tracing_subscriber::EnvFilter;

use crate::settings::AppEnvironment;

const DEFAULT_FILTER: &str = "info,sqlx=warn";

/// Installs the global subscriber. JSON lines in production, human-readable otherwise.
pub fn init_tracing(env: &AppEnvironment) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true);

    let result = match env {
        AppEnvironment::Production => builder.json().try_init(),
        _ => builder.try_init(),
    };

    if let Err(e) = result {
        eprintln!("Tracing subscriber already installed: {}", e);
    }
}
