use tracing_subscriber::EnvFilter;

/// Filter directives for the subscriber, e.g. `MSGCAT_LOG=mc_core=trace`.
pub const LOG_ENV: &str = "MSGCAT_LOG";

pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
