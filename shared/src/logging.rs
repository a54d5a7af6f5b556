use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber. Level comes from `RUST_LOG`, default `info`.
/// No timestamps or targets: CloudWatch stamps each line already.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}
