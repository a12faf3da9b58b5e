use tracing_subscriber::{fmt, EnvFilter};

/// Console logging; `RUST_LOG` overrides the default `info` level.
pub fn init_logging() {
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cin_trends=info"));
    // a second init (e.g. from tests) is harmless
    let _ = fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_target(false)
        .try_init();
}
