use tracing_subscriber::{
    filter::{Directive, LevelFilter},
    EnvFilter,
};

/// Install the fmt subscriber; `RUST_LOG` adds to the `dashboard_service=info` default.
pub fn init_tracing() {
    let filter = EnvFilter::from_default_env().add_directive(default_directive());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn default_directive() -> Directive {
    "dashboard_service=info"
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into())
}
