use tracing_subscriber::{prelude::*, EnvFilter};

/// Installs a JSON log subscriber for CloudWatch. `RUST_LOG` is honoured when
/// set; with `debug` on, this workspace's crates also log at DEBUG.
pub fn init_tracing(debug: bool) -> Result<(), lambda_http::Error> {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        .from_env_lossy();
    let filter = if debug {
        filter
            .add_directive("shared=debug".parse()?)
            .add_directive("create_link=debug".parse()?)
    } else {
        filter
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .without_time()
                .with_target(false)
                .flatten_event(true),
        )
        .try_init()?;

    Ok(())
}
