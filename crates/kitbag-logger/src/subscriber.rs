//! `tracing` subscriber setup for binaries

use crate::logger::{LogFormat, LoggerConfig};
use tracing::Subscriber;
use tracing_subscriber::{fmt, fmt::MakeWriter, prelude::*, EnvFilter, Layer};

/// Filter directive for the subscriber. A non-empty `RUST_LOG` wins over the
/// configured level.
pub fn filter_directive(config: &LoggerConfig, rust_log: Option<&str>) -> String {
    match rust_log.map(str::trim) {
        Some(directive) if !directive.is_empty() => directive.to_string(),
        _ => config.level.tracing_directive().to_string(),
    }
}

/// Registry with the level filter and a json or pretty fmt layer writing to
/// `writer`.
pub fn build_subscriber<W>(
    config: &LoggerConfig,
    rust_log: Option<&str>,
    writer: W,
) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_new(filter_directive(config, rust_log))
        .unwrap_or_else(|_| EnvFilter::new(config.level.tracing_directive()));

    let layer = match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().with_writer(writer).boxed(),
    };

    tracing_subscriber::registry().with(filter).with(layer)
}

/// Install the global `tracing` subscriber writing to `writer`. Binaries that
/// print results on stdout pass `std::io::stderr`. Calling this twice is a
/// no-op.
pub fn init_tracing<W>(config: &LoggerConfig, writer: W)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let subscriber = build_subscriber(config, rust_log.as_deref(), writer);

    if subscriber.try_init().is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
