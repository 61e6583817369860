use tracing::subscriber::set_global_default;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

// env_filter = trace|debug|info|warn|error|off
pub fn init(name: &str, env_filter: &str) -> crate::Result<()> {
    let subscriber = Registry::default()
        .with(EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new(env_filter)))
        .with(JsonStorageLayer)
        .with(BunyanFormattingLayer::new(name.into(), std::io::stdout));
    LogTracer::init().map_err(crate::Error::as_unknown_error)?;
    set_global_default(subscriber).map_err(crate::Error::as_unknown_error)?;
    Ok(())
}
