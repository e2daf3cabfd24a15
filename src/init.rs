use crate::error::InitError;
use crate::layer::MultiLineConsoleLayer;
use crate::transport::MultiLineConsole;
use std::sync::Arc;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry};

/// Configuration of the installed subscriber.
///
/// **Fields**
/// - `max_level`: most verbose level handed to the transport; events
///   above it never reach [`MultiLineConsoleLayer`].
#[derive(Clone, Debug)]
pub struct LayerConfig {
    pub max_level: LevelFilter,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            max_level: LevelFilter::INFO,
        }
    }
}

/// Install a [`Registry`] with a [`MultiLineConsoleLayer`] over `transport`
/// as the global default subscriber.
///
/// **Returns**
/// - the installed layer's transport, for subscribing to `logged`
///   notifications.
/// - `Err(InitError::SetGlobalDefault)` if a global subscriber is already set.
pub fn init_tracing_with_config(
    transport: MultiLineConsole,
    config: LayerConfig,
) -> Result<Arc<MultiLineConsole>, InitError> {
    let transport = Arc::new(transport);
    let layer = MultiLineConsoleLayer::new(Arc::clone(&transport)).with_filter(config.max_level);
    let subscriber = Registry::default().with(layer);
    tracing::subscriber::set_global_default(subscriber)?;

    tracing::debug!(transport = %transport.name(), max_level = %config.max_level, "subscriber installed");
    Ok(transport)
}

/// Equivalent to [`init_tracing_with_config`] with [`LayerConfig::default`].
pub fn init_tracing(transport: MultiLineConsole) -> Result<Arc<MultiLineConsole>, InitError> {
    init_tracing_with_config(transport, LayerConfig::default())
}
