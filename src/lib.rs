pub mod config;
pub mod console;
pub mod error;
pub mod format;
pub mod level_set;
pub mod lines;
pub mod notify;
pub mod record;
pub mod transport;

#[cfg(feature = "layer")]
pub mod init;
#[cfg(feature = "layer")]
pub mod layer;

pub use config::{TransportConfig, TransportOptions};
pub use error::{ConfigError, SubmitError};
pub use notify::LoggedReceiver;
pub use transport::MultiLineConsole;
