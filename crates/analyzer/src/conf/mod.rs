//! Conf module — configuration model, loading, and compilation into parser profiles.

pub mod model;
pub mod load;
pub mod compile;
pub mod error;

pub use model::{ChannelConfig, EngineConfig, ProfileConfig};
pub use compile::ParserSet;
pub use error::ConfigError;
