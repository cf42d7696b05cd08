//! Configuration loading for the Almanac service.

mod settings;

pub use settings::{Config, ServerConfig, StoreConfig};
