//! CLI library for testing purposes

pub mod settings;

pub use locz::{Locz, LoczConfig};
pub use settings::{CONFIG_FILE_NAME, parse_config, resolve_config};
