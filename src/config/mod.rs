//! Config module.
//! Provides configuration types, default paths, XML loading, validation and
//! reloadable snapshots.

pub mod paths;
pub mod store;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{CONFIG_ENV, default_config_path, default_log_path, path_has_symlink_ancestor};
pub use store::ConfigStore;
pub use types::{Config, LogLevel};
pub use xml::{load_config_file, load_config_from_xml, parse_config_xml};

/// Defaults shared across submodules.
pub const WEB_ROOT_DEFAULT: &str = "./wwwroot";
pub const DEFAULT_ROOT_DEFAULT: &str = "UserFiles";
pub const WEB_ROOT_ALIAS_DEFAULT: &str = "wwwroot";
