//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Unknown fields are rejected so typos surface instead of silently using defaults.
//!
//! ```xml
//! <config>
//!   <web_root>/srv/www</web_root>
//!   <default_root>UserFiles</default_root>
//!   <web_root_alias>wwwroot</web_root_alias>
//!   <log_level>normal</log_level>
//!   <log_file>/var/log/webfm.log</log_file>
//! </config>
//! ```

use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::{FileManagerError, Result};
use crate::fs_ops::helpers::io_error_with_help;

use super::paths::default_config_path;
use super::types::{Config, LogLevel};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    web_root: Option<String>,
    default_root: Option<String>,
    web_root_alias: Option<String>,
    log_level: Option<String>,
    log_file: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse config XML text. Missing fields keep their defaults.
pub fn parse_config_xml(content: &str) -> Result<Config> {
    let parsed: XmlConfig = from_xml_str(content)
        .map_err(|e| FileManagerError::Config(format!("malformed config XML: {e}")))?;

    let mut cfg = Config::default();
    if let Some(web_root) = non_blank(parsed.web_root) {
        cfg.web_root = PathBuf::from(web_root);
    }
    if let Some(default_root) = non_blank(parsed.default_root) {
        cfg.default_root = default_root;
    }
    // An explicitly empty alias disables alias stripping.
    if let Some(alias) = parsed.web_root_alias {
        cfg.web_root_alias = alias.trim().trim_matches('/').to_string();
    }
    if let Some(level) = non_blank(parsed.log_level) {
        cfg.log_level = level
            .parse::<LogLevel>()
            .map_err(FileManagerError::Config)?;
    }
    cfg.log_file = non_blank(parsed.log_file).map(PathBuf::from);
    Ok(cfg)
}

/// Read and parse a config file.
pub fn load_config_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(io_error_with_help("read config", path))?;
    let cfg = parse_config_xml(&content)?;
    debug!(path = %path.display(), web_root = %cfg.web_root.display(), "loaded config");
    Ok(cfg)
}

/// Load from `$WEBFM_CONFIG` or the default location.
/// Returns None when no config file exists there.
pub fn load_config_from_xml() -> Result<Option<(PathBuf, Config)>> {
    let Some(path) = default_config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        debug!(path = %path.display(), "no config file; using defaults");
        return Ok(None);
    }
    let cfg = load_config_file(&path)?;
    Ok(Some((path, cfg)))
}
