//! Application configuration, stored at `~/.pmodesk/config.json`.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::store::persist;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Override for the snapshot directory; defaults to `~/.pmodesk`.
    pub data_dir: Option<PathBuf>,
    /// Company domain for the sign-in gate (e.g. `focuslearning.com`).
    /// Unset means nobody passes `util::is_authorized_email`.
    pub auth_domain: Option<String>,
    pub company_name: Option<String>,
    /// Signed-in user's email, persisted across launches. Cleared on
    /// logout.
    pub session_email: Option<String>,
}

impl Config {
    pub fn resolved_data_dir(&self) -> Result<PathBuf, StoreError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => persist::default_data_dir(),
        }
    }
}

/// Canonical config file path (`~/.pmodesk/config.json`).
pub fn config_path() -> Result<PathBuf, StoreError> {
    Ok(persist::default_data_dir()?.join("config.json"))
}

/// Load configuration. A missing file yields the defaults; a malformed
/// file is an error rather than a silent reset.
pub fn load_config() -> Result<Config, StoreError> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Create or update config.json: loads the current value (or defaults on
/// first run), applies `mutator`, and writes the result back.
pub fn create_or_update_config(mutator: impl FnOnce(&mut Config)) -> Result<Config, StoreError> {
    let mut config = load_config()?;
    mutator(&mut config);

    let path = config_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, serde_json::to_string_pretty(&config)?)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"authDomain": "focuslearning.com"}"#).unwrap();
        assert_eq!(config.auth_domain.as_deref(), Some("focuslearning.com"));
        assert_eq!(config.data_dir, None);
        assert_eq!(config.company_name, None);

        let empty: Config = serde_json::from_str("{}").unwrap();
        assert!(empty.auth_domain.is_none());
        assert!(empty.session_email.is_none());
    }
}
