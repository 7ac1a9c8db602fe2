//! Client configuration and the per-user application id file

use crate::error::{SearchError, SearchResult};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use url::Url;

/// Service root; the source name is appended as the final path segment
pub const DEFAULT_BASE_URL: &str = "https://api.datamarket.azure.com/Data.ashx/Bing/SearchWeb/v1";

/// Default request timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 15000;

/// Name of the application id file in the user's home directory
pub const APP_ID_FILE: &str = ".bing_app_id";

/// Search client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Application id used as the basic auth password.
    /// When `None`, the id is read from [`user_app_id_path`].
    pub app_id: Option<String>,
    /// Base URL for the API
    pub base_url: String,
    /// Parameters sent with every query
    pub default_params: BTreeMap<String, String>,
    /// Default request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            default_params: BTreeMap::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    /// Validate the configuration
    pub fn validate(&self) -> SearchResult<()> {
        if let Some(app_id) = &self.app_id {
            if app_id.trim().is_empty() {
                return Err(SearchError::ConfigError(
                    "Bing application id must not be empty".to_string(),
                ));
            }
        }

        let url = Url::parse(&self.base_url).map_err(|e| {
            SearchError::ConfigError(format!("Invalid base URL '{}': {e}", self.base_url))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(SearchError::ConfigError(format!(
                "Base URL must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.timeout_ms == 0 {
            return Err(SearchError::ConfigError(
                "Timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the base URL for API requests
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the explicitly configured application id
    pub fn app_id(&self) -> Option<&str> {
        self.app_id.as_deref()
    }
}

/// Home directory of the current user
pub fn home_dir() -> Option<PathBuf> {
    let var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    std::env::var_os(var)
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}

/// Location of the per-user application id file
pub fn user_app_id_path() -> Option<PathBuf> {
    home_dir().map(|home| home.join(APP_ID_FILE))
}

/// Read an application id file; a missing or blank file yields `None`
pub fn read_app_id_file(path: &Path) -> SearchResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            let app_id = contents.trim();
            Ok((!app_id.is_empty()).then(|| app_id.to_string()))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Read the application id stored in the user's home directory.
///
/// Read failures are logged and treated as "no application id".
pub fn read_user_app_id() -> Option<String> {
    let path = user_app_id_path()?;
    match read_app_id_file(&path) {
        Ok(app_id) => {
            if app_id.is_some() {
                log::debug!("Loaded Bing application id from {}", path.display());
            }
            app_id
        }
        Err(e) => {
            log::warn!("Could not read {}: {e}", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert!(config.app_id().is_none());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let blank_id = ClientConfig {
            app_id: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(matches!(blank_id.validate(), Err(SearchError::ConfigError(_))));

        let bad_url = ClientConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(bad_url.validate(), Err(SearchError::ConfigError(_))));

        let ftp = ClientConfig {
            base_url: "ftp://example.com/v1".to_string(),
            ..Default::default()
        };
        assert!(matches!(ftp.validate(), Err(SearchError::ConfigError(_))));

        let no_timeout = ClientConfig {
            timeout_ms: 0,
            ..Default::default()
        };
        assert!(no_timeout.validate().is_err());
    }

    #[test]
    fn test_read_app_id_file_trims() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  my-app-id \n").unwrap();

        let app_id = read_app_id_file(file.path()).unwrap();
        assert_eq!(app_id.as_deref(), Some("my-app-id"));
    }

    #[test]
    fn test_read_app_id_file_missing_or_blank() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_app_id_file(&dir.path().join("absent")).unwrap(), None);

        let blank = dir.path().join("blank");
        fs::write(&blank, "\n\t \n").unwrap();
        assert_eq!(read_app_id_file(&blank).unwrap(), None);
    }

    #[test]
    fn test_read_app_id_file_other_errors_propagate() {
        let dir = tempfile::tempdir().unwrap();
        // Reading a directory is an error other than NotFound
        assert!(read_app_id_file(dir.path()).is_err());
    }

    #[test]
    #[serial]
    fn test_read_user_app_id_from_home() {
        let home = tempfile::tempdir().unwrap();
        fs::write(home.path().join(APP_ID_FILE), "home-app-id\n").unwrap();

        let var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
        let previous = std::env::var_os(var);
        std::env::set_var(var, home.path());

        let path = user_app_id_path();
        let app_id = read_user_app_id();

        match previous {
            Some(value) => std::env::set_var(var, value),
            None => std::env::remove_var(var),
        }

        assert_eq!(path, Some(home.path().join(APP_ID_FILE)));
        assert_eq!(app_id.as_deref(), Some("home-app-id"));
    }
}
