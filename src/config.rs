use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse: {0}")]
    Json(#[from] serde_json::Error),
}

/// Endpoint URLs and filename patterns for the file-management API.
///
/// Every action posts to its own configurable URL; stock deployments point
/// them all at the same server-side handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileManagerConfig {
    #[serde(default = "default_handler_url")]
    pub create_folder_url: String,

    #[serde(default = "default_handler_url")]
    pub rename_url: String,

    #[serde(default = "default_handler_url")]
    pub copy_url: String,

    #[serde(default = "default_handler_url")]
    pub compress_url: String,

    #[serde(default = "default_handler_url")]
    pub extract_url: String,

    #[serde(default = "default_handler_url")]
    pub get_content_url: String,

    #[serde(default = "default_handler_url")]
    pub remove_url: String,

    #[serde(default = "default_handler_url")]
    pub edit_url: String,

    #[serde(default = "default_handler_url")]
    pub permissions_url: String,

    #[serde(default = "default_handler_url")]
    pub download_file_url: String,

    /// Files a UI may open in its text editor.
    #[serde(default = "default_editable_pattern", with = "serde_regex")]
    pub is_editable_file_pattern: Regex,

    /// Names rendered as image thumbnails.
    #[serde(default = "default_image_pattern", with = "serde_regex")]
    pub is_image_file_pattern: Regex,

    /// Archives the server can extract.
    #[serde(default = "default_extractable_pattern", with = "serde_regex")]
    pub is_extractable_file_pattern: Regex,
}

fn default_handler_url() -> String {
    "bridges/php/handler.php".to_string()
}

fn default_editable_pattern() -> Regex {
    Regex::new(
        r"(?i)\.(txt|html?|aspx?|ini|pl|py|md|css|js|log|htaccess|htpasswd|json|sql|xml|xslt?|sh|rb|as|bat|cmd|coffee|php[3-6]?|java|c|cbl|go|h|scala|vb)$",
    )
    .expect("hardcoded pattern")
}

fn default_image_pattern() -> Regex {
    Regex::new(r"(?i)\.(jpe?g|gif|bmp|png|svg|tiff?)$").expect("hardcoded pattern")
}

fn default_extractable_pattern() -> Regex {
    Regex::new(r"(?i)\.(gz|tar|rar|g?zip)$").expect("hardcoded pattern")
}

impl Default for FileManagerConfig {
    fn default() -> Self {
        Self {
            create_folder_url: default_handler_url(),
            rename_url: default_handler_url(),
            copy_url: default_handler_url(),
            compress_url: default_handler_url(),
            extract_url: default_handler_url(),
            get_content_url: default_handler_url(),
            remove_url: default_handler_url(),
            edit_url: default_handler_url(),
            permissions_url: default_handler_url(),
            download_file_url: default_handler_url(),
            is_editable_file_pattern: default_editable_pattern(),
            is_image_file_pattern: default_image_pattern(),
            is_extractable_file_pattern: default_extractable_pattern(),
        }
    }
}

impl FileManagerConfig {
    /// Default config file path for this platform
    pub fn default_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "fm-client", "fm-client") {
            dirs.config_dir().join("config.json")
        } else {
            PathBuf::from("fm-client.json")
        }
    }

    /// Load config from a file path
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Save config to a file path
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }
}

/// Key → string lookup supplied by the host, usually backed by its
/// translation table. The default translator echoes the key back.
#[derive(Clone)]
pub struct Translator(Arc<dyn Fn(&str) -> String + Send + Sync>);

impl Translator {
    pub fn from_fn<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(lookup))
    }

    pub fn instant(&self, key: &str) -> String {
        (self.0)(key)
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::from_fn(|key| key.to_string())
    }
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Translator(..)")
    }
}
