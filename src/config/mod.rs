use std::{
    collections::HashSet,
    env,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{services::user_service::collection_url, users_page::IdPolicy, utils};
use crate::domain::field::{default_user_fields, FieldDefinition};

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
pub const DEFAULT_COLLECTION: &str = "users";
/// Overrides `base_url` for a single session.
pub const BASE_URL_ENV: &str = "USER_ADMIN_BASE_URL";

const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("invalid base URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("form needs at least one field")]
    NoFields,
    #[error("field names must not be empty")]
    EmptyFieldName,
    #[error("field `{0}` is defined more than once")]
    DuplicateField(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub collection: String,
    pub fields: Vec<FieldDefinition>,
    pub create_ids: IdPolicy,
    pub plain_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            collection: DEFAULT_COLLECTION.into(),
            fields: default_user_fields(),
            create_ids: IdPolicy::default(),
            plain_output: false,
        }
    }
}

impl Config {
    /// Applies environment overrides on top of the stored document.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                self.base_url = url;
            }
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        collection_url(&self.base_url, &self.collection).map_err(|err| {
            ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: err.to_string(),
            }
        })?;

        if self.fields.is_empty() {
            return Err(ConfigError::NoFields);
        }
        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(ConfigError::EmptyFieldName);
            }
            if !seen.insert(field.name.as_str()) {
                return Err(ConfigError::DuplicateField(field.name.clone()));
            }
        }
        Ok(())
    }
}

/// Loads and stores [`Config`] as pretty JSON.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(utils::app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: utils::config_file_in(&base),
        })
    }

    /// Reads the stored document, or the defaults when none exists yet.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
