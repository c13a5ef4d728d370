use crate::provider::{
    AnotherDatasource, AnotherDatasourceHttpClient, DocumentContainer, DocumentMachineRepo,
    MachineRepo, SqliteMachineRepo,
};
use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

const ENV_BACKEND: &str = "MACHINE_API_BACKEND";
const ENV_DATABASE: &str = "MACHINE_API_DATABASE";
const ENV_DOCUMENTS: &str = "MACHINE_API_DOCUMENTS";
const ENV_BIND: &str = "MACHINE_API_BIND";
const ENV_DATASOURCE_URL: &str = "MACHINE_API_DATASOURCE_URL";

/// Which store holds the machines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sqlite,
    Document,
}

impl FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" | "sql" => Ok(Backend::Sqlite),
            "document" | "documents" => Ok(Backend::Document),
            other => anyhow::bail!("Unknown backend '{}', expected 'sqlite' or 'document'", other),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Sqlite => write!(f, "sqlite"),
            Backend::Document => write!(f, "document"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub datasource: DatasourceSettings,
}

/// Store locations; unset paths fall back to the config directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StorageSettings {
    pub database_path: Option<PathBuf>,
    pub documents_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasourceSettings {
    #[serde(default = "default_datasource_url")]
    pub base_url: String,
}

fn default_datasource_url() -> String {
    "http://localhost:5001".to_string()
}

impl Default for DatasourceSettings {
    fn default() -> Self {
        Self {
            base_url: default_datasource_url(),
        }
    }
}

impl Config {
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("machine-api")
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".machine-api")
        };

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
            info!("Created config directory: {:?}", config_dir);
        }

        Ok(config_dir)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        Ok(Self::get_config_dir()?.join("config.toml"))
    }

    /// Load the config file, then apply `MACHINE_API_*` environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::get_config_path()?)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load a config file, using defaults when it doesn't exist
    pub fn load_from(config_path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        toml::from_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        debug!("Saving config to: {:?}", config_path);

        let config_content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(config_path, config_content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        info!("Config saved successfully");
        Ok(())
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(backend) = lookup(ENV_BACKEND) {
            self.backend = backend
                .parse()
                .with_context(|| format!("Invalid {}", ENV_BACKEND))?;
        }
        if let Some(path) = lookup(ENV_DATABASE) {
            self.storage.database_path = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup(ENV_DOCUMENTS) {
            self.storage.documents_path = Some(PathBuf::from(path));
        }
        if let Some(bind) = lookup(ENV_BIND) {
            self.server.bind = bind;
        }
        if let Some(url) = lookup(ENV_DATASOURCE_URL) {
            self.datasource.base_url = url;
        }
        Ok(())
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.storage.database_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::get_config_dir()?.join("machines.db")),
        }
    }

    pub fn documents_path(&self) -> Result<PathBuf> {
        match &self.storage.documents_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::get_config_dir()?.join("machines.json")),
        }
    }

    /// Open the configured machine store
    pub async fn build_repo(&self) -> Result<Arc<dyn MachineRepo>> {
        match self.backend {
            Backend::Sqlite => {
                let path = self.database_path()?;
                info!("Using SQLite store at {}", path.display());
                let pool = crate::db::connect(&path).await?;
                Ok(Arc::new(SqliteMachineRepo::migrated(pool).await?))
            }
            Backend::Document => {
                let path = self.documents_path()?;
                info!("Using document store at {}", path.display());
                let container = DocumentContainer::open(path).await?;
                Ok(Arc::new(DocumentMachineRepo::new(container)))
            }
        }
    }

    pub fn build_datasource(&self) -> Result<Arc<dyn AnotherDatasource>> {
        Ok(Arc::new(AnotherDatasourceHttpClient::from_base_url(
            &self.datasource.base_url,
        )?))
    }
}
