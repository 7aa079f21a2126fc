//! Service configuration: YAML file in the platform config dir, with
//! environment overrides for deployments that configure through env only.

use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_listen() -> String {
    "127.0.0.1:5000".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            listen: default_listen(),
        }
    }
}

impl Config {
    /// Standard configuration directory depending on the platform.
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("tripsheet")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".tripsheet")
        }
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join("tripsheet.conf")
    }

    pub fn database_file() -> PathBuf {
        Self::config_dir().join("tripsheet.sqlite")
    }

    /// Load the config file if present, otherwise defaults. Environment
    /// variables win over both: `TRIPSHEET_DB`, `TRIPSHEET_LISTEN`.
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();
        let mut cfg = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_yaml::from_str(&content)
                .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))?
        } else {
            Config::default()
        };

        if let Ok(db) = env::var("TRIPSHEET_DB") {
            cfg.database = db;
        }
        if let Ok(listen) = env::var("TRIPSHEET_LISTEN") {
            cfg.listen = listen;
        }
        cfg.database = expand_tilde(&cfg.database).to_string_lossy().to_string();
        Ok(cfg)
    }

    /// Create the config directory, config file and an empty database file.
    pub fn init_all(custom_db: Option<String>) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let db_path = match custom_db {
            Some(name) => {
                let p = PathBuf::from(&name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            listen: default_listen(),
        };

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| AppError::Config(e.to_string()))?;
        let mut file = fs::File::create(Self::config_file())?;
        file.write_all(yaml.as_bytes())?;

        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }
        Ok(db_path)
    }
}
