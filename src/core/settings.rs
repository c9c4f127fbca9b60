use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Read},
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
    time::Duration,
};
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_SETTINGS_PATH: &str = "core/settings.json";
pub const DEFAULT_API_BASE: &str = "https://us-central1-cloudjobtrackerapi.cloudfunctions.net/api";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings structure is incorrect: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for {name}: {value}")]
    InvalidOverride { name: &'static str, value: String },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Settings {
    pub ipv4_addr: Ipv4Setting,
    pub port: U16Setting,
    pub api_base: StrSetting,
    pub projects_path: StrSetting,
    pub consent_path: StrSetting,
    pub carousel_interval_ms: U64Setting,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StrSetting {
    pub name: String,
    pub value: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct U16Setting {
    pub name: String,
    pub value: u16,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct U64Setting {
    pub name: String,
    pub value: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Ipv4Setting {
    pub name: String,
    pub value: Ipv4Addr,
}

impl Settings {
    pub fn load(path: &str) -> Result<Self, SettingsError> {
        let file = File::open(path)?;
        let mut buffer = Vec::new();
        let mut reader = BufReader::new(file);
        reader.read_to_end(&mut buffer)?;
        Ok(serde_json::from_slice::<Settings>(&buffer)?)
    }

    /// Loads `path`, falling back to the built-in defaults when the file is
    /// missing or malformed, then applies environment overrides.
    pub fn load_or_default(path: &str) -> Result<Self, SettingsError> {
        let mut settings = match Settings::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                warn!("settings load error, using defaults: {}", err);
                Settings::new()
            }
        };
        settings.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    pub fn new() -> Self {
        Settings {
            ipv4_addr: Ipv4Setting {
                name: "Ipv4 Address".to_string(),
                value: Ipv4Addr::new(127, 0, 0, 1),
            },
            port: U16Setting {
                name: "Port".to_string(),
                value: 4010,
            },
            api_base: StrSetting {
                name: "Jobs API base".to_string(),
                value: DEFAULT_API_BASE.to_string(),
            },
            projects_path: StrSetting {
                name: "projects_path".to_string(),
                value: "data/projects.json".to_string(),
            },
            consent_path: StrSetting {
                name: "consent_path".to_string(),
                value: "data/storage.json".to_string(),
            },
            carousel_interval_ms: U64Setting {
                name: "carousel_interval_ms".to_string(),
                value: 3500,
            },
        }
    }

    /// `FOLIO_BIND_ADDR`, `FOLIO_PORT` and `FOLIO_API_BASE` win over the file.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("FOLIO_BIND_ADDR") {
            self.ipv4_addr.value = value.parse().map_err(|_| SettingsError::InvalidOverride {
                name: "FOLIO_BIND_ADDR",
                value,
            })?;
        }
        if let Some(value) = lookup("FOLIO_PORT") {
            self.port.value = value.parse().map_err(|_| SettingsError::InvalidOverride {
                name: "FOLIO_PORT",
                value,
            })?;
        }
        if let Some(value) = lookup("FOLIO_API_BASE") {
            self.api_base.value = value;
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(self.ipv4_addr.value, self.port.value))
    }

    pub fn carousel_interval(&self) -> Duration {
        Duration::from_millis(self.carousel_interval_ms.value)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings::new()
    }
}
