use crate::domain::billing::{HourlyRate, RateTable};
use crate::domain::vehicle::VehicleCategory;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "parkledger.toml";

/// Optional TOML configuration.
///
/// ```toml
/// [storage]
/// data_dir = "/var/lib/parkledger"
///
/// [rates]
/// four_wheeler = "5.00"
/// two_wheeler = "2.00"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct ParkingConfig {
    pub storage: Option<StorageConfig>,
    pub rates: Option<RatesConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the record files. The `--data-dir` flag wins.
    pub data_dir: Option<PathBuf>,
}

/// Hourly rates per category. Omitted categories keep their defaults.
#[derive(Debug, Default, Deserialize)]
pub struct RatesConfig {
    pub two_wheeler: Option<Decimal>,
    pub four_wheeler: Option<Decimal>,
    pub ev: Option<Decimal>,
    pub vip: Option<Decimal>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ParkingConfig {
    /// Loads a config file. Returns `Ok(None)` if the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        Self::load_required(path).map(Some)
    }

    /// Loads a config file that must exist.
    pub fn load_required(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.storage.as_ref()?.data_dir.as_deref()
    }

    /// The default rate table with any configured overrides applied.
    pub fn rate_table(&self) -> Result<RateTable, ConfigError> {
        let mut table = RateTable::default();
        let Some(rates) = &self.rates else {
            return Ok(table);
        };

        let overrides = [
            (VehicleCategory::TwoWheeler, rates.two_wheeler),
            (VehicleCategory::FourWheeler, rates.four_wheeler),
            (VehicleCategory::Ev, rates.ev),
            (VehicleCategory::Vip, rates.vip),
        ];
        for (category, value) in overrides {
            if let Some(value) = value {
                let rate = HourlyRate::new(value).map_err(|_| {
                    ConfigError::Invalid(format!(
                        "rate for {category} must be positive, got {value}"
                    ))
                })?;
                table = table.with_rate(category, rate);
            }
        }
        Ok(table)
    }
}

/// Settings resolved from the command line and the config file.
#[derive(Debug)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub rates: RateTable,
}

impl Settings {
    /// An explicitly named config file must exist. Otherwise
    /// `parkledger.toml` in the data directory is read if present. The
    /// `data_dir` argument wins over `[storage] data_dir`.
    pub fn resolve(data_dir: Option<&Path>, config: Option<&Path>) -> crate::error::Result<Self> {
        let file = match config {
            Some(path) => ParkingConfig::load_required(path)?,
            None => {
                let path = data_dir.unwrap_or(Path::new(".")).join(DEFAULT_CONFIG_FILE);
                ParkingConfig::load(&path)?.unwrap_or_default()
            }
        };

        let rates = file.rate_table()?;
        let data_dir = data_dir
            .or_else(|| file.data_dir())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self { data_dir, rates })
    }
}
