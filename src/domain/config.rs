use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for a reservations data directory.
///
/// This struct holds the names of the record files, whether the equipment
/// catalog is read back from disk, and how timestamps are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// File name of the reservations file, relative to the data directory.
    reservations_file: String,

    /// File name of the equipment file, relative to the data directory.
    equipment_file: String,

    /// Whether to build the registry from the equipment file.
    ///
    /// When `false` (default): the registry is always seeded with the fixed
    /// list, and the equipment file is only written.
    ///
    /// When `true`: the equipment file is read if it exists, falling back to
    /// the seed list otherwise.
    pub load_equipment: bool,

    /// The `chrono` format string used for reservation timestamps.
    timestamp_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reservations_file: default_reservations_file(),
            equipment_file: default_equipment_file(),
            load_equipment: false,
            timestamp_format: default_timestamp_format(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// The reservations file name.
    #[must_use]
    pub fn reservations_file(&self) -> &str {
        &self.reservations_file
    }

    /// The equipment file name.
    #[must_use]
    pub fn equipment_file(&self) -> &str {
        &self.equipment_file
    }

    /// The timestamp format string.
    #[must_use]
    pub fn timestamp_format(&self) -> &str {
        &self.timestamp_format
    }

    /// Sets the timestamp format string.
    pub fn set_timestamp_format(&mut self, format: impl Into<String>) {
        self.timestamp_format = format.into();
    }
}

fn default_reservations_file() -> String {
    "reservas.csv".to_string()
}

fn default_equipment_file() -> String {
    "equipamentos.csv".to_string()
}

fn default_timestamp_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_reservations_file")]
        reservations_file: String,

        #[serde(default = "default_equipment_file")]
        equipment_file: String,

        #[serde(default)]
        load_equipment: bool,

        #[serde(default = "default_timestamp_format")]
        timestamp_format: String,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                reservations_file,
                equipment_file,
                load_equipment,
                timestamp_format,
            } => Self {
                reservations_file,
                equipment_file,
                load_equipment,
                timestamp_format,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            reservations_file: config.reservations_file,
            equipment_file: config.equipment_file,
            load_equipment: config.load_equipment,
            timestamp_format: config.timestamp_format,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\nreservations_file = \"r.csv\"\nequipment_file = \"e.csv\"\nload_equipment = true\ntimestamp_format = \"%d/%m/%Y %H:%M\"\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.reservations_file(), "r.csv");
        assert_eq!(config.equipment_file(), "e.csv");
        assert!(config.load_equipment);
        assert_eq!(config.timestamp_format(), "%d/%m/%Y %H:%M");
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nload_equipment = \"yes\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");

        let mut config = Config {
            load_equipment: true,
            ..Config::default()
        };
        config.set_timestamp_format("%d/%m/%Y %H:%M:%S");
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
