//! A data directory holding the record files.
//!
//! The [`Store`] ties together a directory on disk, its [`Config`], and the
//! in-memory [`Service`] built from the files it contains.

use std::{
    io,
    path::{Path, PathBuf},
};

use crate::{
    domain::{Config, Registry, Service},
    storage::records::{self, MalformedRecord},
};

/// The name of the configuration file inside a data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// A store whose record files have been read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded {
    config: Config,
    service: Service,
    report: LoadReport,
}

/// A store that has not been read yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unloaded;

/// Lines skipped while loading the record files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Malformed lines in the reservations file.
    pub reservations: Vec<MalformedRecord>,
    /// Malformed lines in the equipment file.
    pub equipment: Vec<MalformedRecord>,
}

impl LoadReport {
    /// Whether every line was loaded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.reservations.is_empty() && self.equipment.is_empty()
    }
}

/// A filesystem backed store of equipment and reservations.
#[derive(Debug)]
pub struct Store<S> {
    /// The directory the record files live in.
    root: PathBuf,
    state: S,
}

/// Errors reading or writing the record files.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A record file could not be read.
    #[error("failed to read {}", path.display())]
    Read {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
    /// A record file could not be written.
    #[error("failed to write {}", path.display())]
    Write {
        /// The file that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
}

impl<S> Store<S> {
    /// The data directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Store<Unloaded> {
    /// Opens a data directory at the given path.
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self {
            root,
            state: Unloaded,
        }
    }

    /// Reads the configuration and record files.
    ///
    /// The registry is seeded unless the configuration asks for the equipment
    /// file and that file exists. Malformed lines are skipped and listed in
    /// the [`LoadReport`].
    ///
    /// # Errors
    ///
    /// Returns an error if a record file exists but cannot be read.
    pub fn load(self) -> Result<Store<Loaded>, StoreError> {
        let config = load_config(&self.root);
        let mut report = LoadReport::default();

        let registry = if config.load_equipment {
            let path = self.root.join(config.equipment_file());
            match records::load_registry(&path).map_err(|source| StoreError::Read {
                path: path.clone(),
                source,
            })? {
                Some((registry, skipped)) => {
                    warn_skipped(&path, &skipped);
                    report.equipment = skipped;
                    registry
                }
                None => {
                    tracing::debug!("No equipment file at {}, seeding", path.display());
                    Registry::seed()
                }
            }
        } else {
            Registry::seed()
        };

        let path = self.root.join(config.reservations_file());
        let (ledger, skipped) = records::load_ledger(&path, config.timestamp_format())
            .map_err(|source| StoreError::Read {
                path: path.clone(),
                source,
            })?;
        warn_skipped(&path, &skipped);
        report.reservations = skipped;

        Ok(Store {
            root: self.root,
            state: Loaded {
                service: Service::from_parts(registry, ledger),
                config,
                report,
            },
        })
    }
}

impl Store<Loaded> {
    /// The configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.state.config
    }

    /// The reservation service.
    #[must_use]
    pub const fn service(&self) -> &Service {
        &self.state.service
    }

    /// Mutable access to the reservation service.
    pub const fn service_mut(&mut self) -> &mut Service {
        &mut self.state.service
    }

    /// The lines skipped while loading.
    #[must_use]
    pub const fn report(&self) -> &LoadReport {
        &self.state.report
    }

    /// The path of the reservations file.
    #[must_use]
    pub fn reservations_path(&self) -> PathBuf {
        self.root.join(self.state.config.reservations_file())
    }

    /// The path of the equipment file.
    #[must_use]
    pub fn equipment_path(&self) -> PathBuf {
        self.root.join(self.state.config.equipment_file())
    }

    /// Writes the equipment file and then the reservations file.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be written.
    pub fn flush(&self) -> Result<(), StoreError> {
        let path = self.equipment_path();
        records::save_registry(self.service().registry(), &path)
            .map_err(|source| StoreError::Write { path, source })?;

        let path = self.reservations_path();
        records::save_ledger(
            self.service().ledger(),
            &path,
            self.state.config.timestamp_format(),
        )
        .map_err(|source| StoreError::Write { path, source })?;

        tracing::debug!("Flushed records to {}", self.root.display());
        Ok(())
    }
}

fn load_config(root: &Path) -> Config {
    let path = root.join(CONFIG_FILE);
    let mut config = Config::load(&path).unwrap_or_else(|e| {
        tracing::debug!("Failed to load config: {e}");
        Config::default()
    });

    if !records::is_valid_timestamp_format(config.timestamp_format()) {
        tracing::warn!(
            "Invalid timestamp format '{}', using the default",
            config.timestamp_format()
        );
        config.set_timestamp_format(Config::default().timestamp_format());
    }
    config
}

fn warn_skipped(path: &Path, skipped: &[MalformedRecord]) {
    for record in skipped {
        tracing::warn!("Skipping {}: {record}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::NaiveDate;
    use tempfile::TempDir;

    use super::*;
    use crate::domain::TeacherName;

    fn setup_temp_directory() -> (TempDir, Store<Loaded>) {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let path = tmp.path().to_path_buf();
        (tmp, Store::new(path).load().unwrap())
    }

    fn teacher(name: &str) -> TeacherName {
        TeacherName::new(name).unwrap()
    }

    #[test]
    fn empty_directory_loads_seeded_registry() {
        let (_tmp, store) = setup_temp_directory();
        assert_eq!(store.service().registry(), &Registry::seed());
        assert!(store.service().ledger().is_empty());
        assert!(store.report().is_clean());
    }

    #[test]
    fn flush_writes_both_files() {
        let (tmp, mut store) = setup_temp_directory();
        let at = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(13, 0, 0)
            .unwrap();
        store
            .service_mut()
            .reserve_at(teacher("Ana"), 2, at)
            .unwrap();
        store.flush().unwrap();

        let reservations = fs::read_to_string(tmp.path().join("reservas.csv")).unwrap();
        assert_eq!(reservations, "Ana,Amplificador,2024-02-29 13:00:00\n");

        let equipment = fs::read_to_string(tmp.path().join("equipamentos.csv")).unwrap();
        assert_eq!(equipment.lines().count(), 5);
        assert_eq!(equipment.lines().next(), Some("Microfone,Som"));
    }

    #[test]
    fn reload_restores_reservations_and_availability() {
        let (tmp, mut store) = setup_temp_directory();
        store.service_mut().reserve(teacher("Ana"), 1).unwrap();
        store.service_mut().reserve(teacher("Bruno"), 3).unwrap();
        store.flush().unwrap();

        let reloaded = Store::new(tmp.path().to_path_buf()).load().unwrap();
        let service = reloaded.service();

        let history: Vec<_> = service
            .history()
            .map(|entry| (entry.teacher.as_str(), entry.equipment))
            .collect();
        assert_eq!(
            history,
            [("Ana", "Microfone"), ("Bruno", "Caixa de Som Portátil")]
        );
        assert_eq!(service.list_available().count(), 3);
        assert!(
            !service
                .registry()
                .find_by_name("Microfone")
                .unwrap()
                .is_available()
        );
    }

    #[test]
    fn malformed_reservations_are_reported() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("reservas.csv"),
            "Ana,Microfone,2024-01-01 08:00:00\nbroken line\n",
        )
        .unwrap();

        let store = Store::new(tmp.path().to_path_buf()).load().unwrap();
        assert_eq!(store.service().ledger().len(), 1);
        assert_eq!(store.report().reservations.len(), 1);
        assert_eq!(store.report().reservations[0].line, 2);
    }

    #[test]
    fn equipment_file_is_ignored_unless_configured() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("equipamentos.csv"), "Projetor,Vídeo\n").unwrap();

        let store = Store::new(tmp.path().to_path_buf()).load().unwrap();
        assert_eq!(store.service().registry(), &Registry::seed());

        let mut config = Config::default();
        config.load_equipment = true;
        config.save(&tmp.path().join(CONFIG_FILE)).unwrap();

        let store = Store::new(tmp.path().to_path_buf()).load().unwrap();
        let names: Vec<_> = store
            .service()
            .registry()
            .iter()
            .map(crate::Equipment::name)
            .collect();
        assert_eq!(names, ["Projetor"]);
    }

    #[test]
    fn configured_file_names_and_format_are_used() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "_version = \"1\"\nreservations_file = \"bookings.csv\"\ntimestamp_format = \"%d/%m/%Y %H:%M\"\n",
        )
        .unwrap();
        fs::write(tmp.path().join("bookings.csv"), "Ana,Microfone,05/03/2024 10:30\n").unwrap();

        let store = Store::new(tmp.path().to_path_buf()).load().unwrap();
        assert!(store.report().is_clean());
        let entry = store.service().history().next().unwrap();
        assert_eq!(
            entry.reserved_at,
            NaiveDate::from_ymd_opt(2024, 3, 5)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap()
        );
        assert_eq!(store.reservations_path(), tmp.path().join("bookings.csv"));
    }

    #[test]
    fn invalid_timestamp_format_falls_back_to_default() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "_version = \"1\"\ntimestamp_format = \"%Q\"\n",
        )
        .unwrap();

        let store = Store::new(tmp.path().to_path_buf()).load().unwrap();
        assert_eq!(
            store.config().timestamp_format(),
            Config::default().timestamp_format()
        );
    }

    #[test]
    fn format_without_a_date_falls_back_and_keeps_reservations() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "_version = \"1\"\ntimestamp_format = \"%H:%M:%S\"\n",
        )
        .unwrap();

        let mut store = Store::new(tmp.path().to_path_buf()).load().unwrap();
        assert_eq!(
            store.config().timestamp_format(),
            Config::default().timestamp_format()
        );
        store.service_mut().reserve(teacher("Ana"), 1).unwrap();
        store.flush().unwrap();

        let reloaded = Store::new(tmp.path().to_path_buf()).load().unwrap();
        assert!(reloaded.report().is_clean());
        assert_eq!(reloaded.service().ledger().len(), 1);
    }

    #[test]
    fn format_with_an_offset_falls_back_and_flushes() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "_version = \"1\"\ntimestamp_format = \"%Y-%m-%d %H:%M:%S %z\"\n",
        )
        .unwrap();

        let mut store = Store::new(tmp.path().to_path_buf()).load().unwrap();
        store.service_mut().reserve(teacher("Ana"), 1).unwrap();
        store.flush().unwrap();
        assert_eq!(
            store.config().timestamp_format(),
            Config::default().timestamp_format()
        );
    }

    #[test]
    fn invalid_utf8_line_is_reported_not_fatal() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("reservas.csv"),
            b"Ana,Microfone,2024-01-01 08:00:00\nJo\xe3o,Amplificador,2024-01-01 09:00:00\n",
        )
        .unwrap();

        let store = Store::new(tmp.path().to_path_buf()).load().unwrap();
        assert_eq!(store.service().ledger().len(), 1);
        assert_eq!(store.report().reservations.len(), 1);
        assert_eq!(store.report().reservations[0].line, 2);
    }

    #[test]
    fn flush_into_missing_directory_fails() {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(tmp.path().join("does/not/exist")).load().unwrap();

        let error = store.flush().unwrap_err();
        assert!(matches!(error, StoreError::Write { .. }));
    }
}
