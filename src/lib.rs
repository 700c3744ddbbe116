//! Plain-text Equipment Reservations
//!
//! Teachers reserve audiovisual equipment; reservations are stored in
//! comma-delimited text files inside a data directory.

pub mod domain;
pub use domain::{
    Config, Equipment, HistoryEntry, InvalidSelection, Ledger, NotFound, Registry, Reservation,
    Service, TeacherName,
};

/// Flat-file persistence for the registry and the ledger.
pub mod storage;
pub use storage::{LoadReport, Loaded, Store};
