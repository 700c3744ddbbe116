//! Domain models for equipment reservations.
//!
//! This module contains the core domain types: equipment and its registry,
//! reservations and the ledger that orders them, the service that keeps the
//! two consistent, and configuration.

mod config;
pub use config::Config;

mod equipment;
pub use equipment::Equipment;

/// The equipment catalog.
pub mod registry;
pub use registry::Registry;

mod ledger;
pub use ledger::Ledger;

mod reservation;
pub use reservation::{EmptyNameError, Reservation, TeacherName};

pub mod service;
pub use service::{HistoryEntry, InvalidSelection, NotFound, Service};
