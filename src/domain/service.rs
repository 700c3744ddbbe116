//! Operations that mutate the registry and the ledger together.
//!
//! Every operation either succeeds completely or leaves both collections
//! untouched. An item is unavailable exactly when one reservation in the
//! ledger references it.

use std::collections::HashSet;

use chrono::{Local, NaiveDateTime};
use serde::Serialize;

use super::{Equipment, Ledger, Registry, Reservation, TeacherName};

/// The reservation service, holding the registry and the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Service {
    registry: Registry,
    ledger: Ledger,
}

/// The chosen number did not identify an available item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid selection {index}: choose a number between 1 and {available}")]
pub struct InvalidSelection {
    /// The number that was chosen.
    pub index: usize,
    /// How many items were available at the time.
    pub available: usize,
}

/// No reservation is held by the given teacher.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no reservation found for teacher '{teacher}'")]
pub struct NotFound {
    /// The teacher that was searched for.
    pub teacher: TeacherName,
}

/// One line of the reservation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryEntry<'a> {
    /// The teacher holding the reservation.
    pub teacher: &'a TeacherName,
    /// The name of the reserved equipment.
    pub equipment: &'a str,
    /// When the reservation was made.
    pub reserved_at: NaiveDateTime,
}

impl<'a> From<&'a Reservation> for HistoryEntry<'a> {
    fn from(reservation: &'a Reservation) -> Self {
        Self {
            teacher: reservation.teacher(),
            equipment: reservation.equipment(),
            reserved_at: reservation.reserved_at(),
        }
    }
}

impl Service {
    /// A service over the seeded registry and an empty ledger.
    #[must_use]
    pub fn seeded() -> Self {
        Self::from_parts(Registry::seed(), Ledger::new())
    }

    /// Builds a service from a registry and a previously persisted ledger.
    ///
    /// Each item may be held by one reservation only: a later reservation
    /// of an item already held is dropped. Availability flags are then
    /// recomputed from the ledger. A reservation whose equipment is not in
    /// the registry is kept as-is.
    #[must_use]
    pub fn from_parts(mut registry: Registry, ledger: Ledger) -> Self {
        let mut reserved = HashSet::new();
        let ledger: Ledger = ledger
            .into_iter()
            .filter(|reservation| {
                if reserved.insert(reservation.equipment().to_owned()) {
                    return true;
                }
                tracing::warn!(
                    "Ignoring reservation for '{}': '{}' is already reserved",
                    reservation.teacher(),
                    reservation.equipment()
                );
                false
            })
            .collect();

        for item in registry.iter_mut() {
            let available = !reserved.contains(item.name());
            item.set_available(available);
        }

        for reservation in &ledger {
            if registry.find_by_name(reservation.equipment()).is_none() {
                tracing::warn!(
                    "Reservation for '{}' refers to unknown equipment '{}'",
                    reservation.teacher(),
                    reservation.equipment()
                );
            }
        }

        Self { registry, ledger }
    }

    /// The equipment registry.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The reservation ledger.
    #[must_use]
    pub const fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Reserves the `index`th currently available item (counting from 1) for
    /// `teacher`, timestamped now.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSelection`] if `index` is outside
    /// `1..=available count`. Nothing is changed in that case.
    pub fn reserve(
        &mut self,
        teacher: TeacherName,
        index: usize,
    ) -> Result<&Reservation, InvalidSelection> {
        self.reserve_at(teacher, index, Local::now().naive_local())
    }

    /// Like [`Service::reserve`], with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSelection`] if `index` is outside
    /// `1..=available count`. Nothing is changed in that case.
    pub fn reserve_at(
        &mut self,
        teacher: TeacherName,
        index: usize,
        reserved_at: NaiveDateTime,
    ) -> Result<&Reservation, InvalidSelection> {
        let available = self.registry.list_available().count();
        let Some(item) = self.registry.nth_available_mut(index) else {
            return Err(InvalidSelection { index, available });
        };

        item.set_available(false);
        let reservation = Reservation::new(teacher, item.name(), reserved_at);
        tracing::info!(
            "Reserved '{}' for '{}'",
            reservation.equipment(),
            reservation.teacher()
        );
        Ok(self.ledger.push(reservation))
    }

    /// Cancels the oldest reservation held by `teacher` and returns it.
    ///
    /// Other reservations by the same teacher are left alone.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`] if the teacher holds no reservation. Nothing is
    /// changed in that case.
    pub fn cancel(&mut self, teacher: &TeacherName) -> Result<Reservation, NotFound> {
        let position = self.ledger.position_of(teacher).ok_or_else(|| NotFound {
            teacher: teacher.clone(),
        })?;

        let reservation = self.ledger.remove(position);
        match self.registry.find_by_name_mut(reservation.equipment()) {
            Some(item) => item.set_available(true),
            None => tracing::warn!(
                "Cancelled reservation refers to unknown equipment '{}'",
                reservation.equipment()
            ),
        }
        tracing::info!(
            "Cancelled reservation of '{}' for '{}'",
            reservation.equipment(),
            reservation.teacher()
        );
        Ok(reservation)
    }

    /// The available equipment, numbered from 1 in the order used by
    /// [`Service::reserve`].
    pub fn list_available(&self) -> impl Iterator<Item = (usize, &Equipment)> {
        self.registry
            .list_available()
            .enumerate()
            .map(|(i, item)| (i + 1, item))
    }

    /// The full reservation history, oldest first.
    ///
    /// Each call returns a fresh iterator over the current ledger.
    pub fn history(&self) -> impl Iterator<Item = HistoryEntry<'_>> {
        self.ledger.iter().map(HistoryEntry::from)
    }

    /// All reservations held by `teacher`, oldest first.
    pub fn reservations_for<'a>(
        &'a self,
        teacher: &'a TeacherName,
    ) -> impl Iterator<Item = &'a Reservation> {
        self.ledger
            .iter()
            .filter(move |reservation| reservation.teacher() == teacher)
    }
}
