use super::{Reservation, TeacherName};

/// The ordered collection of active reservations.
///
/// Order is insertion order, oldest first. Cancelling a reservation removes
/// it entirely.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ledger {
    reservations: Vec<Reservation>,
}

impl Ledger {
    /// Creates an empty ledger.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            reservations: Vec::new(),
        }
    }

    /// Appends a reservation, returning a reference to it.
    pub fn push(&mut self, reservation: Reservation) -> &Reservation {
        self.reservations.push(reservation);
        let [.., last] = self.reservations.as_slice() else {
            unreachable!("ledger is non-empty after a push");
        };
        last
    }

    /// The position of the first reservation held by `teacher`.
    #[must_use]
    pub fn position_of(&self, teacher: &TeacherName) -> Option<usize> {
        self.reservations
            .iter()
            .position(|reservation| reservation.teacher() == teacher)
    }

    pub(crate) fn remove(&mut self, index: usize) -> Reservation {
        self.reservations.remove(index)
    }

    /// Whether any reservation references the named equipment.
    #[must_use]
    pub fn references(&self, equipment: &str) -> bool {
        self.reservations
            .iter()
            .any(|reservation| reservation.equipment() == equipment)
    }

    /// Reservations in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Reservation> {
        self.reservations.iter()
    }

    /// The number of reservations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reservations.len()
    }

    /// Whether the ledger is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty()
    }
}

impl FromIterator<Reservation> for Ledger {
    fn from_iter<I: IntoIterator<Item = Reservation>>(iter: I) -> Self {
        Self {
            reservations: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Ledger {
    type Item = Reservation;
    type IntoIter = std::vec::IntoIter<Reservation>;

    fn into_iter(self) -> Self::IntoIter {
        self.reservations.into_iter()
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Reservation;
    type IntoIter = std::slice::Iter<'a, Reservation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn reservation(teacher: &str, equipment: &str) -> Reservation {
        let at = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        Reservation::new(TeacherName::new(teacher).unwrap(), equipment, at)
    }

    #[test]
    fn position_of_finds_first_match() {
        let ledger: Ledger = [
            reservation("Bruno", "Microfone"),
            reservation("Ana", "Amplificador"),
            reservation("Ana", "Mixer de Áudio"),
        ]
        .into_iter()
        .collect();

        let ana = TeacherName::new("Ana").unwrap();
        assert_eq!(ledger.position_of(&ana), Some(1));
        assert_eq!(ledger.position_of(&TeacherName::new("Carla").unwrap()), None);
    }

    #[test]
    fn push_preserves_insertion_order() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.push(reservation("Ana", "Microfone")).equipment(), "Microfone");
        let pushed = ledger.push(reservation("Bruno", "Amplificador"));
        assert_eq!(pushed.teacher().as_str(), "Bruno");

        let teachers: Vec<_> = ledger.iter().map(|r| r.teacher().as_str()).collect();
        assert_eq!(teachers, ["Ana", "Bruno"]);
        assert!(ledger.references("Amplificador"));
        assert!(!ledger.references("Fone de Ouvido"));
    }
}
