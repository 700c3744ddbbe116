use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use non_empty_string::NonEmptyString;
use serde::{Serialize, Serializer};

/// The name of a teacher holding a reservation.
///
/// Teacher names are never empty. Matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeacherName(NonEmptyString);

/// Error returned when constructing a [`TeacherName`] from an empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("teacher name cannot be empty")]
pub struct EmptyNameError;

impl TeacherName {
    /// Creates a teacher name.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyNameError`] if `name` is empty.
    pub fn new(name: impl Into<String>) -> Result<Self, EmptyNameError> {
        NonEmptyString::new(name.into())
            .map(Self)
            .map_err(|_| EmptyNameError)
    }

    /// The name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for TeacherName {
    type Err = EmptyNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for TeacherName {
    type Error = EmptyNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for TeacherName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TeacherName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A record binding a teacher to one piece of equipment at a point in time.
///
/// The equipment is referenced by name and looked up in the
/// [`Registry`](super::Registry) when needed. The reservation does not own
/// the equipment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    teacher: TeacherName,
    equipment: String,
    reserved_at: NaiveDateTime,
}

impl Reservation {
    /// Creates a reservation.
    #[must_use]
    pub fn new(
        teacher: TeacherName,
        equipment: impl Into<String>,
        reserved_at: NaiveDateTime,
    ) -> Self {
        Self {
            teacher,
            equipment: equipment.into(),
            reserved_at,
        }
    }

    /// The teacher holding the reservation.
    #[must_use]
    pub const fn teacher(&self) -> &TeacherName {
        &self.teacher
    }

    /// The name of the reserved equipment.
    #[must_use]
    pub fn equipment(&self) -> &str {
        &self.equipment
    }

    /// When the reservation was made (local time).
    #[must_use]
    pub const fn reserved_at(&self) -> NaiveDateTime {
        self.reserved_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_teacher_name_is_rejected() {
        assert_eq!(TeacherName::new(""), Err(EmptyNameError));
    }

    #[test]
    fn teacher_names_match_exactly() {
        let ana: TeacherName = "Ana".parse().unwrap();
        assert_eq!(ana, TeacherName::new("Ana").unwrap());
        assert_ne!(ana, TeacherName::new("ana").unwrap());
        assert_ne!(ana, TeacherName::new("Ana ").unwrap());
    }
}
