use std::fmt;

use serde::Serialize;

/// An audiovisual item that teachers can reserve.
///
/// The name identifies the item within a [`Registry`](super::Registry). The
/// availability flag is only changed by the
/// [`Service`](super::Service) when a reservation is made or cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Equipment {
    name: String,
    category: String,
    available: bool,
}

impl Equipment {
    /// Creates a new, available piece of equipment.
    #[must_use]
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            available: true,
        }
    }

    /// The unique name of the equipment.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The category of the equipment (for example, "Som").
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Whether the equipment can currently be reserved.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.available
    }

    pub(crate) const fn set_available(&mut self, available: bool) {
        self.available = available;
    }
}

impl fmt::Display for Equipment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_equipment_is_available() {
        let equipment = Equipment::new("Microfone", "Som");
        assert!(equipment.is_available());
        assert_eq!(equipment.name(), "Microfone");
        assert_eq!(equipment.category(), "Som");
    }

    #[test]
    fn display_includes_category() {
        let equipment = Equipment::new("Amplificador", "Som");
        assert_eq!(equipment.to_string(), "Amplificador (Som)");
    }
}
