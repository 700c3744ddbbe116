//! The catalog of equipment known to the system.

use super::Equipment;

/// The category given to every seeded item.
pub const SEED_CATEGORY: &str = "Som";

/// Names of the equipment the registry is seeded with, in listing order.
pub const SEED_NAMES: [&str; 5] = [
    "Microfone",
    "Amplificador",
    "Mixer de Áudio",
    "Caixa de Som Portátil",
    "Fone de Ouvido",
];

/// An ordered catalog of [`Equipment`].
///
/// Items are never removed during a session. Names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Registry {
    items: Vec<Equipment>,
}

impl Registry {
    /// A registry containing the fixed seed list, all available.
    #[must_use]
    pub fn seed() -> Self {
        Self {
            items: SEED_NAMES
                .iter()
                .map(|name| Equipment::new(*name, SEED_CATEGORY))
                .collect(),
        }
    }

    /// Builds a registry from a list of equipment.
    ///
    /// Later items whose name is already present are dropped.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = Equipment>) -> Self {
        let mut registry = Self::default();
        for item in items {
            if registry.find_by_name(item.name()).is_some() {
                tracing::warn!("Ignoring duplicate equipment '{}'", item.name());
                continue;
            }
            registry.items.push(item);
        }
        registry
    }

    /// The equipment that can currently be reserved, in registry order.
    pub fn list_available(&self) -> impl Iterator<Item = &Equipment> {
        self.items.iter().filter(|item| item.is_available())
    }

    /// Finds an item by its exact (case-sensitive) name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Equipment> {
        self.items.iter().find(|item| item.name() == name)
    }

    pub(crate) fn find_by_name_mut(&mut self, name: &str) -> Option<&mut Equipment> {
        self.items.iter_mut().find(|item| item.name() == name)
    }

    /// Returns the `number`th available item, counting from 1.
    pub(crate) fn nth_available_mut(&mut self, number: usize) -> Option<&mut Equipment> {
        let index = number.checked_sub(1)?;
        self.items
            .iter_mut()
            .filter(|item| item.is_available())
            .nth(index)
    }

    /// All equipment, in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &Equipment> {
        self.items.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Equipment> {
        self.items.iter_mut()
    }

    /// The number of items in the registry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the registry has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
