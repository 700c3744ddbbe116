use std::path::Path;

use reservations::TeacherName;
use tracing::instrument;

use crate::cli::{open_store, terminal::Colorize};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The teacher making the reservation
    teacher: TeacherName,

    /// The number of the item, as shown by `list`
    number: usize,
}

impl Command {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut store = open_store(root)?;

        let reservation = store.service_mut().reserve(self.teacher, self.number)?;
        let message = format!(
            "✅ Reserved {} for {}",
            reservation.equipment(),
            reservation.teacher()
        );

        store.flush()?;
        println!("{}", message.success());
        Ok(())
    }
}
