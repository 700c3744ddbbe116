use std::path::Path;

use reservations::TeacherName;
use tracing::instrument;

use crate::cli::{open_store, terminal::Colorize};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The teacher whose oldest reservation is cancelled
    teacher: TeacherName,
}

impl Command {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut store = open_store(root)?;

        let cancelled = store.service_mut().cancel(&self.teacher)?;
        store.flush()?;

        println!(
            "{}",
            format!(
                "✅ Cancelled reservation of {} for {}",
                cancelled.equipment(),
                cancelled.teacher()
            )
            .success()
        );
        Ok(())
    }
}
