use std::path::Path;

use reservations::{HistoryEntry, TeacherName, storage::records::format_timestamp};
use tracing::instrument;

use crate::cli::{open_store, terminal::Colorize};

#[derive(Debug, clap::Parser)]
pub struct History {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    format: HistoryFormat,

    /// Only show reservations held by this teacher
    #[arg(long)]
    teacher: Option<TeacherName>,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum HistoryFormat {
    #[default]
    Table,
    Json,
}

impl History {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let store = open_store(root)?;
        let format = store.config().timestamp_format();

        let entries: Vec<HistoryEntry<'_>> = store
            .service()
            .history()
            .filter(|entry| self.teacher.as_ref().is_none_or(|t| entry.teacher == t))
            .collect();

        match self.format {
            HistoryFormat::Table => print_table(&entries, format),
            HistoryFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        }
        Ok(())
    }
}

/// Prints history entries as an aligned table, oldest first.
pub fn print_table(entries: &[HistoryEntry<'_>], timestamp_format: &str) {
    if entries.is_empty() {
        println!("{}", "No reservations.".dim());
        return;
    }

    let teacher_width = column_width("Teacher", entries.iter().map(|e| e.teacher.as_str()));
    let equipment_width = column_width("Equipment", entries.iter().map(|e| e.equipment));

    println!(
        "{:<teacher_width$}  {:<equipment_width$}  Reserved at",
        "Teacher", "Equipment"
    );
    for entry in entries {
        println!(
            "{:<teacher_width$}  {:<equipment_width$}  {}",
            entry.teacher.as_str(),
            entry.equipment,
            format_timestamp(entry.reserved_at, timestamp_format)
                .unwrap_or_else(|_| entry.reserved_at.to_string())
        );
    }
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|value| value.chars().count())
        .chain(std::iter::once(header.chars().count()))
        .max()
        .unwrap_or_default()
}
