use std::path::{Path, PathBuf};

mod cancel;
mod history;
mod init;
mod list;
mod menu;
mod reserve;
mod terminal;

use clap::ArgAction;
use history::History;
use reservations::{Loaded, Store};
use terminal::Colorize;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global=true)]
    verbose: u8,

    /// The directory holding the reservation files
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command.unwrap_or(Command::Menu).run(&self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Run the interactive menu (default)
    Menu,

    /// Write a default configuration file
    Init(init::Command),

    /// Reserve an available item for a teacher
    ///
    /// Items are numbered from 1 in the order shown by `list`.
    Reserve(reserve::Command),

    /// Cancel the oldest reservation held by a teacher
    Cancel(cancel::Command),

    /// List the equipment available for reservation
    List,

    /// Show the reservation history
    History(History),
}

impl Command {
    fn run(self, root: &Path) -> anyhow::Result<()> {
        match self {
            Self::Menu => menu::run(root)?,
            Self::Init(command) => command.run(root)?,
            Self::Reserve(command) => command.run(root)?,
            Self::Cancel(command) => command.run(root)?,
            Self::List => list::run(root)?,
            Self::History(command) => command.run(root)?,
        }
        Ok(())
    }
}

/// Loads the store at `root`, reporting any skipped lines.
fn open_store(root: &Path) -> anyhow::Result<Store<Loaded>> {
    let store = Store::new(root.to_path_buf()).load()?;

    let report = store.report();
    if !report.reservations.is_empty() {
        println!(
            "{}",
            format!(
                "⚠️  Skipped {} malformed line(s) in {}",
                report.reservations.len(),
                store.reservations_path().display()
            )
            .warning()
        );
    }
    if !report.equipment.is_empty() {
        println!(
            "{}",
            format!(
                "⚠️  Skipped {} malformed line(s) in {}",
                report.equipment.len(),
                store.equipment_path().display()
            )
            .warning()
        );
    }

    Ok(store)
}
