use std::{fs, path::Path};

use reservations::{
    Config,
    storage::{CONFIG_FILE, records::is_valid_timestamp_format},
};
use tracing::instrument;

use crate::cli::terminal::Colorize;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// Build the equipment catalog from the equipment file instead of the
    /// built-in list
    #[arg(long)]
    load_equipment: bool,

    /// The `chrono` format used for reservation timestamps
    #[arg(long, value_name = "FORMAT")]
    timestamp_format: Option<String>,
}

impl Command {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            anyhow::bail!(
                "Already initialized (found existing {})",
                config_path.display()
            );
        }

        let mut config = Config::default();
        config.load_equipment = self.load_equipment;
        if let Some(format) = self.timestamp_format {
            if !is_valid_timestamp_format(&format) {
                anyhow::bail!(
                    "Invalid timestamp format '{format}': it must render and read back a full date and time"
                );
            }
            config.set_timestamp_format(format);
        }

        fs::create_dir_all(root)
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", root.display()))?;

        config
            .save(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to create {CONFIG_FILE}: {e}"))?;

        println!(
            "{}",
            format!("✅ Initialized reservations in {}", root.display()).success()
        );
        println!("  Created: {CONFIG_FILE}");
        println!();
        println!("Next steps:");
        println!("  reserve list");
        println!("  reserve reserve \"Teacher Name\" 1");

        Ok(())
    }
}
