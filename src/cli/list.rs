use std::path::Path;

use reservations::Service;
use tracing::instrument;

use crate::cli::{open_store, terminal::Colorize};

#[instrument]
pub fn run(root: &Path) -> anyhow::Result<()> {
    let store = open_store(root)?;
    print_available(store.service());
    Ok(())
}

/// Prints the available equipment as a numbered list.
pub fn print_available(service: &Service) {
    println!("Equipment available for reservation:");

    let mut any = false;
    for (number, item) in service.list_available() {
        any = true;
        println!("{number:>3}. {}", item.name());
    }

    if !any {
        println!("{}", "  (nothing available)".dim());
    }
}
