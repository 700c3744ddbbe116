//! The interactive menu.
//!
//! Failed reservations and cancellations are reported and the loop continues.
//! Leaving the menu writes both record files.

use std::path::Path;

use dialoguer::{Input, Select, theme::ColorfulTheme};
use reservations::{Loaded, Store, TeacherName};
use tracing::instrument;

use crate::cli::{history, list, open_store, terminal::Colorize};

const OPTIONS: [&str; 5] = [
    "Reserve equipment",
    "Cancel reservation",
    "List available equipment",
    "View reservation history",
    "Exit",
];

#[instrument]
pub fn run(root: &Path) -> anyhow::Result<()> {
    let mut store = open_store(root)?;
    let session = run_session(&mut store);
    finish(&store, session)
}

fn run_session(store: &mut Store<Loaded>) -> anyhow::Result<()> {
    let theme = ColorfulTheme::default();

    loop {
        let choice = Select::with_theme(&theme)
            .with_prompt("Choose an option")
            .items(&OPTIONS)
            .default(0)
            .interact()?;

        match choice {
            0 => reserve(store, &theme)?,
            1 => cancel(store, &theme)?,
            2 => list::print_available(store.service()),
            3 => {
                let entries: Vec<_> = store.service().history().collect();
                history::print_table(&entries, store.config().timestamp_format());
            }
            _ => return Ok(()),
        }
        println!();
    }
}

/// Writes the record files whether or not the session ended cleanly, then
/// returns the session's outcome.
fn finish(store: &Store<Loaded>, session: anyhow::Result<()>) -> anyhow::Result<()> {
    match store.flush() {
        Ok(()) => println!("{}", "✅ Saved".success()),
        Err(e) => println!("{}", format!("⚠️  Could not save reservations: {e}").warning()),
    }
    session
}

fn prompt_teacher(theme: &ColorfulTheme) -> dialoguer::Result<TeacherName> {
    Input::<TeacherName>::with_theme(theme)
        .with_prompt("Teacher name")
        .interact_text()
}

fn reserve(store: &mut Store<Loaded>, theme: &ColorfulTheme) -> dialoguer::Result<()> {
    let teacher = prompt_teacher(theme)?;

    list::print_available(store.service());
    let number = Input::<usize>::with_theme(theme)
        .with_prompt("Equipment number")
        .interact_text()?;

    match store.service_mut().reserve(teacher, number) {
        Ok(reservation) => println!(
            "{}",
            format!("✅ Reserved {}", reservation.equipment()).success()
        ),
        Err(e) => println!("{}", e.to_string().failure()),
    }
    Ok(())
}

fn cancel(store: &mut Store<Loaded>, theme: &ColorfulTheme) -> dialoguer::Result<()> {
    let teacher = prompt_teacher(theme)?;

    match store.service_mut().cancel(&teacher) {
        Ok(cancelled) => println!(
            "{}",
            format!("✅ Cancelled reservation of {}", cancelled.equipment()).success()
        ),
        Err(e) => println!("{}", e.to_string().failure()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn interrupted_session_is_still_saved() {
        let tmp = TempDir::new().unwrap();
        let mut store = Store::new(tmp.path().to_path_buf()).load().unwrap();
        store
            .service_mut()
            .reserve(TeacherName::new("Ana").unwrap(), 1)
            .unwrap();

        let result = finish(&store, Err(anyhow::anyhow!("input closed")));
        assert!(result.is_err());

        let saved = std::fs::read_to_string(store.reservations_path()).unwrap();
        assert!(saved.starts_with("Ana,Microfone,"));
    }

    #[test]
    fn clean_session_returns_ok_after_saving() {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(tmp.path().to_path_buf()).load().unwrap();

        finish(&store, Ok(())).unwrap();
        assert!(store.reservations_path().exists());
    }
}
