use std::io::{self, Write};

use clap::Parser;
use tracing::debug;

use super::command::{Cli, Commands, patch_from_flags};
use super::display::{contact_card, listing_row};
use super::menu::Menu;
use crate::config::{self, Settings};
use crate::domain::contact::ValidationReq;
use crate::domain::{Contact, ContactBook};
use crate::errors::AppError;
use crate::logging;
use crate::storage::JsonFileStore;

pub fn run_app() -> Result<(), AppError> {
    config::load_dotenv();
    let cli = Cli::parse();

    let settings = Settings::from_cli(&cli);
    logging::init_logging(&settings.log_filter);
    debug!(?settings, "starting");

    let mut book = ContactBook::open(Box::new(JsonFileStore::new(&settings.store_path)))?;

    match cli.command {
        None => {
            let stdin = io::stdin();
            Menu::new(&mut book, stdin.lock(), io::stdout()).run()
        }
        Some(command) => execute(&mut book, command, &mut io::stdout()),
    }
}

/// Runs a single subcommand against `book`, writing its report to `out`.
pub fn execute<W: Write>(
    book: &mut ContactBook,
    command: Commands,
    out: &mut W,
) -> Result<(), AppError> {
    match command {
        Commands::Add {
            name,
            phone,
            email,
            address,
            notes,
        } => {
            let new_contact = Contact::new(
                name,
                phone.unwrap_or_default(),
                email.unwrap_or_default(),
            )
            .with_address(address.unwrap_or_default())
            .with_notes(notes.unwrap_or_default());

            new_contact.validate_name()?;
            warn_if_implausible(&new_contact, out)?;

            let position = book.add(new_contact)?;
            writeln!(out, "Contact added successfully (position {position})")?;
            Ok(())
        }

        // Listing contacts
        Commands::View { sort, reverse } => {
            if book.is_empty() {
                writeln!(out, "No contacts found")?;
                return Ok(());
            }

            match sort {
                Some(key) => {
                    for (position, contact) in book.sorted_by(key.into(), reverse) {
                        writeln!(out, "{}", listing_row(position, contact))?;
                    }
                }
                None if reverse => {
                    let rows: Vec<_> = book.iter().collect();
                    for (position, contact) in rows.into_iter().rev() {
                        writeln!(out, "{}", listing_row(position, contact))?;
                    }
                }
                None => {
                    for (position, contact) in book.iter() {
                        writeln!(out, "{}", listing_row(position, contact))?;
                    }
                }
            }
            Ok(())
        }

        Commands::Show { target } => {
            let (position, contact) = book.get(&target.selector()?)?;
            writeln!(out, "{}", contact_card(position, contact))?;
            Ok(())
        }

        Commands::Search { query } => {
            let hits = book.search(&query);
            if hits.is_empty() {
                writeln!(out, "No matching contacts")?;
                return Ok(());
            }

            for (position, contact) in hits {
                writeln!(out, "{}", listing_row(position, contact))?;
            }
            Ok(())
        }

        Commands::Update {
            target,
            new_name,
            new_phone,
            new_email,
            new_address,
            new_notes,
        } => {
            let patch = patch_from_flags(new_name, new_phone, new_email, new_address, new_notes);

            let updated = book.update(&target.selector()?, &patch)?.clone();
            if patch.phone.is_some() || patch.email.is_some() {
                warn_if_implausible(&updated, out)?;
            }

            writeln!(out, "Contact updated successfully")?;
            Ok(())
        }

        Commands::Delete { target } => {
            let removed = book.delete(&target.selector()?)?;
            writeln!(out, "Contact '{}' deleted successfully", removed.name)?;
            Ok(())
        }

        Commands::Import { path } => {
            let total = book.import_from(&path)?;
            writeln!(
                out,
                "Successfully imported {} contacts from {}",
                total,
                path.display()
            )?;
            Ok(())
        }

        Commands::Export { path } => {
            let total = book.export_to(&path)?;
            writeln!(
                out,
                "Successfully exported {} contacts to {}",
                total,
                path.display()
            )?;
            Ok(())
        }
    }
}

/// Phone and email are free-form; odd-looking values are kept but flagged.
fn warn_if_implausible<W: Write>(contact: &Contact, out: &mut W) -> Result<(), AppError> {
    if !contact.phone_is_plausible()? {
        writeln!(
            out,
            "Warning: phone '{}' looks unusual. {}",
            contact.phone,
            ValidationReq::phone_req()
        )?;
    }
    if !contact.email_is_plausible()? {
        writeln!(
            out,
            "Warning: email '{}' looks unusual. {}",
            contact.email,
            ValidationReq::email_req()
        )?;
    }
    Ok(())
}
