use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::STORE_PATH_ENV;
use crate::domain::{ContactPatch, Field, Selector};
use crate::errors::AppError;
use crate::storage::json::DEFAULT_STORE_PATH;

#[derive(Parser, Debug)]
#[command(
    name = "contact-book",
    version,
    about = "Simple local contact book",
    long_about = "Simple local contact book. Run without a subcommand for the interactive menu."
)]
pub struct Cli {
    /// Path to the contacts store
    #[arg(short, long, global = true, env = STORE_PATH_ENV, default_value = DEFAULT_STORE_PATH)]
    pub file: PathBuf,

    /// Log debug events to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommand and their flags
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new contact
    Add {
        /// Contact name
        #[arg(long)]
        name: String,

        /// Contact phone number
        #[arg(long)]
        phone: Option<String>,

        /// Contact email address
        #[arg(long)]
        email: Option<String>,

        /// Postal address
        #[arg(long)]
        address: Option<String>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// List contacts with their positions
    #[command(alias = "list")]
    View {
        /// Sort ordering (default is storage order)
        #[arg(long)]
        sort: Option<SortKey>,

        /// Reverse order
        #[arg(short, long)]
        reverse: bool,
    },
    /// Show every field of one contact
    Show {
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Find contacts whose name, phone or email contains QUERY (ignoring case)
    Search {
        /// Text to look for
        query: String,
    },
    /// Edit the data of an existing contact.
    /// Select it, then pass as many --new-* flags as fields you wish to change
    Update {
        #[command(flatten)]
        target: TargetArgs,

        /// Update name
        #[arg(long)]
        new_name: Option<String>,

        /// Update phone number
        #[arg(long)]
        new_phone: Option<String>,

        /// Update email address
        #[arg(long)]
        new_email: Option<String>,

        /// Update address (empty string clears it)
        #[arg(long)]
        new_address: Option<String>,

        /// Update notes (empty string clears them)
        #[arg(long)]
        new_notes: Option<String>,
    },
    /// Delete a contact
    Delete {
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Append contacts from a .json or .csv file
    Import {
        /// Source file
        path: PathBuf,
    },
    /// Write all contacts to a .json or .csv file
    Export {
        /// Destination file
        path: PathBuf,
    },
}

/// Selects one contact: by position, or by an exact field value
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct TargetArgs {
    /// Position as shown by `view`
    #[arg(long)]
    pub position: Option<usize>,

    /// Exact contact name
    #[arg(long)]
    pub name: Option<String>,

    /// Exact phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// Exact email address
    #[arg(long)]
    pub email: Option<String>,
}

impl TargetArgs {
    pub fn selector(&self) -> Result<Selector, AppError> {
        let exact = [
            (Field::Name, &self.name),
            (Field::Phone, &self.phone),
            (Field::Email, &self.email),
        ]
        .into_iter()
        .find_map(|(field, value)| value.as_ref().map(|v| Selector::exact(field, v.as_str())));

        match (self.position, exact) {
            (Some(position), _) => Ok(Selector::Position(position)),
            (None, Some(selector)) => Ok(selector),
            (None, None) => Err(AppError::Validation(
                "Select a contact with --position, --name, --phone or --email".to_string(),
            )),
        }
    }
}

/// Builds the patch for `update` from its --new-* flags.
pub fn patch_from_flags(
    new_name: Option<String>,
    new_phone: Option<String>,
    new_email: Option<String>,
    new_address: Option<String>,
    new_notes: Option<String>,
) -> ContactPatch {
    let mut patch = ContactPatch::default();
    for (field, value) in [
        (Field::Name, new_name),
        (Field::Phone, new_phone),
        (Field::Email, new_email),
        (Field::Address, new_address),
        (Field::Notes, new_notes),
    ] {
        if let Some(value) = value {
            patch.set(field, value);
        }
    }
    patch
}

/// Supported sort keys
#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum SortKey {
    Name,
    Phone,
    Email,
}

impl From<SortKey> for Field {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::Name => Field::Name,
            SortKey::Phone => Field::Phone,
            SortKey::Email => Field::Email,
        }
    }
}
