//! Import and export of contact lists to user-chosen files.
//!
//! The format follows the file extension: `.csv` files use a header row of
//! `name,phone,email,address,notes`, everything else is the same JSON layout
//! as the store file.

use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, Writer};
use serde_json::Value;
use tracing::debug;

use super::json::{decode_records, encode_records};
use super::write_atomically;
use crate::prelude::{AppError, Contact};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Csv,
}

impl Format {
    pub fn from_path(path: &Path) -> Self {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Format::Csv,
            _ => Format::Json,
        }
    }
}

/// Writes every contact to `des`, overwriting it. Returns the number written.
pub fn export_contacts(contacts: &[Contact], des: &Path) -> Result<usize, AppError> {
    if des.as_os_str().is_empty() {
        return Err(AppError::Validation("No export path given".to_string()));
    }
    if des.is_dir() {
        return Err(AppError::Validation(format!(
            "{} is a directory, expected a file path",
            des.display()
        )));
    }

    let format = Format::from_path(des);
    let data = match format {
        Format::Json => encode_records(contacts).map_err(|e| AppError::invalid_format(des, e.to_string()))?,
        Format::Csv => encode_csv(contacts).map_err(|e| AppError::invalid_format(des, e.to_string()))?,
    };
    write_atomically(des, &data).map_err(|e| match e {
        AppError::FileAccess { path, source } => AppError::Transfer { path, source },
        other => other,
    })?;

    debug!(path = %des.display(), ?format, count = contacts.len(), "exported contacts");
    Ok(contacts.len())
}

/// Reads every contact from `src`. Nothing is returned unless the whole file
/// is a well-formed list of contacts.
pub fn import_contacts(src: &Path) -> Result<Vec<Contact>, AppError> {
    if src.as_os_str().is_empty() {
        return Err(AppError::Validation("No import path given".to_string()));
    }

    let data = fs::read_to_string(src).map_err(|e| AppError::transfer(src, e))?;

    let format = Format::from_path(src);
    let contacts = match format {
        Format::Json => {
            let value: Value = serde_json::from_str(&data)
                .map_err(|e| AppError::invalid_format(src, format!("malformed JSON: {e}")))?;
            decode_records(value).map_err(|reason| AppError::invalid_format(src, reason))?
        }
        Format::Csv => decode_csv(&data).map_err(|reason| AppError::invalid_format(src, reason))?,
    };

    debug!(path = %src.display(), ?format, count = contacts.len(), "read contacts for import");
    Ok(contacts)
}

fn encode_csv(contacts: &[Contact]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = Writer::from_writer(Vec::new());

    if contacts.is_empty() {
        writer.write_record(["name", "phone", "email", "address", "notes"])?;
    }
    for contact in contacts {
        writer.serialize(contact)?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

fn decode_csv(data: &str) -> Result<Vec<Contact>, String> {
    let mut reader = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());

    let headers = reader.headers().map_err(|e| e.to_string())?;
    if !headers.iter().any(|h| h == "name") {
        return Err("missing a 'name' column".to_string());
    }

    reader
        .deserialize::<Contact>()
        .enumerate()
        .map(|(idx, record)| {
            let position = idx + 1;
            let contact = record.map_err(|e| format!("record {position} is not a contact: {e}"))?;

            if contact.name.is_empty() {
                return Err(format!("record {position} has an empty name"));
            }
            Ok(contact)
        })
        .collect()
}
