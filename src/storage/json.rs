use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::Error as _;
use serde_json::Value;
use tracing::debug;

use super::{ContactStore, write_atomically};
use crate::prelude::{AppError, Contact};

pub const DEFAULT_STORE_PATH: &str = "contacts.json";

/// The primary store: a JSON array of contacts in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ContactStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Contact>, AppError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "store file absent, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(AppError::file_access(&self.path, e)),
        };

        // serde_json rejects empty input
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }

        let parse_error = |source| AppError::Parse {
            path: self.path.clone(),
            source,
        };

        let value: Value = serde_json::from_str(&data).map_err(parse_error)?;
        let contacts =
            decode_records(value).map_err(|reason| parse_error(serde_json::Error::custom(reason)))?;

        debug!(path = %self.path.display(), count = contacts.len(), "loaded contacts");
        Ok(contacts)
    }

    fn save(&self, contacts: &[Contact]) -> Result<(), AppError> {
        let data = encode_records(contacts).map_err(|source| AppError::Parse {
            path: self.path.clone(),
            source,
        })?;
        write_atomically(&self.path, &data)?;

        debug!(path = %self.path.display(), count = contacts.len(), "saved contacts");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

pub fn encode_records(contacts: &[Contact]) -> Result<Vec<u8>, serde_json::Error> {
    let mut data = serde_json::to_vec_pretty(contacts)?;
    data.push(b'\n');
    Ok(data)
}

/// Accepts a JSON array of contact records, or an object whose values are
/// contact records (older id-keyed files), taken in file order.
pub fn decode_records(value: Value) -> Result<Vec<Contact>, String> {
    let records: Vec<Value> = match value {
        Value::Array(items) => items,
        Value::Object(map) => map.into_iter().map(|(_, record)| record).collect(),
        other => {
            return Err(format!(
                "expected a list of contacts, found {}",
                json_kind(&other)
            ));
        }
    };

    records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| {
            let position = idx + 1;
            let contact = serde_json::from_value::<Contact>(record)
                .map_err(|e| format!("record {position} is not a contact: {e}"))?
                .trimmed();

            if contact.name.is_empty() {
                return Err(format!("record {position} has an empty name"));
            }
            Ok(contact)
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
