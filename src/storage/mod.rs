pub mod json;
pub mod memory;
pub mod port;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::prelude::{AppError, Contact};

pub use json::JsonFileStore;
pub use memory::MemStore;
pub use port::{Format, export_contacts, import_contacts};

pub trait ContactStore {
    fn load(&self) -> Result<Vec<Contact>, AppError>;

    fn save(&self, contacts: &[Contact]) -> Result<(), AppError>;

    /// Human readable location, used in messages and logs.
    fn describe(&self) -> String;
}

pub fn create_file_parent(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| AppError::file_access(parent, e))?;
    }
    Ok(())
}

/// Writes `data` to a sibling temp file and renames it over `path`, so a
/// crash mid-write never leaves a truncated file behind.
pub fn write_atomically(path: &Path, data: &[u8]) -> Result<(), AppError> {
    create_file_parent(path)?;

    let tmp = temp_path(path);
    let write = || -> std::io::Result<()> {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(data)?;
        file.sync_all()
    };

    if let Err(e) = write() {
        let _ = fs::remove_file(&tmp);
        return Err(AppError::file_access(path, e));
    }

    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        AppError::file_access(path, e)
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
