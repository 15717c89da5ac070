pub use crate::cli::{command, run_app};
pub use crate::domain::{
    book::ContactBook,
    contact::{self, Contact, ContactPatch, Field},
    selector::Selector,
};
pub use crate::errors::AppError;
pub use crate::storage::{self, ContactStore, JsonFileStore, MemStore};
