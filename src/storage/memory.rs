use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::ContactStore;
use crate::prelude::{AppError, Contact};

/// Keeps the "persisted" contacts in memory. Clones share the same data,
/// so a caller can hand one clone to a `ContactBook` and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemStore {
    data: Rc<RefCell<Vec<Contact>>>,
    saves: Rc<Cell<usize>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contacts(contacts: Vec<Contact>) -> Self {
        Self {
            data: Rc::new(RefCell::new(contacts)),
            saves: Rc::default(),
        }
    }

    pub fn snapshot(&self) -> Vec<Contact> {
        self.data.borrow().clone()
    }

    /// Number of times `save` has been called.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl ContactStore for MemStore {
    fn load(&self) -> Result<Vec<Contact>, AppError> {
        Ok(self.data.borrow().clone())
    }

    fn save(&self, contacts: &[Contact]) -> Result<(), AppError> {
        *self.data.borrow_mut() = contacts.to_vec();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
