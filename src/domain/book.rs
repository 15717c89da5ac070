use std::cmp::Ordering;
use std::path::Path;

use tracing::{debug, info, warn};

use super::contact::{Contact, ContactPatch, Field};
use super::selector::Selector;
use crate::errors::AppError;
use crate::storage::{self, ContactStore};

/// The in-memory contact list and the store it is persisted to.
///
/// Every mutation writes the full list back through the store. If that write
/// fails the change is kept in memory and the book stays dirty until a later
/// save succeeds.
pub struct ContactBook {
    contacts: Vec<Contact>,
    store: Box<dyn ContactStore>,
    dirty: bool,
}

impl ContactBook {
    pub fn open(store: Box<dyn ContactStore>) -> Result<Self, AppError> {
        let contacts = store.load()?;
        debug!(store = %store.describe(), count = contacts.len(), "opened contact book");

        Ok(Self {
            contacts,
            store,
            dirty: false,
        })
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Lazily walks the current contacts in storage order, yielding each one
    /// with its 1-based position. Call again to start over.
    pub fn iter(&self) -> Contacts<'_> {
        Contacts {
            inner: &self.contacts,
            idx: 0,
        }
    }

    /// Contacts ordered by `key` (case-insensitive, stable) for display.
    /// Positions still refer to storage order.
    pub fn sorted_by(&self, key: Field, reverse: bool) -> Vec<(usize, &Contact)> {
        let mut rows: Vec<(usize, &Contact)> = self.iter().collect();
        rows.sort_by(|(_, a), (_, b)| {
            let ord = compare_field(a, b, key);
            if reverse { ord.reverse() } else { ord }
        });
        rows
    }

    /// Contacts whose name, phone or email contains `query`, ignoring case.
    /// An empty query matches nothing.
    pub fn search(&self, query: &str) -> Vec<(usize, &Contact)> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.iter()
            .filter(|(_, contact)| contact.matches_query(&needle))
            .collect()
    }

    /// Resolves `selector` to a 0-based index into the list.
    pub fn locate(&self, selector: &Selector) -> Result<usize, AppError> {
        match selector {
            Selector::Position(position) => {
                if *position == 0 || *position > self.contacts.len() {
                    return Err(AppError::NotFound(format!(
                        "Contact at position {position}"
                    )));
                }
                Ok(position - 1)
            }
            Selector::Exact { field, value } => {
                let value = value.trim();
                let matches: Vec<usize> = self
                    .contacts
                    .iter()
                    .enumerate()
                    .filter(|(_, contact)| contact.field(*field) == value)
                    .map(|(idx, _)| idx)
                    .collect();

                match matches.as_slice() {
                    [] => Err(AppError::NotFound(format!(
                        "Contact with {field} '{value}'"
                    ))),
                    [idx] => Ok(*idx),
                    many => Err(AppError::Ambiguous(many.len())),
                }
            }
        }
    }

    pub fn get(&self, selector: &Selector) -> Result<(usize, &Contact), AppError> {
        let idx = self.locate(selector)?;
        Ok((idx + 1, &self.contacts[idx]))
    }

    /// Appends `contact` and persists. Returns its position.
    pub fn add(&mut self, contact: Contact) -> Result<usize, AppError> {
        contact.validate_name()?;

        self.contacts.push(contact);
        let position = self.contacts.len();
        info!(position, "added contact");

        self.persist()?;
        Ok(position)
    }

    /// Applies `patch` to the selected contact and persists.
    pub fn update(
        &mut self,
        selector: &Selector,
        patch: &ContactPatch,
    ) -> Result<&Contact, AppError> {
        let idx = self.locate(selector)?;
        if patch.is_empty() {
            return Err(AppError::Validation("Nothing to update".to_string()));
        }

        patch.apply(&mut self.contacts[idx])?;
        info!(position = idx + 1, "updated contact");

        self.persist()?;
        Ok(&self.contacts[idx])
    }

    /// Removes the selected contact and persists. Returns the removed contact.
    pub fn delete(&mut self, selector: &Selector) -> Result<Contact, AppError> {
        let idx = self.locate(selector)?;

        let removed = self.contacts.remove(idx);
        info!(position = idx + 1, "deleted contact");

        self.persist()?;
        Ok(removed)
    }

    /// Appends every contact in `src` without de-duplication. A file that
    /// fails to parse leaves the book untouched.
    pub fn import_from(&mut self, src: &Path) -> Result<usize, AppError> {
        let imported = storage::import_contacts(src)?;
        let count = imported.len();

        self.contacts.extend(imported);
        info!(path = %src.display(), count, "imported contacts");

        self.persist()?;
        Ok(count)
    }

    pub fn export_to(&self, des: &Path) -> Result<usize, AppError> {
        storage::export_contacts(&self.contacts, des)
    }

    /// Writes the full list to the store.
    pub fn save(&mut self) -> Result<(), AppError> {
        self.store.save(&self.contacts)?;
        self.dirty = false;
        Ok(())
    }

    /// Saves only if an earlier save failed.
    pub fn flush(&mut self) -> Result<(), AppError> {
        if self.dirty {
            self.save()?;
        }
        Ok(())
    }

    fn persist(&mut self) -> Result<(), AppError> {
        self.dirty = true;
        self.save().inspect_err(|e| {
            warn!(store = %self.store.describe(), error = %e, "save failed, keeping changes in memory");
        })
    }
}

fn compare_field(a: &Contact, b: &Contact, key: Field) -> Ordering {
    a.field(key)
        .to_lowercase()
        .cmp(&b.field(key).to_lowercase())
}

pub struct Contacts<'a> {
    inner: &'a [Contact],
    idx: usize,
}

impl<'a> Iterator for Contacts<'a> {
    type Item = (usize, &'a Contact);

    fn next(&mut self) -> Option<Self::Item> {
        let contact = self.inner.get(self.idx)?;
        self.idx += 1;
        Some((self.idx, contact))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.inner.len() - self.idx;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Contacts<'_> {}
