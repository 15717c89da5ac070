pub mod book;
pub mod contact;
pub mod selector;

pub use book::{ContactBook, Contacts};
pub use contact::{Contact, ContactPatch, Field};
pub use selector::Selector;
