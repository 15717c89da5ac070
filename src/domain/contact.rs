use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::AppError;

static PHONE_RE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^\+?\d{7,15}$"));

static EMAIL_RE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$"));

/// A single address book entry.
///
/// Optional fields hold an empty string when absent, and are always written
/// out so every persisted record carries all five keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub address: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Phone,
    Email,
    Address,
    Notes,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Phone => "phone",
            Field::Email => "email",
            Field::Address => "address",
            Field::Notes => "notes",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Field {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Field::Name),
            "phone" => Ok(Field::Phone),
            "email" => Ok(Field::Email),
            "address" => Ok(Field::Address),
            "notes" => Ok(Field::Notes),
            other => Err(AppError::Validation(format!("Unknown field '{other}'"))),
        }
    }
}

pub struct ValidationReq;

impl ValidationReq {
    pub fn name_req() -> String {
        "Name cannot be empty".to_string()
    }

    pub fn phone_req() -> String {
        "Phone should be 7 to 15 digits with an optional leading +".to_string()
    }

    pub fn email_req() -> String {
        "Email should look like name@domain.tld".to_string()
    }
}

impl Contact {
    pub fn new(name: impl Into<String>, phone: impl Into<String>, email: impl Into<String>) -> Self {
        Contact {
            name: trimmed(name),
            phone: trimmed(phone),
            email: trimmed(email),
            address: String::new(),
            notes: String::new(),
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = trimmed(address);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = trimmed(notes);
        self
    }

    /// Strips surrounding whitespace from every field, for records that did
    /// not come through `new`.
    pub fn trimmed(self) -> Self {
        Contact::new(self.name, self.phone, self.email)
            .with_address(self.address)
            .with_notes(self.notes)
    }

    pub fn validate_name(&self) -> Result<(), AppError> {
        validate_name(&self.name)
    }

    /// Phone and email stay free-form; these only flag values that look
    /// mistyped. Empty values have nothing to check.
    pub fn phone_is_plausible(&self) -> Result<bool, AppError> {
        phone_is_plausible(&self.phone)
    }

    pub fn email_is_plausible(&self) -> Result<bool, AppError> {
        email_is_plausible(&self.email)
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Phone => &self.phone,
            Field::Email => &self.email,
            Field::Address => &self.address,
            Field::Notes => &self.notes,
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Phone => &mut self.phone,
            Field::Email => &mut self.email,
            Field::Address => &mut self.address,
            Field::Notes => &mut self.notes,
        }
    }

    /// `needle` must already be lowercased.
    pub fn matches_query(&self, needle: &str) -> bool {
        [&self.name, &self.phone, &self.email]
            .iter()
            .any(|value| value.to_lowercase().contains(needle))
    }
}

pub fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation(ValidationReq::name_req()));
    }
    Ok(())
}

pub fn phone_is_plausible(phone: &str) -> Result<bool, AppError> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Ok(true);
    }
    let re = PHONE_RE.as_ref().map_err(|e| AppError::Validation(e.to_string()))?;
    Ok(re.is_match(phone))
}

pub fn email_is_plausible(email: &str) -> Result<bool, AppError> {
    let email = email.trim();
    if email.is_empty() {
        return Ok(true);
    }
    let re = EMAIL_RE.as_ref().map_err(|e| AppError::Validation(e.to_string()))?;
    Ok(email.len() <= 254 && re.is_match(email))
}

/// Field replacements for an update. `None` leaves the field untouched,
/// `Some("")` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl ContactPatch {
    pub fn is_empty(&self) -> bool {
        self.entries().all(|(_, value)| value.is_none())
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = Some(trimmed(value));
        match field {
            Field::Name => self.name = value,
            Field::Phone => self.phone = value,
            Field::Email => self.email = value,
            Field::Address => self.address = value,
            Field::Notes => self.notes = value,
        }
    }

    fn entries(&self) -> impl Iterator<Item = (Field, Option<&String>)> {
        [
            (Field::Name, self.name.as_ref()),
            (Field::Phone, self.phone.as_ref()),
            (Field::Email, self.email.as_ref()),
            (Field::Address, self.address.as_ref()),
            (Field::Notes, self.notes.as_ref()),
        ]
        .into_iter()
    }

    /// Applies every specified field, or none of them if the new name is empty.
    pub fn apply(&self, contact: &mut Contact) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }

        for (field, value) in self.entries() {
            if let Some(value) = value {
                *contact.field_mut(field) = value.trim().to_string();
            }
        }
        Ok(())
    }
}

fn trimmed(value: impl Into<String>) -> String {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}
