use std::str::FromStr;

use super::contact::Field;
use crate::errors::AppError;

/// Identifies one contact in the book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// 1-based position in storage order, as printed by the contact list.
    Position(usize),
    /// Exact (trimmed) value of one field.
    Exact { field: Field, value: String },
}

impl Selector {
    pub fn exact(field: Field, value: impl Into<String>) -> Self {
        Selector::Exact {
            field,
            value: value.into().trim().to_string(),
        }
    }
}

/// Menu input: a bare number is a position, `field:value` matches that field
/// (name, phone or email), anything else matches the name.
impl FromStr for Selector {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.is_empty() {
            return Err(AppError::Validation(
                "Enter a position or a name".to_string(),
            ));
        }

        if input.chars().all(|c| c.is_ascii_digit()) {
            return input
                .parse()
                .map(Selector::Position)
                .map_err(|_| AppError::NotFound(format!("Contact at position {input}")));
        }

        if let Some((prefix, value)) = input.split_once(':')
            && let Ok(field) = prefix.parse::<Field>()
            && matches!(field, Field::Name | Field::Phone | Field::Email)
        {
            return Ok(Selector::exact(field, value));
        }

        Ok(Selector::exact(Field::Name, input))
    }
}
