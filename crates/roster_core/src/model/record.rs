//! Student record and its field validator.
//!
//! # Responsibility
//! - Define the four-field record persisted by the roster.
//! - Validate raw form input in a fixed order with one reason per failure.
//!
//! # Invariants
//! - Checks run in order: required, name, id, email, contact.
//! - The first failing check decides the reported reason.
//! - Successful validation returns every field trimmed.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MIN_CONTACT_DIGITS: usize = 10;

/// One validated student record.
///
/// Serialized as `{"name","id","email","contact"}` to keep the stored blob
/// readable by earlier web builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    /// Opaque numeric string; not unique.
    pub id: String,
    pub email: String,
    /// At least ten digits, no maximum.
    pub contact: String,
}

impl Record {
    /// Re-runs the validator against already stored values.
    ///
    /// Stored values must already be trimmed: a field that only passes
    /// after trimming is reported as invalid for that field.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        let trimmed = validate(&self.name, &self.id, &self.email, &self.contact)?;
        let fields = [
            (&trimmed.name, &self.name, RecordValidationError::InvalidName),
            (&trimmed.id, &self.id, RecordValidationError::InvalidId),
            (&trimmed.email, &self.email, RecordValidationError::InvalidEmail),
            (&trimmed.contact, &self.contact, RecordValidationError::InvalidContact),
        ];
        let result = match fields.into_iter().find(|(clean, raw, _)| clean != raw) {
            Some((_, _, err)) => Err(err),
            None => Ok(()),
        };
        result
    }
}

impl From<&Record> for RecordInput {
    fn from(record: &Record) -> Self {
        Self {
            name: record.name.clone(),
            id: record.id.clone(),
            email: record.email.clone(),
            contact: record.contact.clone(),
        }
    }
}

/// Raw, untrimmed form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordInput {
    pub name: String,
    pub id: String,
    pub email: String,
    pub contact: String,
}

impl RecordInput {
    pub fn new(
        name: impl Into<String>,
        id: impl Into<String>,
        email: impl Into<String>,
        contact: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            email: email.into(),
            contact: contact.into(),
        }
    }

    /// Runs the validator over this input.
    pub fn validate(&self) -> Result<Record, RecordValidationError> {
        validate(&self.name, &self.id, &self.email, &self.contact)
    }

    pub fn is_blank(&self) -> bool {
        [&self.name, &self.id, &self.email, &self.contact]
            .iter()
            .all(|value| value.is_empty())
    }
}

/// Why a record was rejected. `Display` yields the user-facing reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordValidationError {
    MissingField,
    InvalidName,
    InvalidId,
    InvalidEmail,
    InvalidContact,
}

impl RecordValidationError {
    /// Short reason written to the form's error slot.
    pub fn reason(self) -> &'static str {
        match self {
            Self::MissingField => "all fields required",
            Self::InvalidName => "name must be letters/spaces only",
            Self::InvalidId => "id must be numeric",
            Self::InvalidEmail => "invalid email",
            Self::InvalidContact => "contact must be numeric, length ≥ 10",
        }
    }
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.reason())
    }
}

impl Error for RecordValidationError {}

/// Validates four raw field values and returns the trimmed record.
pub fn validate(
    name: &str,
    id: &str,
    email: &str,
    contact: &str,
) -> Result<Record, RecordValidationError> {
    let (name, id, email, contact) = (name.trim(), id.trim(), email.trim(), contact.trim());

    if [name, id, email, contact].iter().any(|value| value.is_empty()) {
        return Err(RecordValidationError::MissingField);
    }
    if !is_valid_name(name) {
        return Err(RecordValidationError::InvalidName);
    }
    if !is_valid_id(id) {
        return Err(RecordValidationError::InvalidId);
    }
    if !is_valid_email(email) {
        return Err(RecordValidationError::InvalidEmail);
    }
    if !is_valid_contact(contact) {
        return Err(RecordValidationError::InvalidContact);
    }

    Ok(Record {
        name: name.to_string(),
        id: id.to_string(),
        email: email.to_string(),
        contact: contact.to_string(),
    })
}

/// Non-empty, ASCII letters and whitespace only.
pub fn is_valid_name(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c.is_whitespace())
}

/// Non-empty, ASCII digits only.
pub fn is_valid_id(value: &str) -> bool {
    is_ascii_digits(value)
}

/// `local@domain.tld`: one `@`, no whitespace, and a `.` inside the domain
/// part with at least one character on each side.
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(pos, c)| c == '.' && pos > 0 && pos + 1 < domain.len())
}

/// ASCII digits only, at least ten of them.
pub fn is_valid_contact(value: &str) -> bool {
    is_ascii_digits(value) && value.len() >= MIN_CONTACT_DIGITS
}

fn is_ascii_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}
