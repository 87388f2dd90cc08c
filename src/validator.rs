//! Validation accumulator
//!
//! Request types check every rule against a [`Validator`] instead of
//! stopping at the first failure, then turn what was collected into a single
//! [`Error::Validation`] with [`Validator::finish`].

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Implemented by every request type before it is dispatched.
///
/// Validation may normalize the request in place (whitespace trimming), and
/// the normalized fields stay visible to the caller whether or not the call
/// succeeds.
pub trait Validate {
    fn validate(&mut self) -> Result<()>;
}

/// A single failed rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Every rule that failed for one request, in the order they were checked
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages reported against a given field
    pub fn field(&self, field: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.message.as_str()).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` against `field` unless `ok` holds.
    ///
    /// Returns `ok`, so dependent rules can be gated on it.
    pub fn must(&mut self, ok: bool, field: &'static str, message: impl Into<String>) -> bool {
        if !ok {
            self.errors.push(FieldError {
                field,
                message: message.into(),
            });
        }
        ok
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok(())` if no rule failed, otherwise every failure as one error
    pub fn finish(self) -> Result<()> {
        if self.errors.is_empty() {
            return Ok(());
        }
        Err(Error::Validation(ValidationErrors(self.errors)))
    }
}

/// Character count, as opposed to byte length
pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Trim surrounding whitespace in place, reusing the allocation when nothing changes
pub(crate) fn trim_in_place(s: &mut String) {
    let trimmed = s.trim();
    if trimmed.len() != s.len() {
        *s = trimmed.to_string();
    }
}
