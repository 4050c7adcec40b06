//! Field-level validation error collection.
//!
//! Services validate every field of a request before failing so clients see
//! all problems at once. Errors render into the `details` payload of an
//! [`Error`] as `{"fields": {"<name>": ["<message>", ...]}}`.

use std::collections::BTreeMap;

use serde_json::{Value, json};

use super::Error;

/// Ordered collection of messages keyed by request field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    /// Start an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against `field`.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    /// Keep the `Ok` value, or record the error message against `field`.
    pub fn check<T, E: std::fmt::Display>(
        &mut self,
        field: &'static str,
        result: Result<T, E>,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.push(field, err.to_string());
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// JSON object mapping each field to its messages.
    pub fn to_value(&self) -> Value {
        json!(self.0)
    }

    /// Convert into an `invalid_request` error, or `Ok(())` when empty.
    pub fn into_result(self, message: &str) -> Result<(), Error> {
        if self.is_empty() {
            return Ok(());
        }
        Err(Error::invalid_request(message).with_details(json!({ "fields": self.to_value() })))
    }
}
