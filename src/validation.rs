use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+?1?\d{9,15}$").unwrap());

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^https?://[^\s/$.?#].\S*$").unwrap());

/// Per-field validation messages, keyed by the JSON field name.
#[derive(Debug, Default, Clone, Serialize, PartialEq)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    pub fn required(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, "This field may not be blank.");
        }
    }

    pub fn max_len(&mut self, field: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.add(
                field,
                format!("Ensure this field has no more than {max} characters."),
            );
        }
    }

    pub fn non_negative(&mut self, field: &str, value: i32) {
        if value < 0 {
            self.add(field, "Ensure this value is greater than or equal to 0.");
        }
    }

    pub fn email(&mut self, field: &str, value: &str) {
        if !is_valid_email(value) {
            self.add(field, "Enter a valid email address.");
        }
    }

    /// Blank is accepted; anything else must look like an E.164-ish number.
    pub fn phone(&mut self, field: &str, value: &str) {
        if !value.is_empty() && !is_valid_phone(value) {
            self.add(
                field,
                "Phone number must be entered in the format: '+999999999'. Up to 15 digits allowed.",
            );
        }
    }

    pub fn url(&mut self, field: &str, value: &str) {
        if !URL_RE.is_match(value) {
            self.add(field, "Enter a valid URL.");
        }
    }
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_RE.is_match(value)
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}
