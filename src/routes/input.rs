//! Turning loosely-typed write bodies into validated column values.
//!
//! Write bodies carry every field as `Option`. A full write (POST/PUT) runs the
//! body through the checks as-is; a partial write (PATCH) first fills the gaps
//! from the stored record and then runs the same checks.

use uuid::Uuid;

use crate::db::listing;
use crate::media;
use crate::validation::FieldErrors;

pub const FIELD_REQUIRED: &str = "This field is required.";

/// Required, non-blank text. Surrounding whitespace is dropped.
pub fn text(field: &str, value: Option<String>, max: Option<usize>, errors: &mut FieldErrors) -> String {
    let Some(value) = value else {
        errors.add(field, FIELD_REQUIRED);
        return String::new();
    };
    let value = value.trim().to_string();
    errors.required(field, &value);
    if let Some(max) = max {
        errors.max_len(field, &value, max);
    }
    value
}

/// Optional text that defaults to blank.
pub fn blank_ok(field: &str, value: Option<String>, max: Option<usize>, errors: &mut FieldErrors) -> String {
    let value = value.map(|v| v.trim().to_string()).unwrap_or_default();
    if let Some(max) = max {
        errors.max_len(field, &value, max);
    }
    value
}

/// Nullable text; blank clears it.
pub fn nullable(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Display order, zero unless given.
pub fn order(field: &str, value: Option<i32>, errors: &mut FieldErrors) -> i32 {
    let value = value.unwrap_or(0);
    errors.non_negative(field, value);
    value
}

/// Stored media path: relative, under a media folder, with an image extension.
pub fn image_path(field: &str, value: Option<String>, errors: &mut FieldErrors) -> Option<String> {
    let path = nullable(value)?;
    if !media::is_media_path(&path) {
        errors.add(
            field,
            "Enter a media path inside team/, testimonials/ or project_images/.",
        );
    } else if !media::is_image_name(&path) {
        errors.add(
            field,
            "Upload a valid image. The file you uploaded was either not an image or a corrupted image.",
        );
    }
    Some(path)
}

/// Required reference to another row.
pub fn reference(field: &str, value: Option<Uuid>, errors: &mut FieldErrors) -> Uuid {
    match value {
        Some(id) => id,
        None => {
            errors.add(field, FIELD_REQUIRED);
            Uuid::nil()
        }
    }
}

/// Parse a closed choice, reporting the offending raw value.
pub fn choice<T>(
    field: &str,
    value: Option<&str>,
    default: Option<T>,
    parse: impl Fn(&str) -> Option<T>,
    errors: &mut FieldErrors,
) -> Option<T> {
    match value {
        Some(raw) => {
            let parsed = parse(raw);
            if parsed.is_none() {
                errors.add(field, format!("\"{raw}\" is not a valid choice."));
            }
            parsed
        }
        None => {
            if default.is_none() {
                errors.add(field, FIELD_REQUIRED);
            }
            default
        }
    }
}

/// Optional id filter from the query string.
pub fn id_filter(field: &str, raw: Option<&str>, errors: &mut FieldErrors) -> Option<Uuid> {
    let raw = raw.filter(|r| !r.is_empty())?;
    match raw.parse() {
        Ok(id) => Some(id),
        Err(_) => {
            errors.add(field, "Select a valid choice. That choice is not one of the available choices.");
            None
        }
    }
}

/// Boolean filter from the query string.
pub fn flag_filter(field: &str, raw: Option<&str>, errors: &mut FieldErrors) -> Option<bool> {
    listing::parse_flag(field, raw, errors)
}

/// Text filter from the query string; blank means "no filter".
pub fn text_filter(raw: Option<String>) -> Option<String> {
    raw.filter(|r| !r.is_empty())
}
