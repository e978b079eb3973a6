use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::validation::FieldErrors;

static UNSLUGGABLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s-]").unwrap());
static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-\s]+").unwrap());

/// Fold accents to ASCII, drop punctuation, then join words with single hyphens.
/// Underscores survive inside the slug but not at its ends.
pub fn slugify(name: &str) -> String {
    let ascii: String = name.nfkd().filter(char::is_ascii).collect();
    let lowered = ascii.to_lowercase();
    let kept = UNSLUGGABLE_RE.replace_all(&lowered, "");
    SEPARATOR_RE
        .replace_all(&kept, "-")
        .trim_matches(|c| c == '-' || c == '_')
        .to_string()
}

/// Use the explicit slug when one was given, otherwise derive it from `source`.
pub fn resolve(explicit: Option<&str>, source: &str) -> String {
    match explicit.map(str::trim) {
        Some(slug) if !slug.is_empty() => slug.to_string(),
        _ => slugify(source),
    }
}

pub fn validate(field: &str, slug: &str, max: usize, errors: &mut FieldErrors) {
    if slug.is_empty() {
        errors.add(field, "This field may not be blank.");
        return;
    }
    errors.max_len(field, slug, max);
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        errors.add(
            field,
            "Enter a valid slug consisting of lowercase letters, numbers, underscores or hyphens.",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Clean Water"), "clean-water");
        assert_eq!(slugify("  Youth -- Development!  "), "youth-development");
        assert_eq!(slugify("2024: Wells & Pumps"), "2024-wells-pumps");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn slugify_drops_punctuation_instead_of_splitting() {
        assert_eq!(slugify("Women's Health"), "womens-health");
        assert_eq!(slugify("Wells & Pumps (Phase 2)"), "wells-pumps-phase-2");
        assert_eq!(slugify("snake_case name"), "snake_case-name");
        assert_eq!(slugify("_edge_"), "edge");
    }

    #[test]
    fn slugify_folds_accents() {
        assert_eq!(slugify("Café Project"), "cafe-project");
        assert_eq!(slugify("Crèche à Nyéri"), "creche-a-nyeri");
        assert_eq!(slugify("ﬁeld ½"), "field-12");
    }

    #[test]
    fn explicit_slug_wins() {
        assert_eq!(resolve(Some("custom"), "Clean Water"), "custom");
        assert_eq!(resolve(Some("  "), "Clean Water"), "clean-water");
        assert_eq!(resolve(None, "Clean Water"), "clean-water");
    }

    #[test]
    fn invalid_slugs_are_reported() {
        let mut errors = FieldErrors::new();
        validate("slug", "Not-Valid", 100, &mut errors);
        validate("other", "", 100, &mut errors);
        assert!(errors.get("slug").is_some());
        assert!(errors.get("other").is_some());

        let mut ok = FieldErrors::new();
        validate("slug", "clean-water-2", 100, &mut ok);
        validate("slug", "clean_water", 100, &mut ok);
        assert!(ok.is_empty());
    }
}
