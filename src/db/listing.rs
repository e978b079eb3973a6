//! Shared pieces of list queries: free-text search and `ordering=` handling.
//!
//! Column names only ever come from the static whitelists passed in here,
//! user input is always bound.

use sqlx::{Postgres, QueryBuilder};

use crate::validation::FieldErrors;

/// Translate `ordering=-created_at,name` into an ORDER BY clause.
///
/// `allowed` maps public field names to columns. Unknown fields are skipped;
/// when nothing usable remains `default` is used. `id` is always appended as
/// the final tie-breaker.
pub fn order_by(raw: Option<&str>, allowed: &[(&str, &str)], default: &str) -> String {
    let mut terms = Vec::new();

    for part in raw.unwrap_or_default().split(',').map(str::trim) {
        let (field, direction) = match part.strip_prefix('-') {
            Some(field) => (field, "DESC"),
            None => (part, "ASC"),
        };
        if let Some((_, column)) = allowed.iter().find(|(name, _)| *name == field) {
            terms.push(format!("{column} {direction}"));
        }
    }

    if terms.is_empty() {
        format!(" ORDER BY {default}, id ASC")
    } else {
        format!(" ORDER BY {}, id ASC", terms.join(", "))
    }
}

/// Every whitespace-separated term must match at least one of `columns`.
pub fn push_search(query: &mut QueryBuilder<'_, Postgres>, columns: &[&str], raw: Option<&str>) {
    let Some(raw) = raw else {
        return;
    };

    for term in raw.split_whitespace() {
        let pattern = format!("%{}%", escape_like(term));
        query.push(" AND (");
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                query.push(" OR ");
            }
            query.push(format!("{column} ILIKE "));
            query.push_bind(pattern.clone());
        }
        query.push(")");
    }
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Boolean query parameters accept `true/false/1/0`.
pub fn parse_flag(field: &str, raw: Option<&str>, errors: &mut FieldErrors) -> Option<bool> {
    match raw?.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        "" => None,
        _ => {
            errors.add(field, "Enter a valid boolean.");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[(&str, &str)] = &[("order", "display_order"), ("name", "name")];

    #[test]
    fn default_ordering_when_absent() {
        assert_eq!(
            order_by(None, FIELDS, "display_order ASC, name ASC"),
            " ORDER BY display_order ASC, name ASC, id ASC"
        );
    }

    #[test]
    fn descending_prefix_and_multiple_fields() {
        assert_eq!(
            order_by(Some("-order,name"), FIELDS, "name ASC"),
            " ORDER BY display_order DESC, name ASC, id ASC"
        );
    }

    #[test]
    fn unknown_fields_are_ignored() {
        assert_eq!(
            order_by(Some("password_hash; DROP TABLE"), FIELDS, "name ASC"),
            " ORDER BY name ASC, id ASC"
        );
        assert_eq!(
            order_by(Some("bogus,-name"), FIELDS, "display_order ASC"),
            " ORDER BY name DESC, id ASC"
        );
    }

    #[test]
    fn search_terms_are_anded() {
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM t WHERE 1=1");
        push_search(&mut query, &["name", "bio"], Some("clean  water"));
        assert_eq!(
            query.sql(),
            "SELECT * FROM t WHERE 1=1 AND (name ILIKE $1 OR bio ILIKE $2) AND (name ILIKE $3 OR bio ILIKE $4)"
        );
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("100%_off"), "100\\%\\_off");
    }

    #[test]
    fn flags() {
        let mut errors = FieldErrors::new();
        assert_eq!(parse_flag("a", Some("1"), &mut errors), Some(true));
        assert_eq!(parse_flag("a", Some("False"), &mut errors), Some(false));
        assert_eq!(parse_flag("a", None, &mut errors), None);
        assert!(errors.is_empty());
        assert_eq!(parse_flag("a", Some("maybe"), &mut errors), None);
        assert!(errors.get("a").is_some());
    }
}
