pub mod audit;
pub mod contacts;
pub mod faqs;
pub mod listing;
pub mod partners;
pub mod project_images;
pub mod project_outcomes;
pub mod project_phases;
pub mod projects;
pub mod refresh_tokens;
pub mod tags;
pub mod team_members;
pub mod testimonials;
pub mod users;

/// Which rows a caller may see.
///
/// Derived from the caller on every request, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Only the publicly relevant subset (active, featured, published).
    Public,
    All,
}

impl Visibility {
    /// Extra WHERE fragment restricting to public rows, given the flag column.
    pub fn clause(self, flag_column: &str) -> String {
        match self {
            Visibility::Public => format!(" AND {flag_column} = TRUE"),
            Visibility::All => String::new(),
        }
    }
}
