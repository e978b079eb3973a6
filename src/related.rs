//! Related-project ranking.
//!
//! Candidates sharing both the subject's category and at least one tag come
//! first, then those sharing only a tag, then those sharing only the category.
//! Within a group the candidates keep the order they were supplied in. The
//! result never contains the subject and never exceeds [`MAX_RELATED`] entries.

use std::collections::HashSet;

use uuid::Uuid;

use crate::models::{ProjectCategory, TaggedProject};

pub const MAX_RELATED: usize = 5;

/// Anything that can be ranked for relatedness.
pub trait Relatable {
    fn id(&self) -> Uuid;
    fn category(&self) -> ProjectCategory;
    fn tag_ids(&self) -> &[Uuid];
}

impl Relatable for TaggedProject {
    fn id(&self) -> Uuid {
        self.project.id
    }

    fn category(&self) -> ProjectCategory {
        self.project.category
    }

    fn tag_ids(&self) -> &[Uuid] {
        &self.tag_ids
    }
}

pub fn rank<'a, S, C>(subject: &S, candidates: &'a [C]) -> Vec<&'a C>
where
    S: Relatable + ?Sized,
    C: Relatable,
{
    let subject_tags: HashSet<Uuid> = subject.tag_ids().iter().copied().collect();

    let mut both = Vec::new();
    let mut tag_only = Vec::new();
    let mut category_only = Vec::new();

    for candidate in candidates.iter().filter(|c| c.id() != subject.id()) {
        let same_category = candidate.category() == subject.category();
        let shares_tag = candidate
            .tag_ids()
            .iter()
            .any(|tag| subject_tags.contains(tag));

        match (same_category, shares_tag) {
            (true, true) => both.push(candidate),
            (false, true) => tag_only.push(candidate),
            (true, false) => category_only.push(candidate),
            (false, false) => {}
        }
    }

    let mut seen = HashSet::new();
    both.into_iter()
        .chain(tag_only)
        .chain(category_only)
        .filter(|candidate| seen.insert(candidate.id()))
        .take(MAX_RELATED)
        .collect()
}
