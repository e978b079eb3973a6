use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::media::MediaUrls;
use crate::models::{Partner, ProjectImageView, ProjectOutcome, ProjectPhase, Tag};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "text")]
pub enum ProjectCategory {
    Education,
    Health,
    Environment,
    Infrastructure,
    #[sqlx(rename = "Youth Development")]
    #[serde(rename = "Youth Development")]
    YouthDevelopment,
    Other,
}

impl ProjectCategory {
    pub const ALL: [ProjectCategory; 6] = [
        ProjectCategory::Education,
        ProjectCategory::Health,
        ProjectCategory::Environment,
        ProjectCategory::Infrastructure,
        ProjectCategory::YouthDevelopment,
        ProjectCategory::Other,
    ];

    /// Stored value, also the id exposed by `/projects/categories`.
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectCategory::Education => "Education",
            ProjectCategory::Health => "Health",
            ProjectCategory::Environment => "Environment",
            ProjectCategory::Infrastructure => "Infrastructure",
            ProjectCategory::YouthDevelopment => "Youth Development",
            ProjectCategory::Other => "Other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProjectCategory::Education => "Education",
            ProjectCategory::Health => "Health",
            ProjectCategory::Environment => "Environment",
            ProjectCategory::Infrastructure => "Infrastructure",
            ProjectCategory::YouthDevelopment => "Youth Development",
            ProjectCategory::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub category: ProjectCategory,
    pub year: String,
    pub description: String,
    pub full_description: String,
    pub location: String,
    pub beneficiaries: String,
    pub duration: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A project row together with the ids of its tags, the input to related ranking.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TaggedProject {
    #[sqlx(flatten)]
    pub project: Project,
    pub tag_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct CategoryChoice {
    pub id: &'static str,
    pub name: &'static str,
}

impl From<ProjectCategory> for CategoryChoice {
    fn from(category: ProjectCategory) -> Self {
        CategoryChoice {
            id: category.as_str(),
            name: category.label(),
        }
    }
}

/// List representation.
#[derive(Debug, Serialize)]
pub struct ProjectSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub category: &'static str,
    pub description: String,
    pub year: String,
    pub image: Option<String>,
    pub tags: Vec<Tag>,
}

impl ProjectSummary {
    pub fn new(project: Project, first_image: Option<&str>, tags: Vec<Tag>, urls: &MediaUrls) -> Self {
        ProjectSummary {
            id: project.id,
            title: project.title,
            slug: project.slug,
            category: project.category.label(),
            description: project.description,
            year: project.year,
            image: urls.optional(first_image),
            tags,
        }
    }
}

/// Compact entry produced by related ranking.
#[derive(Debug, Clone, Serialize)]
pub struct RelatedProject {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub category: &'static str,
    pub image: Option<String>,
}

impl RelatedProject {
    pub fn new(project: &Project, first_image: Option<&str>, urls: &MediaUrls) -> Self {
        RelatedProject {
            id: project.id,
            title: project.title.clone(),
            slug: project.slug.clone(),
            category: project.category.label(),
            image: urls.optional(first_image),
        }
    }
}

/// Detail representation with every owned collection expanded.
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub category: &'static str,
    pub year: String,
    pub description: String,
    pub full_description: String,
    pub location: String,
    pub beneficiaries: String,
    pub duration: String,
    pub images: Vec<ProjectImageView>,
    pub partners: Vec<Partner>,
    pub phases: Vec<ProjectPhase>,
    pub outcomes: Vec<ProjectOutcome>,
    pub related_projects: Vec<RelatedProject>,
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_codes_round_trip() {
        for category in ProjectCategory::ALL {
            assert_eq!(ProjectCategory::parse(category.as_str()), Some(category));
        }
        assert_eq!(
            ProjectCategory::parse("Youth Development"),
            Some(ProjectCategory::YouthDevelopment)
        );
        assert_eq!(ProjectCategory::parse("youth"), None);
    }

    #[test]
    fn category_choice_uses_label() {
        let choice = CategoryChoice::from(ProjectCategory::YouthDevelopment);
        assert_eq!(choice.id, "Youth Development");
        assert_eq!(choice.name, "Youth Development");
    }
}
