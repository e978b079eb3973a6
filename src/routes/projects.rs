use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Caller;
use crate::db;
use crate::db::projects::{ProjectDraft, ProjectFilter};
use crate::error::AppError;
use crate::media::MediaUrls;
use crate::middleware::audit;
use crate::models::{
    CategoryChoice, Project, ProjectCategory, ProjectDetail, ProjectSummary, RelatedProject, Tag,
    TaggedProject,
};
use crate::related;
use crate::routes::{images, input};
use crate::slug;
use crate::state::SharedState;
use crate::validation::FieldErrors;

const UNIQUE: &[(&str, &str)] = &[("projects_slug_key", "slug")];
const FOREIGN: &[(&str, &str)] = &[("project_tags_tag_id_fkey", "tag_ids")];

#[derive(Deserialize)]
pub struct ListParams {
    pub category: Option<String>,
    pub year: Option<String>,
    pub tags: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectInput {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub category: Option<String>,
    pub year: Option<String>,
    pub description: Option<String>,
    pub full_description: Option<String>,
    pub location: Option<String>,
    pub beneficiaries: Option<String>,
    pub duration: Option<String>,
    pub tag_ids: Option<Vec<Uuid>>,
}

impl ProjectInput {
    fn or_stored(self, stored: TaggedProject) -> Self {
        let TaggedProject { project, tag_ids } = stored;
        Self {
            title: self.title.or(Some(project.title)),
            slug: self.slug.or(Some(project.slug)),
            category: self
                .category
                .or(Some(project.category.as_str().to_string())),
            year: self.year.or(Some(project.year)),
            description: self.description.or(Some(project.description)),
            full_description: self.full_description.or(Some(project.full_description)),
            location: self.location.or(Some(project.location)),
            beneficiaries: self.beneficiaries.or(Some(project.beneficiaries)),
            duration: self.duration.or(Some(project.duration)),
            tag_ids: self.tag_ids.or(Some(tag_ids)),
        }
    }

    fn validate(self) -> Result<ProjectDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = input::text("title", self.title, Some(255), &mut errors);
        let slug = slug::resolve(self.slug.as_deref(), &title);
        if !title.is_empty() || self.slug.is_some() {
            slug::validate("slug", &slug, 255, &mut errors);
        }

        let category = input::choice(
            "category",
            self.category.as_deref(),
            None,
            ProjectCategory::parse,
            &mut errors,
        );
        let year = input::text("year", self.year, Some(20), &mut errors);
        let description = input::text("description", self.description, None, &mut errors);
        let full_description =
            input::text("full_description", self.full_description, None, &mut errors);
        let location = input::text("location", self.location, Some(255), &mut errors);
        let beneficiaries = input::text("beneficiaries", self.beneficiaries, Some(255), &mut errors);
        let duration = input::text("duration", self.duration, Some(100), &mut errors);

        let mut tag_ids = self.tag_ids.unwrap_or_default();
        tag_ids.sort();
        tag_ids.dedup();

        errors.into_result()?;
        Ok(ProjectDraft {
            title,
            slug,
            category: category.unwrap_or(ProjectCategory::Other),
            year,
            description,
            full_description,
            location,
            beneficiaries,
            duration,
            tag_ids,
        })
    }
}

/// Group the tag rows of several projects by project.
fn tags_by_project(rows: Vec<crate::models::ProjectTag>) -> HashMap<Uuid, Vec<Tag>> {
    let mut grouped: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    for row in rows {
        grouped.entry(row.project_id).or_default().push(row.tag);
    }
    grouped
}

async fn first_image_paths(
    state: &SharedState,
    project_ids: &[Uuid],
) -> Result<HashMap<Uuid, String>, AppError> {
    Ok(db::projects::first_images(&state.pool, project_ids)
        .await?
        .into_iter()
        .map(|image| (image.project_id, image.image))
        .collect())
}

async fn summaries(
    state: &SharedState,
    urls: &MediaUrls,
    projects: Vec<Project>,
) -> Result<Vec<ProjectSummary>, AppError> {
    let ids: Vec<Uuid> = projects.iter().map(|p| p.id).collect();
    let mut tags = tags_by_project(db::projects::tags_for(&state.pool, &ids).await?);
    let images = first_image_paths(state, &ids).await?;

    Ok(projects
        .into_iter()
        .map(|project| {
            let image = images.get(&project.id).map(String::as_str);
            let project_tags = tags.remove(&project.id).unwrap_or_default();
            ProjectSummary::new(project, image, project_tags, urls)
        })
        .collect())
}

/// Ranked related projects of `subject`. Backs both the detail view and `/related`.
async fn related_projects(
    state: &SharedState,
    urls: &MediaUrls,
    subject: &TaggedProject,
) -> Result<Vec<RelatedProject>, AppError> {
    let candidates = db::projects::related_candidates(&state.pool, subject).await?;
    let ranked = related::rank(subject, &candidates);

    let ids: Vec<Uuid> = ranked.iter().map(|c| c.project.id).collect();
    let images = first_image_paths(state, &ids).await?;

    Ok(ranked
        .into_iter()
        .map(|c| {
            let image = images.get(&c.project.id).map(String::as_str);
            RelatedProject::new(&c.project, image, urls)
        })
        .collect())
}

async fn find_tagged(state: &SharedState, slug: &str) -> Result<TaggedProject, AppError> {
    db::projects::find_tagged_by_slug(&state.pool, slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))
}

async fn detail(
    state: &SharedState,
    urls: &MediaUrls,
    subject: TaggedProject,
) -> Result<ProjectDetail, AppError> {
    let id = subject.project.id;

    let images = db::project_images::list(&state.pool, Some(id)).await?;
    let partners = db::partners::list_for_project(&state.pool, id).await?;
    let phases = db::project_phases::list(&state.pool, Some(id), None).await?;
    let outcomes = db::project_outcomes::list(&state.pool, Some(id)).await?;
    let tags = db::projects::tags_for(&state.pool, &[id])
        .await?
        .into_iter()
        .map(|row| row.tag)
        .collect();
    let related_projects = related_projects(state, urls, &subject).await?;

    let project = subject.project;
    Ok(ProjectDetail {
        id: project.id,
        title: project.title,
        slug: project.slug,
        category: project.category.label(),
        year: project.year,
        description: project.description,
        full_description: project.full_description,
        location: project.location,
        beneficiaries: project.beneficiaries,
        duration: project.duration,
        images: images.into_iter().map(|image| image.view(urls)).collect(),
        partners,
        phases,
        outcomes,
        related_projects,
        tags,
        created_at: project.created_at,
        updated_at: project.updated_at,
    })
}

pub async fn list(
    State(state): State<SharedState>,
    urls: MediaUrls,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ProjectSummary>>, AppError> {
    let mut errors = FieldErrors::new();
    let category = match input::text_filter(params.category) {
        Some(raw) => input::choice("category", Some(&raw), None, ProjectCategory::parse, &mut errors),
        None => None,
    };
    let filter = ProjectFilter {
        category,
        year: input::text_filter(params.year),
        tag: input::id_filter("tags", params.tags.as_deref(), &mut errors),
        search: params.search,
        ordering: params.ordering,
    };
    errors.into_result()?;

    let projects = db::projects::list(&state.pool, &filter).await?;
    Ok(Json(summaries(&state, &urls, projects).await?))
}

pub async fn get(
    State(state): State<SharedState>,
    urls: MediaUrls,
    Path(slug): Path<String>,
) -> Result<Json<ProjectDetail>, AppError> {
    let subject = find_tagged(&state, &slug).await?;
    Ok(Json(detail(&state, &urls, subject).await?))
}

pub async fn related(
    State(state): State<SharedState>,
    urls: MediaUrls,
    Path(slug): Path<String>,
) -> Result<Json<Vec<RelatedProject>>, AppError> {
    let subject = find_tagged(&state, &slug).await?;
    Ok(Json(related_projects(&state, &urls, &subject).await?))
}

pub async fn categories() -> Json<Vec<CategoryChoice>> {
    Json(ProjectCategory::ALL.into_iter().map(CategoryChoice::from).collect())
}

pub async fn years(State(state): State<SharedState>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(db::projects::years(&state.pool).await?))
}

pub async fn tags(State(state): State<SharedState>) -> Result<Json<Vec<Tag>>, AppError> {
    Ok(Json(db::tags::list(&state.pool, None, None).await?))
}

pub async fn create(
    caller: Caller,
    State(state): State<SharedState>,
    urls: MediaUrls,
    Json(req): Json<ProjectInput>,
) -> Result<(StatusCode, Json<ProjectDetail>), AppError> {
    caller.require_authenticated()?;
    let draft = req.validate()?;

    let project = db::projects::create(&state.pool, &draft)
        .await
        .map_err(|e| AppError::from_write(e, "project", UNIQUE, FOREIGN))?;

    audit::log_event(
        &state.pool,
        &caller,
        "project.created",
        "project",
        Some(project.id),
        Some(serde_json::json!({ "slug": project.slug })),
    )
    .await;

    let subject = find_tagged(&state, &project.slug).await?;
    Ok((StatusCode::CREATED, Json(detail(&state, &urls, subject).await?)))
}

pub async fn replace(
    caller: Caller,
    State(state): State<SharedState>,
    urls: MediaUrls,
    Path(slug): Path<String>,
    Json(req): Json<ProjectInput>,
) -> Result<Json<ProjectDetail>, AppError> {
    caller.require_authenticated()?;
    let stored = find_tagged(&state, &slug).await?;
    store(&state, &caller, &urls, stored.project.id, req.validate()?).await
}

pub async fn update(
    caller: Caller,
    State(state): State<SharedState>,
    urls: MediaUrls,
    Path(slug): Path<String>,
    Json(req): Json<ProjectInput>,
) -> Result<Json<ProjectDetail>, AppError> {
    caller.require_authenticated()?;
    let stored = find_tagged(&state, &slug).await?;
    let id = stored.project.id;
    store(&state, &caller, &urls, id, req.or_stored(stored).validate()?).await
}

async fn store(
    state: &SharedState,
    caller: &Caller,
    urls: &MediaUrls,
    id: Uuid,
    draft: ProjectDraft,
) -> Result<Json<ProjectDetail>, AppError> {
    let project = db::projects::update(&state.pool, id, &draft)
        .await
        .map_err(|e| AppError::from_write(e, "project", UNIQUE, FOREIGN))?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    audit::log_event(
        &state.pool,
        caller,
        "project.updated",
        "project",
        Some(project.id),
        Some(serde_json::json!({ "slug": project.slug })),
    )
    .await;

    let subject = find_tagged(state, &project.slug).await?;
    Ok(Json(detail(state, urls, subject).await?))
}

/// Images, phases and outcomes go with the project.
pub async fn delete(
    caller: Caller,
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, AppError> {
    caller.require_authenticated()?;
    let project = db::projects::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;
    let files = db::project_images::list(&state.pool, Some(project.id)).await?;

    if !db::projects::delete(&state.pool, project.id).await? {
        return Err(AppError::NotFound("Project not found".to_string()));
    }

    for image in files {
        images::release_file(&state, &image.image).await;
    }

    audit::log_event(
        &state.pool,
        &caller,
        "project.deleted",
        "project",
        Some(project.id),
        Some(serde_json::json!({ "slug": project.slug })),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
