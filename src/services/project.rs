//! Project service: CRUD over the `projects` collection.

use serde::Deserialize;
use serde_json::Value;
use sqlx::PgPool;

use crate::db::documents::{self, Direction, DocumentQuery, PROJECTS};
use crate::errors::AppError;
use crate::models::project::{
    CreateProject, EcosystemType, Project, ProjectStatus, UpdateProject,
};
use crate::models::timestamp::IsoTimestamp;
use crate::models::validation;

/// Filters for listing projects.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFilters {
    pub ecosystem_type: Option<EcosystemType>,
    pub status: Option<ProjectStatus>,
    pub organization_id: Option<String>,
}

/// Serialize a closed enum to the string stored in documents.
fn wire_name<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    match serde_json::to_value(value) {
        Ok(Value::String(s)) => Ok(s),
        Ok(other) => Err(AppError::Internal(format!("expected string enum, got {other}"))),
        Err(e) => Err(AppError::Internal(e.to_string())),
    }
}

/// List projects, newest first.
pub async fn list(pool: &PgPool, filters: &ProjectFilters) -> Result<Vec<Project>, AppError> {
    let mut query = DocumentQuery::new()
        .eq_opt("organizationId", filters.organization_id.as_deref())
        .order_by("createdAt", Direction::Desc);
    if let Some(ecosystem) = &filters.ecosystem_type {
        query = query.eq("ecosystemType", wire_name(ecosystem)?);
    }
    if let Some(status) = &filters.status {
        query = query.eq("status", wire_name(status)?);
    }

    let docs = documents::find(pool, PROJECTS, &query).await?;
    documents::decode_all(docs, PROJECTS)
}

/// Validate and persist a new project.
pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, AppError> {
    validation::check(input)?;
    let project = build(documents::new_id(), input, IsoTimestamp::now())?;

    let mut body = serde_json::to_value(&project).map_err(|e| AppError::Internal(e.to_string()))?;
    if let Value::Object(ref mut map) = body {
        map.remove("id");
    }
    documents::insert(pool, PROJECTS, &project.id, &body).await?;

    tracing::info!(project_id = %project.id, organization_id = %project.organization_id, "Project created");
    Ok(project)
}

/// Assemble a stored project from validated input.
fn build(id: String, input: &CreateProject, now: IsoTimestamp) -> Result<Project, AppError> {
    let (Some(name), Some(location), Some(ecosystem_type), Some(area), Some(organization_id)) = (
        input.name.clone(),
        input.location.clone(),
        input.ecosystem_type,
        input.area,
        input.organization_id.clone(),
    ) else {
        return Err(AppError::Validation("Incomplete project".to_string()));
    };

    Ok(Project {
        id,
        name: name.trim().to_string(),
        description: input.description.clone().unwrap_or_default(),
        location,
        ecosystem_type,
        area,
        carbon_stock: input.carbon_stock.unwrap_or(0.0),
        sequestration_rate: input.sequestration_rate.unwrap_or(0.0),
        status: input.status.unwrap_or(ProjectStatus::Planning),
        start_date: input.start_date.clone().unwrap_or_default(),
        end_date: input.end_date.clone(),
        organization_id,
        manager_id: input.manager_id.clone().unwrap_or_default(),
        team_members: input.team_members.clone().unwrap_or_default(),
        stakeholders: input.stakeholders.clone().unwrap_or_default(),
        created_at: now.clone(),
        updated_at: now,
        images: input.images.clone(),
        documents: input.documents.clone(),
        tags: input.tags.clone(),
    })
}

/// Find a project by id.
pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Project, AppError> {
    documents::get(pool, PROJECTS, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?
        .decode(PROJECTS)
}

/// Apply a partial update. Returns `{id, ...updates, updatedAt}`.
pub async fn update(pool: &PgPool, id: &str, input: &UpdateProject) -> Result<Value, AppError> {
    validation::check(input)?;

    let mut patch = serde_json::to_value(input).map_err(|e| AppError::Internal(e.to_string()))?;
    if let Value::Object(ref mut map) = patch {
        map.insert(
            "updatedAt".to_string(),
            Value::String(IsoTimestamp::now().to_string()),
        );
    }

    if !documents::merge(pool, PROJECTS, id, &patch).await? {
        return Err(AppError::NotFound("Project not found".to_string()));
    }

    if let Value::Object(ref mut map) = patch {
        map.insert("id".to_string(), Value::String(id.to_string()));
    }
    tracing::info!(project_id = %id, "Project updated");
    Ok(patch)
}

/// Delete a project. Monitoring records that reference it are left in place.
pub async fn delete(pool: &PgPool, id: &str) -> Result<(), AppError> {
    if !documents::delete(pool, PROJECTS, id).await? {
        return Err(AppError::NotFound("Project not found".to_string()));
    }
    tracing::info!(project_id = %id, "Project deleted");
    Ok(())
}
