use crate::entities::task;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveEnum, Iterable};
use serde::{Deserialize, Deserializer};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

pub mod api;
pub mod filter;
pub mod mutation;
pub mod pagination;
pub mod query;
pub mod search;
pub mod sort;

pub use crate::entities::task::TaskStatus;

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct Task {
    id: Uuid,
    title: String,
    status: TaskStatus,
    content: Option<String>,
    time_start: Option<DateTime<Utc>>,
    time_finish: Option<DateTime<Utc>>,
    deleted: bool,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn time_start(&self) -> Option<DateTime<Utc>> {
        self.time_start
    }

    pub fn time_finish(&self) -> Option<DateTime<Utc>> {
        self.time_finish
    }

    /// Whether the task has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// When the task was soft-deleted. Set if and only if [`Task::is_deleted`].
    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl From<task::Model> for Task {
    fn from(model: task::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            status: model.status,
            content: model.content,
            time_start: model.time_start,
            time_finish: model.time_finish,
            deleted: model.deleted,
            deleted_at: model.deleted_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl FromStr for TaskStatus {
    type Err = TaskServiceError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        TaskStatus::iter()
            .find(|status| status.to_value() == raw)
            .ok_or_else(|| TaskServiceError::Validation(format!("Unknown status '{raw}'")))
    }
}

/// Error type for task query and mutation operations.
#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    /// Malformed or missing payload fields, or an invalid enum value.
    #[error("Validation failed: {0}")]
    Validation(String),
    /// The id does not resolve to a visible task.
    #[error("Task with ID {0} not found")]
    NotFound(Uuid),
    /// Unrecognized bulk operation key.
    #[error("Unknown bulk operation {0}")]
    InvalidOperation(String),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Body of a create request.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskPayload {
    /// Required, must not be blank
    pub title: Option<String>,
    /// Defaults to `initial`
    pub status: Option<TaskStatus>,
    pub content: Option<String>,
    pub time_start: Option<DateTime<Utc>>,
    pub time_finish: Option<DateTime<Utc>>,
}

impl CreateTaskPayload {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Returns the trimmed title, rejecting a missing or blank one.
    pub fn validated_title(&self) -> Result<String, TaskServiceError> {
        require_title(self.title.as_deref())
    }
}

/// Body of an edit request. Absent fields are left unchanged.
///
/// The nullable fields are doubly optional: `None` when absent, `Some(None)`
/// when sent as `null` to clear the stored value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditTaskPayload {
    pub title: Option<String>,
    pub status: Option<TaskStatus>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub content: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub time_start: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub time_finish: Option<Option<DateTime<Utc>>>,
}

/// Marks a field that appeared in the body, even as `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl EditTaskPayload {
    pub fn validated_title(&self) -> Result<Option<String>, TaskServiceError> {
        self.title
            .as_deref()
            .map(|title| require_title(Some(title)))
            .transpose()
    }
}

fn require_title(title: Option<&str>) -> Result<String, TaskServiceError> {
    match title.map(str::trim) {
        Some(title) if !title.is_empty() => Ok(title.to_string()),
        _ => Err(TaskServiceError::Validation(
            "Title is required".to_string(),
        )),
    }
}
