use crate::clock::{Clock, SystemClock};
use crate::task::mutation::{BulkOperation, TaskMutationService};
use crate::task::pagination::Paginator;
use crate::task::query::{ListTasksQuery, TaskQueryService};
use crate::task::{CreateTaskPayload, EditTaskPayload, Task, TaskServiceError, TaskStatus};
use axum::{
    Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, patch, post},
};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// Shared state of the task routes.
#[derive(Clone)]
pub struct TaskState {
    pub db: Arc<DatabaseConnection>,
    pub paginator: Paginator,
    pub clock: Arc<dyn Clock>,
}

impl TaskState {
    pub fn new(db: Arc<DatabaseConnection>, paginator: Paginator) -> Self {
        Self {
            db,
            paginator,
            clock: Arc::new(SystemClock),
        }
    }

    fn query_service(&self) -> TaskQueryService<'_> {
        TaskQueryService::with_paginator(&self.db, self.paginator)
    }

    fn mutation_service(&self) -> TaskMutationService<'_> {
        TaskMutationService::with_clock(&self.db, self.clock.clone())
    }
}

/// JSON representation of a Task for API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskJson {
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

impl From<Task> for TaskJson {
    fn from(task: Task) -> Self {
        Self {
            id: task.id(),
            title: task.title().to_string(),
            status: task.status(),
            content: task.content().map(str::to_string),
            time_start: task.time_start(),
            time_finish: task.time_finish(),
            deleted: task.is_deleted(),
            deleted_at: task.deleted_at(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

/// API response for listing tasks.
#[derive(Debug, Serialize, ToSchema)]
pub struct TasksResponse {
    /// Number of tasks matching the filter across all pages
    total: u64,
    /// Tasks on the requested page
    tasks: Vec<TaskJson>,
}

/// Outcome of a mutation, successful or not.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse {
    /// Mirrors the HTTP status code
    code: u16,
    message: String,
}

impl ApiResponse {
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code: code.as_u16(),
            message: message.into(),
        }
    }

    fn ok(message: &str) -> Json<Self> {
        Json(Self::new(StatusCode::OK, message))
    }
}

/// API response for a created task.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse {
    code: u16,
    message: String,
    data: TaskJson,
}

/// Body of a change-status request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangeStatusPayload {
    /// One of `initial`, `doing`, `finish`, `pending`, `notFinish`
    status: Option<String>,
}

/// Body of a change-multi request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangeMultiPayload {
    /// IDs of the tasks to change
    #[serde(default)]
    ids: Vec<String>,
    /// `status` or `delete`
    key: String,
    /// New status when `key` is `status`
    #[serde(default)]
    value: Option<serde_json::Value>,
}

impl IntoResponse for TaskServiceError {
    fn into_response(self) -> Response {
        let (status_code, message) = match &self {
            TaskServiceError::Database(err) => {
                tracing::error!("Task operation failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred while processing your request. Please try again later."
                        .to_string(),
                )
            }
            TaskServiceError::Validation(_)
            | TaskServiceError::NotFound(_)
            | TaskServiceError::InvalidOperation(_) => {
                tracing::warn!("Rejected task request: {}", self);
                (StatusCode::BAD_REQUEST, self.to_string())
            }
        };
        (status_code, Json(ApiResponse::new(status_code, message))).into_response()
    }
}

fn parse_id(raw: &str) -> Result<Uuid, TaskServiceError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| TaskServiceError::Validation(format!("Invalid task ID '{raw}'")))
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, TaskServiceError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| TaskServiceError::Validation(rejection.body_text()))
}

/// Handler for GET /api/v1/tasks - Returns one page of visible tasks.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/v1/tasks",
    params(ListTasksQuery),
    responses(
        (status = 200, description = "Successfully retrieved tasks", body = TasksResponse),
        (status = 400, description = "Unknown status or sort field", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    ),
    tag = "Tasks"
)]
pub async fn list_tasks_handler(
    State(state): State<Arc<TaskState>>,
    Query(query): Query<ListTasksQuery>,
) -> Result<Json<TasksResponse>, TaskServiceError> {
    let page = state.query_service().list(&query).await?;
    Ok(Json(TasksResponse {
        total: page.total,
        tasks: page.tasks.into_iter().map(TaskJson::from).collect(),
    }))
}

/// Handler for GET /api/v1/tasks/detail/{id} - Returns the task or `null`.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/v1/tasks/detail/{id}",
    params(("id" = String, Path, description = "Task ID")),
    responses(
        (status = 200, description = "The task, or null when it does not exist", body = TaskJson),
        (status = 500, description = "Internal server error", body = ApiResponse)
    ),
    tag = "Tasks"
)]
pub async fn task_detail_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<String>,
) -> Result<Json<Option<TaskJson>>, TaskServiceError> {
    let Ok(id) = parse_id(&id) else {
        return Ok(Json(None));
    };
    let task = state.query_service().detail(id).await?;
    Ok(Json(task.map(TaskJson::from)))
}

/// Handler for POST /api/v1/tasks/create - Creates a task.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    post,
    path = "/api/v1/tasks/create",
    request_body = CreateTaskPayload,
    responses(
        (status = 200, description = "Task created", body = CreatedResponse),
        (status = 400, description = "Missing title or malformed body", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    ),
    tag = "Tasks"
)]
pub async fn create_task_handler(
    State(state): State<Arc<TaskState>>,
    payload: Result<Json<CreateTaskPayload>, JsonRejection>,
) -> Result<Json<CreatedResponse>, TaskServiceError> {
    let task = state.mutation_service().create(json_body(payload)?).await?;
    Ok(Json(CreatedResponse {
        code: StatusCode::OK.as_u16(),
        message: "Created successfully".to_string(),
        data: TaskJson::from(task),
    }))
}

/// Handler for PATCH /api/v1/tasks/edit/{id} - Applies a partial update.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    patch,
    path = "/api/v1/tasks/edit/{id}",
    params(("id" = String, Path, description = "Task ID")),
    request_body = EditTaskPayload,
    responses(
        (status = 200, description = "Task updated", body = ApiResponse),
        (status = 400, description = "Unknown task or invalid payload", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    ),
    tag = "Tasks"
)]
pub async fn edit_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<String>,
    payload: Result<Json<EditTaskPayload>, JsonRejection>,
) -> Result<Json<ApiResponse>, TaskServiceError> {
    let id = parse_id(&id)?;
    state.mutation_service().edit(id, json_body(payload)?).await?;
    Ok(ApiResponse::ok("Updated successfully"))
}

/// Handler for PATCH /api/v1/tasks/change-status/{id} - Changes the status of one task.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    patch,
    path = "/api/v1/tasks/change-status/{id}",
    params(("id" = String, Path, description = "Task ID")),
    request_body = ChangeStatusPayload,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse),
        (status = 400, description = "Unknown task or invalid status", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    ),
    tag = "Tasks"
)]
pub async fn change_status_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<String>,
    payload: Result<Json<ChangeStatusPayload>, JsonRejection>,
) -> Result<Json<ApiResponse>, TaskServiceError> {
    let id = parse_id(&id)?;
    let status: TaskStatus = json_body(payload)?
        .status
        .ok_or_else(|| TaskServiceError::Validation("A status value is required".to_string()))?
        .parse()?;
    state.mutation_service().change_status(id, status).await?;
    Ok(ApiResponse::ok("Status updated successfully"))
}

/// Handler for PATCH /api/v1/tasks/change-multi - Changes status of, or deletes, many tasks.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    patch,
    path = "/api/v1/tasks/change-multi",
    request_body = ChangeMultiPayload,
    responses(
        (status = 200, description = "Tasks updated", body = ApiResponse),
        (status = 400, description = "Unknown operation or invalid payload", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    ),
    tag = "Tasks"
)]
pub async fn change_multi_handler(
    State(state): State<Arc<TaskState>>,
    payload: Result<Json<ChangeMultiPayload>, JsonRejection>,
) -> Result<Json<ApiResponse>, TaskServiceError> {
    let payload = json_body(payload)?;
    let operation = BulkOperation::parse(
        &payload.key,
        payload.value.as_ref().and_then(serde_json::Value::as_str),
    )?;
    let ids = payload
        .ids
        .iter()
        .map(String::as_str)
        .map(parse_id)
        .collect::<Result<Vec<_>, _>>()?;

    state.mutation_service().change_multi(&ids, operation).await?;
    let message = match operation {
        BulkOperation::Status(_) => "Status updated successfully",
        BulkOperation::Delete => "Deleted successfully",
    };
    Ok(ApiResponse::ok(message))
}

/// Handler for DELETE /api/v1/tasks/delete/{id} - Soft-deletes one task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/api/v1/tasks/delete/{id}",
    params(("id" = String, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task deleted", body = ApiResponse),
        (status = 400, description = "Unknown task", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    ),
    tag = "Tasks"
)]
pub async fn delete_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse>, TaskServiceError> {
    let id = parse_id(&id)?;
    state.mutation_service().soft_delete(id).await?;
    Ok(ApiResponse::ok("Deleted successfully"))
}

/// Creates and returns the tasks API router.
pub fn create_api_router(state: Arc<TaskState>) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks_handler))
        .route("/tasks/detail/{id}", get(task_detail_handler))
        .route("/tasks/create", post(create_task_handler))
        .route("/tasks/edit/{id}", patch(edit_task_handler))
        .route("/tasks/change-status/{id}", patch(change_status_handler))
        .route("/tasks/change-multi", patch(change_multi_handler))
        .route("/tasks/delete/{id}", delete(delete_task_handler))
        .with_state(state)
}
