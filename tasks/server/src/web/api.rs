use std::sync::Arc;

use crate::task::api::v1::{self as tasks_v1, TaskState};
use crate::task::{CreateTaskPayload, EditTaskPayload, TaskStatus};

use axum::Router;
use utoipa::OpenApi;

/// OpenAPI document of the JSON API.
#[derive(OpenApi)]
#[openapi(
    paths(
        tasks_v1::list_tasks_handler,
        tasks_v1::task_detail_handler,
        tasks_v1::create_task_handler,
        tasks_v1::edit_task_handler,
        tasks_v1::change_status_handler,
        tasks_v1::change_multi_handler,
        tasks_v1::delete_task_handler,
    ),
    components(schemas(
        tasks_v1::TaskJson,
        tasks_v1::TasksResponse,
        tasks_v1::ApiResponse,
        tasks_v1::CreatedResponse,
        tasks_v1::ChangeStatusPayload,
        tasks_v1::ChangeMultiPayload,
        CreateTaskPayload,
        EditTaskPayload,
        TaskStatus,
    )),
    tags((name = "Tasks", description = "Task listing and mutation"))
)]
pub struct ApiDoc;

/// Creates the API routes for JSON API endpoints.
pub fn create_api_router(task_state: Arc<TaskState>) -> Router {
    let tasks_router = tasks_v1::create_api_router(task_state);
    Router::new().nest("/api/v1", tasks_router)
}
