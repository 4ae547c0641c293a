use axum::Router;
use axum::routing::get;
use migration::MigratorTrait;
use sea_orm::Database;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{self, Config};
use crate::task::api::v1::TaskState;
use crate::task::pagination::Paginator;

pub mod api;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<sea_orm::DatabaseConnection>,
}

impl AppState {
    pub fn task_state(&self) -> TaskState {
        TaskState::new(
            self.db.clone(),
            Paginator::new(self.config.default_page_size),
        )
    }
}

/// Builds the full application router: JSON API, health check and API docs.
pub fn create_app(task_state: TaskState) -> Router {
    Router::new()
        .merge(api::create_api_router(Arc::new(task_state)))
        .route("/health", get(health_check_handler))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: config::Config) -> anyhow::Result<()> {
    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    let db = Database::connect(&config.db_url).await?;
    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    let state = AppState {
        config: Arc::new(config),
        db: Arc::new(db),
    };
    tracing::info!(
        "Serving tasks with a default page size of {}",
        state.config.default_page_size
    );
    let app = create_app(state.task_state());

    axum::serve(listener, app).await?;
    Ok(())
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn can_answer_health_check() {
        let app = Router::new().route("/health", get(health_check_handler));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"OK");
    }

    #[test]
    fn openapi_document_lists_every_task_route() {
        let doc = api::ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for path in [
            "/api/v1/tasks",
            "/api/v1/tasks/detail/{id}",
            "/api/v1/tasks/create",
            "/api/v1/tasks/edit/{id}",
            "/api/v1/tasks/change-status/{id}",
            "/api/v1/tasks/change-multi",
            "/api/v1/tasks/delete/{id}",
        ] {
            assert!(paths.contains(&path), "missing {path}");
        }
    }
}
