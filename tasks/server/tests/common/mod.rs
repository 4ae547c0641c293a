#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait, Set};
use tasks_server::entities::task::{self, TaskStatus};
use tasks_server::task::search;
use testcontainers_modules::testcontainers::runners::AsyncRunner;
use testcontainers_modules::{postgres, testcontainers};
use uuid::Uuid;

/// Connects to a fresh in-memory SQLite database with migrations applied.
pub async fn setup_db() -> anyhow::Result<DatabaseConnection> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub async fn setup_container() -> anyhow::Result<testcontainers::ContainerAsync<postgres::Postgres>>
{
    let container = postgres::Postgres::default().start().await?;
    Ok(container)
}

pub async fn setup_postgres_db(
    container: &testcontainers::ContainerAsync<postgres::Postgres>,
) -> anyhow::Result<DatabaseConnection> {
    let host = container.get_host().await?;
    let port = container.get_host_port_ipv4(5432).await?;
    let db_url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);
    let db = Database::connect(&db_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Fixed base time so inserted tasks have a predictable creation order.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap()
}

/// Inserts a task directly through the entity, bypassing the services.
pub async fn insert_task(
    db: &DatabaseConnection,
    title: &str,
    status: TaskStatus,
    created_minutes_after_base: i64,
) -> task::Model {
    let created_at = base_time() + Duration::minutes(created_minutes_after_base);
    task::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(title.to_string()),
        title_search: Set(search::fold(title)),
        status: Set(status),
        content: Set(None),
        time_start: Set(None),
        time_finish: Set(None),
        deleted: Set(false),
        deleted_at: Set(None),
        created_at: Set(created_at),
        updated_at: Set(created_at),
    }
    .insert(db)
    .await
    .expect("Failed to insert task")
}

/// Inserts an already soft-deleted task.
pub async fn insert_deleted_task(db: &DatabaseConnection, title: &str) -> task::Model {
    let created_at = base_time();
    task::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(title.to_string()),
        title_search: Set(search::fold(title)),
        status: Set(TaskStatus::Initial),
        content: Set(None),
        time_start: Set(None),
        time_finish: Set(None),
        deleted: Set(true),
        deleted_at: Set(Some(created_at)),
        created_at: Set(created_at),
        updated_at: Set(created_at),
    }
    .insert(db)
    .await
    .expect("Failed to insert deleted task")
}

/// Inserts `count` visible tasks titled `Task 1`, `Task 2`, ...
pub async fn insert_numbered_tasks(db: &DatabaseConnection, count: usize) -> Vec<task::Model> {
    let mut tasks = Vec::with_capacity(count);
    for n in 1..=count {
        tasks.push(insert_task(db, &format!("Task {n}"), TaskStatus::Initial, n as i64).await);
    }
    tasks
}

pub async fn find_task(db: &DatabaseConnection, id: Uuid) -> task::Model {
    task::Entity::find_by_id(id)
        .one(db)
        .await
        .expect("Failed to load task")
        .expect("Task row is missing")
}

pub async fn all_tasks(db: &DatabaseConnection) -> Vec<task::Model> {
    let mut tasks = task::Entity::find()
        .all(db)
        .await
        .expect("Failed to load tasks");
    tasks.sort_by_key(|task| task.id);
    tasks
}
