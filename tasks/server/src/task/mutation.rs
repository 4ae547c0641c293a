use super::search;
use super::{CreateTaskPayload, EditTaskPayload, Task, TaskServiceError, TaskStatus};
use crate::clock::{Clock, SystemClock};
use crate::entities::task;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use std::sync::Arc;
use uuid::Uuid;

/// A mutation applied to every task of a bulk request in one statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkOperation {
    Status(TaskStatus),
    Delete,
}

impl BulkOperation {
    pub const STATUS_KEY: &'static str = "status";
    pub const DELETE_KEY: &'static str = "delete";

    /// Resolves the `key` / `value` pair of a change-multi request.
    ///
    /// `status` needs a valid status as its value; `delete` ignores the value.
    pub fn parse(key: &str, value: Option<&str>) -> Result<Self, TaskServiceError> {
        match key {
            Self::STATUS_KEY => {
                let value = value.ok_or_else(|| {
                    TaskServiceError::Validation("A status value is required".to_string())
                })?;
                Ok(BulkOperation::Status(value.parse()?))
            }
            Self::DELETE_KEY => Ok(BulkOperation::Delete),
            other => Err(TaskServiceError::InvalidOperation(other.to_string())),
        }
    }
}

pub struct TaskMutationService<'a> {
    db: &'a DatabaseConnection,
    clock: Arc<dyn Clock>,
}

impl<'a> TaskMutationService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self::with_clock(db, Arc::new(SystemClock))
    }

    pub fn with_clock(db: &'a DatabaseConnection, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// Creates a new task. The title is required; status defaults to `initial`.
    #[tracing::instrument(skip(self))]
    pub async fn create(&self, payload: CreateTaskPayload) -> Result<Task, TaskServiceError> {
        let title = payload.validated_title()?;
        let now = self.clock.now();

        let active_model = task::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            title_search: ActiveValue::Set(search::fold(&title)),
            title: ActiveValue::Set(title),
            status: ActiveValue::Set(payload.status.unwrap_or_default()),
            content: ActiveValue::Set(payload.content),
            time_start: ActiveValue::Set(payload.time_start),
            time_finish: ActiveValue::Set(payload.time_finish),
            deleted: ActiveValue::Set(false),
            deleted_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };
        let created_model = active_model.insert(self.db).await?;
        tracing::info!("Created task {}", created_model.id);
        Ok(Task::from(created_model))
    }

    /// Applies the fields present in `payload` to a visible task.
    ///
    /// A nullable field sent as `null` is cleared; an absent one is left alone.
    #[tracing::instrument(skip(self))]
    pub async fn edit(&self, id: Uuid, payload: EditTaskPayload) -> Result<(), TaskServiceError> {
        let title = payload.validated_title()?;

        let mut update = task::Entity::update_many()
            .col_expr(task::Column::UpdatedAt, Expr::value(self.clock.now()))
            .filter(task::Column::Id.eq(id))
            .filter(task::Column::Deleted.eq(false));
        if let Some(title) = title {
            update = update
                .col_expr(task::Column::TitleSearch, Expr::value(search::fold(&title)))
                .col_expr(task::Column::Title, Expr::value(title));
        }
        if let Some(status) = payload.status {
            update = update.col_expr(task::Column::Status, Expr::value(status));
        }
        if let Some(content) = payload.content {
            update = update.col_expr(task::Column::Content, Expr::value(content));
        }
        if let Some(time_start) = payload.time_start {
            update = update.col_expr(task::Column::TimeStart, Expr::value(time_start));
        }
        if let Some(time_finish) = payload.time_finish {
            update = update.col_expr(task::Column::TimeFinish, Expr::value(time_finish));
        }

        let result = update.exec(self.db).await?;
        if result.rows_affected == 0 {
            return Err(TaskServiceError::NotFound(id));
        }
        Ok(())
    }

    /// Sets the status of a visible task.
    #[tracing::instrument(skip(self))]
    pub async fn change_status(&self, id: Uuid, status: TaskStatus) -> Result<(), TaskServiceError> {
        let result = task::Entity::update_many()
            .col_expr(task::Column::Status, Expr::value(status))
            .col_expr(task::Column::UpdatedAt, Expr::value(self.clock.now()))
            .filter(task::Column::Id.eq(id))
            .filter(task::Column::Deleted.eq(false))
            .exec(self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(TaskServiceError::NotFound(id));
        }
        Ok(())
    }

    /// Applies `operation` to every task in `ids` with a single statement.
    ///
    /// Returns the number of tasks the store reports as updated. Ids that do
    /// not exist are skipped silently. Status changes only touch visible
    /// tasks; deletes re-stamp tasks that are already deleted.
    #[tracing::instrument(skip(self))]
    pub async fn change_multi(
        &self,
        ids: &[Uuid],
        operation: BulkOperation,
    ) -> Result<u64, TaskServiceError> {
        if ids.is_empty() {
            return Err(TaskServiceError::Validation(
                "At least one id is required".to_string(),
            ));
        }

        let now = self.clock.now();
        let update = task::Entity::update_many()
            .col_expr(task::Column::UpdatedAt, Expr::value(now))
            .filter(task::Column::Id.is_in(ids.iter().copied()));
        let update = match operation {
            BulkOperation::Status(status) => update
                .col_expr(task::Column::Status, Expr::value(status))
                .filter(task::Column::Deleted.eq(false)),
            BulkOperation::Delete => update
                .col_expr(task::Column::Deleted, Expr::value(true))
                .col_expr(task::Column::DeletedAt, Expr::value(now)),
        };

        let result = update.exec(self.db).await?;
        tracing::info!(
            "Applied {:?} to {} of {} requested tasks",
            operation,
            result.rows_affected,
            ids.len()
        );
        Ok(result.rows_affected)
    }

    /// Marks a task as deleted. Deleting an already deleted task re-stamps `deleted_at`.
    #[tracing::instrument(skip(self))]
    pub async fn soft_delete(&self, id: Uuid) -> Result<(), TaskServiceError> {
        let now = self.clock.now();
        let result = task::Entity::update_many()
            .col_expr(task::Column::Deleted, Expr::value(true))
            .col_expr(task::Column::DeletedAt, Expr::value(now))
            .col_expr(task::Column::UpdatedAt, Expr::value(now))
            .filter(task::Column::Id.eq(id))
            .exec(self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(TaskServiceError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use chrono::{DateTime, TimeZone, Utc};
    use migration::MigratorTrait;
    use sea_orm::{ConnectOptions, Database};

    async fn setup_db() -> DatabaseConnection {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).sqlx_logging(false);
        let db = Database::connect(options).await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, hour, 0, 0).unwrap()
    }

    fn clock_at(hour: u32) -> Arc<dyn Clock> {
        let mut clock = MockClock::new();
        clock.expect_now().return_const(at(hour));
        Arc::new(clock)
    }

    async fn reload(db: &DatabaseConnection, id: Uuid) -> task::Model {
        task::Entity::find_by_id(id).one(db).await.unwrap().unwrap()
    }

    #[test]
    fn can_parse_bulk_operations() {
        assert_eq!(
            BulkOperation::parse("status", Some("finish")).unwrap(),
            BulkOperation::Status(TaskStatus::Finish)
        );
        assert_eq!(
            BulkOperation::parse("delete", None).unwrap(),
            BulkOperation::Delete
        );
        assert_eq!(
            BulkOperation::parse("delete", Some("anything")).unwrap(),
            BulkOperation::Delete
        );
    }

    #[test]
    fn rejects_unknown_bulk_key() {
        assert!(matches!(
            BulkOperation::parse("rename", Some("x")),
            Err(TaskServiceError::InvalidOperation(key)) if key == "rename"
        ));
    }

    #[test]
    fn rejects_bulk_status_without_valid_value() {
        assert!(matches!(
            BulkOperation::parse("status", None),
            Err(TaskServiceError::Validation(_))
        ));
        assert!(matches!(
            BulkOperation::parse("status", Some("archived")),
            Err(TaskServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn can_stamp_creation_time_from_clock() {
        let db = setup_db().await;
        let service = TaskMutationService::with_clock(&db, clock_at(9));

        let task = service
            .create(CreateTaskPayload::new("Water plants"))
            .await
            .unwrap();

        assert_eq!(task.created_at(), at(9));
        assert_eq!(task.updated_at(), at(9));
        assert_eq!(task.status(), TaskStatus::Initial);
        assert!(!task.is_deleted());
        assert_eq!(task.deleted_at(), None);
    }

    #[tokio::test]
    async fn can_restamp_deleted_at_when_deleting_twice() {
        let db = setup_db().await;
        let task = TaskMutationService::with_clock(&db, clock_at(8))
            .create(CreateTaskPayload::new("Old chore"))
            .await
            .unwrap();

        TaskMutationService::with_clock(&db, clock_at(10))
            .soft_delete(task.id())
            .await
            .unwrap();
        let first = reload(&db, task.id()).await;
        assert!(first.deleted);
        assert_eq!(first.deleted_at, Some(at(10)));

        TaskMutationService::with_clock(&db, clock_at(11))
            .soft_delete(task.id())
            .await
            .unwrap();
        let second = reload(&db, task.id()).await;
        assert!(second.deleted);
        assert_eq!(second.deleted_at, Some(at(11)));
    }

    #[tokio::test]
    async fn can_stamp_bulk_delete_with_single_timestamp() {
        let db = setup_db().await;
        let creator = TaskMutationService::with_clock(&db, clock_at(7));
        let a = creator.create(CreateTaskPayload::new("A")).await.unwrap();
        let b = creator.create(CreateTaskPayload::new("B")).await.unwrap();

        let affected = TaskMutationService::with_clock(&db, clock_at(12))
            .change_multi(&[a.id(), b.id()], BulkOperation::Delete)
            .await
            .unwrap();

        assert_eq!(affected, 2);
        for id in [a.id(), b.id()] {
            let model = reload(&db, id).await;
            assert!(model.deleted);
            assert_eq!(model.deleted_at, Some(at(12)));
            assert_eq!(model.updated_at, at(12));
        }
    }
}
