use super::filter::TaskFilter;
use super::pagination::{PaginationPlan, Paginator};
use super::search::SearchTerm;
use super::sort::SortSpec;
use super::{Task, TaskServiceError, TaskStatus};
use crate::entities::task;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

/// Raw query parameters of a list request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListTasksQuery {
    /// Only tasks with this status
    pub status: Option<String>,
    /// Case-insensitive substring of the title
    pub keyword: Option<String>,
    /// Field to order by
    pub sort_key: Option<String>,
    /// `asc` or `desc`
    pub sort_value: Option<String>,
    /// One-based page number
    pub current_page: Option<String>,
    /// Page size
    pub limit_items: Option<String>,
}

/// One page of a list request.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskPage {
    /// Number of tasks matching the filter, across all pages.
    pub total: u64,
    pub plan: PaginationPlan,
    pub tasks: Vec<Task>,
}

pub struct TaskQueryService<'a> {
    db: &'a DatabaseConnection,
    paginator: Paginator,
}

impl<'a> TaskQueryService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self::with_paginator(db, Paginator::default())
    }

    pub fn with_paginator(db: &'a DatabaseConnection, paginator: Paginator) -> Self {
        Self { db, paginator }
    }

    /// Lists visible tasks matching the query, one page at a time.
    ///
    /// The query is validated before any I/O: an unknown status or sort
    /// field fails with [`TaskServiceError::Validation`]. A page past the
    /// end or a filter matching nothing is an empty page, not an error.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, query: &ListTasksQuery) -> Result<TaskPage, TaskServiceError> {
        let status = query
            .status
            .as_deref()
            .map(str::trim)
            .filter(|status| !status.is_empty())
            .map(str::parse::<TaskStatus>)
            .transpose()?;
        let filter = TaskFilter::new(status, SearchTerm::compile(query.keyword.as_deref()));
        let sort = SortSpec::build(query.sort_key.as_deref(), query.sort_value.as_deref())?;

        let total = task::Entity::find()
            .filter(filter.condition())
            .count(self.db)
            .await?;

        let plan = self.paginator.plan(
            query.current_page.as_deref(),
            query.limit_items.as_deref(),
            total,
        );

        let mut select = task::Entity::find().filter(filter.condition());
        if let Some(sort) = sort {
            select = select.order_by(sort.column(), sort.order());
        }
        // Total order so consecutive pages neither overlap nor skip rows.
        let select = select
            .order_by_asc(task::Column::CreatedAt)
            .order_by_asc(task::Column::Id);

        let tasks = select
            .offset(plan.skip)
            .limit(plan.page_size)
            .all(self.db)
            .await?
            .into_iter()
            .map(Task::from)
            .collect();

        Ok(TaskPage { total, plan, tasks })
    }

    /// Retrieves a visible task by its ID. Soft-deleted tasks are reported as absent.
    #[tracing::instrument(skip(self))]
    pub async fn detail(&self, id: Uuid) -> Result<Option<Task>, TaskServiceError> {
        let task = task::Entity::find_by_id(id)
            .filter(task::Column::Deleted.eq(false))
            .one(self.db)
            .await?;
        Ok(task.map(Task::from))
    }
}
