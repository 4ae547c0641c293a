use super::search::SearchTerm;
use crate::entities::task::{self, TaskStatus};
use sea_orm::{ColumnTrait, Condition};

/// Predicate for the list path. Soft-deleted tasks are always excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    status: Option<TaskStatus>,
    search: Option<SearchTerm>,
}

impl TaskFilter {
    pub fn new(status: Option<TaskStatus>, search: Option<SearchTerm>) -> Self {
        Self { status, search }
    }

    pub fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    pub fn search(&self) -> Option<&SearchTerm> {
        self.search.as_ref()
    }

    /// `deleted = false [AND status = ?] [AND LOWER(title) LIKE ?]`
    pub fn condition(&self) -> Condition {
        Condition::all()
            .add(task::Column::Deleted.eq(false))
            .add_option(self.status.map(|status| task::Column::Status.eq(status)))
            .add_option(self.search.as_ref().map(SearchTerm::to_expr))
    }

    /// In-memory equivalent of [`TaskFilter::condition`].
    pub fn matches(&self, model: &task::Model) -> bool {
        !model.deleted
            && self.status.is_none_or(|status| model.status == status)
            && self
                .search
                .as_ref()
                .is_none_or(|term| term.matches(&model.title))
    }
}
