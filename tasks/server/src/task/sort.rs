use super::TaskServiceError;
use crate::entities::task;
use sea_orm::Order;
use std::str::FromStr;

/// Task fields a list request may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Title,
    Status,
    TimeStart,
    TimeFinish,
    CreatedAt,
    UpdatedAt,
}

impl SortKey {
    pub fn column(self) -> task::Column {
        match self {
            SortKey::Title => task::Column::Title,
            SortKey::Status => task::Column::Status,
            SortKey::TimeStart => task::Column::TimeStart,
            SortKey::TimeFinish => task::Column::TimeFinish,
            SortKey::CreatedAt => task::Column::CreatedAt,
            SortKey::UpdatedAt => task::Column::UpdatedAt,
        }
    }
}

impl FromStr for SortKey {
    type Err = TaskServiceError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "title" => Ok(SortKey::Title),
            "status" => Ok(SortKey::Status),
            "timeStart" | "time_start" => Ok(SortKey::TimeStart),
            "timeFinish" | "time_finish" => Ok(SortKey::TimeFinish),
            "createdAt" | "created_at" => Ok(SortKey::CreatedAt),
            "updatedAt" | "updated_at" => Ok(SortKey::UpdatedAt),
            other => Err(TaskServiceError::Validation(format!(
                "Cannot sort by '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = TaskServiceError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "asc" | "ascending" | "1" => Ok(SortDirection::Asc),
            "desc" | "descending" | "-1" => Ok(SortDirection::Desc),
            _ => Err(TaskServiceError::Validation(format!(
                "Unknown sort direction '{raw}'"
            ))),
        }
    }
}

impl From<SortDirection> for Order {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        }
    }
}

/// Ordering for a list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Builds an ordering from the raw `sortKey` / `sortValue` pair.
    ///
    /// Returns `Ok(None)` unless both are given. Keys outside [`SortKey`] and
    /// unknown directions are rejected.
    pub fn build(
        sort_key: Option<&str>,
        sort_value: Option<&str>,
    ) -> Result<Option<Self>, TaskServiceError> {
        let (Some(key), Some(direction)) = (non_blank(sort_key), non_blank(sort_value)) else {
            return Ok(None);
        };
        Ok(Some(Self {
            key: key.parse()?,
            direction: direction.parse()?,
        }))
    }

    pub fn column(&self) -> task::Column {
        self.key.column()
    }

    pub fn order(&self) -> Order {
        self.direction.into()
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}
