use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle state of a task. Stored as its string value.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    #[default]
    #[sea_orm(string_value = "initial")]
    Initial,
    #[sea_orm(string_value = "doing")]
    Doing,
    #[sea_orm(string_value = "finish")]
    Finish,
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "notFinish")]
    NotFinish,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    /// Case-folded copy of `title`, the column keyword search runs against.
    pub title_search: String,
    pub status: TaskStatus,
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
    pub time_start: Option<DateTimeUtc>,
    pub time_finish: Option<DateTimeUtc>,
    pub deleted: bool,
    pub deleted_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
