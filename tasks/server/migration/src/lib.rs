pub use sea_orm_migration::prelude::*;

mod m20250901_083012_create_tasks_table;
mod m20250903_174455_add_visibility_index;
mod m20250910_121540_add_title_search;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_083012_create_tasks_table::Migration),
            Box::new(m20250903_174455_add_visibility_index::Migration),
            Box::new(m20250910_121540_add_title_search::Migration),
        ]
    }
}
