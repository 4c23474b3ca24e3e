pub use sea_orm_migration::prelude::*;

mod m20190501_000000_create_course_tables;
mod m20190502_000001_create_submission_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20190501_000000_create_course_tables::Migration),
            Box::new(m20190502_000001_create_submission_tables::Migration),
        ]
    }
}
