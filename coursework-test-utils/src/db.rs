use coursework::database::connection::{establish_connection, setup_database};
use sea_orm::{DatabaseConnection, DbErr};

pub struct TestDb {
    url: String,
}

impl TestDb {
    pub fn new_in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
        }
    }

    pub fn new_file(path: impl Into<String>) -> Self {
        Self {
            url: format!("sqlite://{}?mode=rwc", path.into()),
        }
    }

    /// Connect and run every migration.
    pub async fn connect(&self) -> Result<DatabaseConnection, DbErr> {
        let db = establish_connection(&self.url).await?;
        setup_database(&db).await?;
        Ok(db)
    }
}
