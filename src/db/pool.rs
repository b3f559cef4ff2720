use crate::config::Config;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

pub type DbPool = DatabaseConnection;

pub async fn create_pool(config: &Config) -> Result<DbPool, anyhow::Error> {
    let mut options = ConnectOptions::new(config.database.url.clone());
    if config.is_sqlite() {
        // Every connection to `sqlite::memory:` opens its own database.
        options.max_connections(1).min_connections(1);
    } else {
        options.max_connections(config.database.max_connections);
    }
    options.sqlx_logging(false);

    let db = Database::connect(options).await?;
    super::create_schema(&db).await?;

    Ok(db)
}
