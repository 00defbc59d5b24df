use serde_json::json;

use crate::cli::{utils::output_success, OutputFormat};
use crate::config::AppConfig;
use crate::database::DatabaseManager;

pub async fn handle(config: AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config.database).await?;
    DatabaseManager::drop_and_create_all(&pool).await?;
    pool.close().await;

    output_success(
        &output_format,
        "Recreated all tables",
        Some(json!({ "database": config.database.url })),
    )
}
