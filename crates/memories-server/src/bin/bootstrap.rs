//! One-shot setup: creates the schema and the demo account, then exits.

use tracing::info;

use memories_db::Database;
use memories_server::config::Config;

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    memories_server::init_logging();

    let config = Config::from_env()?;
    let db = Database::open(&config.db_path)?;

    match memories_db::bootstrap::seed_demo_user(&db)? {
        Some(id) => info!("Demo user ready (id {})", id),
        None => info!("Users already exist, nothing to seed"),
    }
    Ok(())
}
