use std::time::Duration;

use sqlx::{pool::PoolOptions, Pool, Postgres};

use crate::settings::Config;

pub async fn init_pool(config: &Config) -> anyhow::Result<Pool<Postgres>> {
    let pool = PoolOptions::new()
        .min_connections(5)
        .max_connections(100)
        .idle_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await?;
    Ok(pool)
}

/// Pool that only dials Postgres on first use
pub fn init_lazy_pool(config: &Config) -> anyhow::Result<Pool<Postgres>> {
    let pool = PoolOptions::new()
        .max_connections(5)
        .connect_lazy(&config.database_url)?;
    Ok(pool)
}
