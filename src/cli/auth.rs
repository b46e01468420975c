use chrono::Local;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{core::security::hash_password, model::user::User, repository};

pub async fn create_user(pool: &PgPool, username: &str, password: &str) -> anyhow::Result<User> {
    let mut tx = pool.begin().await?;

    let hashed_password =
        hash_password(password).map_err(|err| anyhow::anyhow!(err.to_string()))?;
    let now = Local::now().fixed_offset();
    let user = User {
        id: Uuid::now_v7(),
        user_name: username.to_string(),
        password: hashed_password,
        is_active: Some(true),
        created_date: Some(now),
        updated_date: Some(now),
        deleted_date: None,
    };
    repository::user::create_user(&mut tx, &user).await?;
    tx.commit().await?;
    tracing::info!("created user {}", user.user_name);
    Ok(user)
}
