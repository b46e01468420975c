use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{
    core::sqlx_utils::{binds_query_as, query_builder, SqlxBinds},
    model::user::{User, TABLE_NAME},
};

pub async fn get_user_by_id(
    tx: &mut Transaction<'_, Postgres>,
    id: &Uuid,
) -> anyhow::Result<Option<User>> {
    let binds: Vec<SqlxBinds> = vec![SqlxBinds::Uuid(*id)];
    let filters: Vec<String> = vec!["id = $1".to_string(), "deleted_date IS NULL".to_string()];
    let stmt = query_builder(None, TABLE_NAME, &filters, vec![], None, None);
    let user = binds_query_as::<User>(&stmt, binds)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(user)
}

pub async fn get_user_by_username(
    tx: &mut Transaction<'_, Postgres>,
    username: &str,
) -> anyhow::Result<Option<User>> {
    let binds: Vec<SqlxBinds> = vec![SqlxBinds::String(username.to_string())];
    let filters: Vec<String> = vec![
        "user_name = $1".to_string(),
        "deleted_date IS NULL".to_string(),
    ];
    let stmt = query_builder(None, TABLE_NAME, &filters, vec![], None, None);
    let user = binds_query_as::<User>(&stmt, binds)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(user)
}

pub async fn create_user(tx: &mut Transaction<'_, Postgres>, user: &User) -> anyhow::Result<()> {
    sqlx::query(
        format!(
            r#"
        INSERT INTO {} (id, user_name, password, is_active, created_date, updated_date, deleted_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(user.id)
    .bind(&user.user_name)
    .bind(&user.password)
    .bind(user.is_active)
    .bind(user.created_date)
    .bind(user.updated_date)
    .bind(user.deleted_date)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
