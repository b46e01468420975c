use anyhow::{bail, Ok};
use chrono::{DateTime, FixedOffset, Local};
use sqlx::{Postgres, Transaction};

use crate::{
    core::sqlx_utils::{binds_query, binds_query_as, query_builder, update_builder, SqlxBinds},
    model::cs_group::{CsGroup, CsGroupFilter, ACTIVE_STATUS, TABLE_NAME},
};

pub async fn get_all_cs_group(tx: &mut Transaction<'_, Postgres>) -> anyhow::Result<Vec<CsGroup>> {
    let filters: Vec<String> = vec!["deleted_at IS NULL".to_string()];
    let stmt = query_builder(
        None,
        TABLE_NAME,
        &filters,
        vec!["id DESC".to_string()],
        None,
        None,
    );
    let q = binds_query_as::<CsGroup>(&stmt, vec![]);
    let data = q.fetch_all(&mut **tx).await?;
    Ok(data)
}

pub async fn get_active_cs_group(
    tx: &mut Transaction<'_, Postgres>,
) -> anyhow::Result<Vec<CsGroup>> {
    let binds: Vec<SqlxBinds> = vec![SqlxBinds::Int(ACTIVE_STATUS)];
    let filters: Vec<String> = vec!["deleted_at IS NULL".to_string(), "status = $1".to_string()];
    let stmt = query_builder(
        None,
        TABLE_NAME,
        &filters,
        vec!["id ASC".to_string()],
        None,
        None,
    );
    let q = binds_query_as::<CsGroup>(&stmt, binds);
    let data = q.fetch_all(&mut **tx).await?;
    Ok(data)
}

pub async fn get_cs_group_by_id(
    tx: &mut Transaction<'_, Postgres>,
    id: i32,
) -> anyhow::Result<Option<CsGroup>> {
    let binds: Vec<SqlxBinds> = vec![SqlxBinds::Int(id)];
    let filters: Vec<String> = vec!["id = $1".to_string(), "deleted_at IS NULL".to_string()];
    let stmt = query_builder(None, TABLE_NAME, &filters, vec![], Some(1), None);
    let q = binds_query_as::<CsGroup>(&stmt, binds);
    let data = q.fetch_optional(&mut **tx).await?;
    Ok(data)
}

pub async fn create_cs_group(
    tx: &mut Transaction<'_, Postgres>,
    cs_grp_code: String,
    cs_grp_name: String,
    cs_grp_m_id: Option<i32>,
    status: i32,
    now: Option<DateTime<FixedOffset>>,
) -> anyhow::Result<CsGroup> {
    let now = now.unwrap_or(Local::now().fixed_offset());
    let new_cs_group: CsGroup = sqlx::query_as(
        format!(
            r#"
    INSERT INTO {} (cs_grp_code, cs_grp_name, cs_grp_m_id, status, created_at, updated_at, deleted_at)
    VALUES ($1, $2, $3, $4, $5, $5, NULL)
    RETURNING *"#,
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(&cs_grp_code)
    .bind(&cs_grp_name)
    .bind(cs_grp_m_id)
    .bind(status)
    .bind(now)
    .fetch_one(&mut **tx)
    .await?;
    Ok(new_cs_group)
}

/// Only name and code change. Returns `None` when no live row has `id`.
pub async fn update_cs_group(
    tx: &mut Transaction<'_, Postgres>,
    id: i32,
    cs_grp_name: String,
    cs_grp_code: String,
    now: Option<DateTime<FixedOffset>>,
) -> anyhow::Result<Option<CsGroup>> {
    let now = now.unwrap_or(Local::now().fixed_offset());
    let data: Option<CsGroup> = sqlx::query_as(
        format!(
            r#"
        UPDATE {}
        SET cs_grp_name = $1, cs_grp_code = $2, updated_at = $3
        WHERE id = $4 AND deleted_at IS NULL
        RETURNING *"#,
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(&cs_grp_name)
    .bind(&cs_grp_code)
    .bind(now)
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(data)
}

/// Mark every live row matching all `filters` as deleted. Returns whether
/// any row was marked.
pub async fn soft_delete_cs_group(
    tx: &mut Transaction<'_, Postgres>,
    filters: &[CsGroupFilter],
    now: Option<DateTime<FixedOffset>>,
) -> anyhow::Result<bool> {
    if filters.is_empty() {
        bail!("soft delete on {} requires at least one filter", TABLE_NAME);
    }
    let now = now.unwrap_or(Local::now().fixed_offset());

    let mut wheres: Vec<String> = vec!["deleted_at IS NULL".to_string()];
    let mut binds: Vec<SqlxBinds> = vec![];
    for filter in filters {
        binds.push(filter.bind());
        wheres.push(format!("{} = ${}", filter.column(), binds.len()));
    }
    // timestamp goes after the filter values
    let now_placeholder = format!("${}", binds.len() + 1);
    let stmt = update_builder(
        TABLE_NAME,
        &[
            format!("deleted_at = {}", now_placeholder),
            format!("updated_at = {}", now_placeholder),
        ],
        &wheres,
    );
    let res = binds_query(&stmt, binds)
        .bind(now)
        .execute(&mut **tx)
        .await?;
    Ok(res.rows_affected() > 0)
}
