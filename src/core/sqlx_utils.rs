use sqlx::{
    postgres::{PgArguments, PgRow},
    query::{Query, QueryAs},
    Postgres,
};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq)]
pub enum SqlxBinds {
    String(String),
    Int(i32),
    Uuid(Uuid),
}

pub fn binds_query(stmt: &str, binds: Vec<SqlxBinds>) -> Query<'_, Postgres, PgArguments> {
    let mut q: Query<'_, Postgres, PgArguments> = sqlx::query(stmt);
    for bind in binds {
        q = match bind {
            SqlxBinds::String(val) => q.bind(val),
            SqlxBinds::Int(val) => q.bind(val),
            SqlxBinds::Uuid(val) => q.bind(val),
        };
    }
    q
}

pub fn binds_query_as<'a, T: for<'r> sqlx::FromRow<'r, PgRow>>(
    stmt: &'a str,
    binds: Vec<SqlxBinds>,
) -> QueryAs<'a, Postgres, T, PgArguments> {
    let mut q: QueryAs<'_, Postgres, T, PgArguments> = sqlx::query_as(stmt);
    for bind in binds {
        q = match bind {
            SqlxBinds::String(val) => q.bind(val),
            SqlxBinds::Int(val) => q.bind(val),
            SqlxBinds::Uuid(val) => q.bind(val),
        };
    }
    q
}

pub fn query_builder(
    select: Option<String>,
    table_name: &str,
    wheres: &[String],
    order_by: Vec<String>,
    limit: Option<u32>,
    offset: Option<u32>,
) -> String {
    // Select
    let mut stmt = "SELECT ".to_string();
    stmt.push_str(&select.unwrap_or("*".to_string()));

    // From
    stmt.push_str(&format!(" FROM {}", table_name));

    // Where
    if !wheres.is_empty() {
        stmt.push_str(" WHERE ");
        stmt.push_str(&wheres.join(" AND "));
    }

    // Order by
    if !order_by.is_empty() {
        stmt.push_str(" ORDER BY ");
        stmt.push_str(&order_by.join(", "));
    }

    if let Some(limit) = limit {
        stmt.push_str(&format!(" LIMIT {}", limit));
    }
    if let Some(offset) = offset {
        stmt.push_str(&format!(" OFFSET {}", offset));
    }
    stmt
}

/// Build `UPDATE <table> SET ... WHERE ...`. Placeholders inside `sets` and
/// `wheres` must already be numbered by the caller.
pub fn update_builder(table_name: &str, sets: &[String], wheres: &[String]) -> String {
    let mut stmt = format!("UPDATE {} SET {}", table_name, sets.join(", "));
    if !wheres.is_empty() {
        stmt.push_str(" WHERE ");
        stmt.push_str(&wheres.join(" AND "));
    }
    stmt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builder_select_all() {
        let stmt = query_builder(None, "public.cs_grp_m", &[], vec![], None, None);
        assert_eq!(stmt, "SELECT * FROM public.cs_grp_m");
    }

    #[test]
    fn test_query_builder_full() {
        let stmt = query_builder(
            Some("count(id)".to_string()),
            "public.cs_grp_m",
            &["deleted_at IS NULL".to_string(), "status = $1".to_string()],
            vec!["id ASC".to_string(), "cs_grp_code DESC".to_string()],
            Some(10),
            Some(20),
        );
        assert_eq!(
            stmt,
            "SELECT count(id) FROM public.cs_grp_m WHERE deleted_at IS NULL AND status = $1 \
             ORDER BY id ASC, cs_grp_code DESC LIMIT 10 OFFSET 20"
        );
    }

    #[test]
    fn test_update_builder() {
        let stmt = update_builder(
            "public.cs_grp_m",
            &["deleted_at = $1".to_string(), "updated_at = $1".to_string()],
            &["deleted_at IS NULL".to_string(), "id = $2".to_string()],
        );
        assert_eq!(
            stmt,
            "UPDATE public.cs_grp_m SET deleted_at = $1, updated_at = $1 \
             WHERE deleted_at IS NULL AND id = $2"
        );
    }
}
