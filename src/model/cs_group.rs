use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use sqlx::FromRow;

use crate::core::sqlx_utils::SqlxBinds;

pub const TABLE_NAME: &str = "public.cs_grp_m";

pub const ACTIVE_STATUS: i32 = 1;
pub const INACTIVE_STATUS: i32 = 0;

/// Cost-center group row. Live while `deleted_at` is null.
#[derive(Clone, Debug, Deserialize, FromRow)]
pub struct CsGroup {
    pub id: i32,
    pub cs_grp_code: String,
    pub cs_grp_name: String,
    pub cs_grp_m_id: Option<i32>,
    pub status: i32,
    pub created_at: Option<DateTime<FixedOffset>>,
    pub updated_at: Option<DateTime<FixedOffset>>,
    pub deleted_at: Option<DateTime<FixedOffset>>,
}

/// Equality filter on a `cs_grp_m` column.
#[derive(Clone, Debug, PartialEq)]
pub enum CsGroupFilter {
    Id(i32),
    Code(String),
    Name(String),
    GroupId(i32),
    Status(i32),
}

impl CsGroupFilter {
    pub fn column(&self) -> &'static str {
        match self {
            CsGroupFilter::Id(_) => "id",
            CsGroupFilter::Code(_) => "cs_grp_code",
            CsGroupFilter::Name(_) => "cs_grp_name",
            CsGroupFilter::GroupId(_) => "cs_grp_m_id",
            CsGroupFilter::Status(_) => "status",
        }
    }

    pub fn bind(&self) -> SqlxBinds {
        match self {
            CsGroupFilter::Id(val) | CsGroupFilter::GroupId(val) | CsGroupFilter::Status(val) => {
                SqlxBinds::Int(*val)
            }
            CsGroupFilter::Code(val) | CsGroupFilter::Name(val) => SqlxBinds::String(val.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_column_and_bind() {
        let filter = CsGroupFilter::Code("CSG-01".to_string());
        assert_eq!(filter.column(), "cs_grp_code");
        assert_eq!(filter.bind(), SqlxBinds::String("CSG-01".to_string()));

        let filter = CsGroupFilter::GroupId(7);
        assert_eq!(filter.column(), "cs_grp_m_id");
        assert_eq!(filter.bind(), SqlxBinds::Int(7));

        assert_eq!(CsGroupFilter::Id(3).column(), "id");
        assert_eq!(CsGroupFilter::Name("x".to_string()).column(), "cs_grp_name");
        assert_eq!(CsGroupFilter::Status(1).column(), "status");
    }
}
