use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

pub const TABLE_NAME: &str = "public.user";

#[derive(Clone, Debug, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub user_name: String,
    pub password: String,
    pub is_active: Option<bool>,
    pub created_date: Option<DateTime<FixedOffset>>,
    pub updated_date: Option<DateTime<FixedOffset>>,
    pub deleted_date: Option<DateTime<FixedOffset>>,
}

impl User {
    /// Live and not switched off. A missing flag counts as active.
    pub fn is_active_user(&self) -> bool {
        self.deleted_date.is_none() && self.is_active.unwrap_or(true)
    }
}
