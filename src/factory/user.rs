use chrono::{DateTime, Utc};
use fake::{faker::internet::en::{Password, Username}, Dummy, Fake, Faker};
use sqlx::PgPool;
use uuid::Uuid;

use crate::model::user::{User, TABLE_NAME};

pub struct UserFactory<T: Clone> {
    modifier_one: fn(x: &User, ext: T) -> User,
}

impl<T: Clone> Default for UserFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> UserFactory<T> {
    pub fn new() -> Self {
        Self {
            modifier_one: |x, _| x.clone(),
        }
    }

    pub fn modified_one(&mut self, modifier: fn(x: &User, ext: T) -> User) {
        self.modifier_one = modifier
    }

    pub async fn generate_one(&mut self, db: &PgPool, ext: T) -> anyhow::Result<User> {
        let data = (self.modifier_one)(&UserDummy::generate(), ext);
        sqlx::query(
            format!(
                r#"
        INSERT INTO {} (id, user_name, password, is_active, created_date, updated_date, deleted_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7)"#,
                TABLE_NAME
            )
            .as_str(),
        )
        .bind(data.id)
        .bind(&data.user_name)
        .bind(&data.password)
        .bind(data.is_active)
        .bind(data.created_date)
        .bind(data.updated_date)
        .bind(data.deleted_date)
        .execute(db)
        .await?;
        Ok(data)
    }
}

#[derive(Debug, Dummy, Clone)]
struct UserDummy {
    #[dummy(faker = "Username()")]
    user_name: String,
    #[dummy(faker = "Password(8..20)")]
    password: String,
    created_date: DateTime<Utc>,
}

impl UserDummy {
    fn generate() -> User {
        let dummy = Faker.fake::<Self>();
        let created_date = dummy.created_date.fixed_offset();
        User {
            id: Uuid::now_v7(),
            user_name: dummy.user_name,
            password: dummy.password,
            is_active: Some(true),
            created_date: Some(created_date),
            updated_date: Some(created_date),
            deleted_date: None,
        }
    }
}
