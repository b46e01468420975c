use fake::{faker::company::en::CompanyName, Dummy, Fake, Faker};
use sqlx::{PgPool, Postgres, Transaction};

use crate::model::cs_group::{CsGroup, TABLE_NAME};

/// Inserts fake cost-center groups. `id` on the modified row is ignored; the
/// database assigns it and the returned rows carry the real value.
pub struct CsGroupFactory<T: Clone> {
    modifier_one: fn(x: &CsGroup, ext: T) -> CsGroup,
    modifier_many: fn(x: &CsGroup, idx: usize, ext: T) -> CsGroup,
}

impl<T: Clone> Default for CsGroupFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> CsGroupFactory<T> {
    pub fn new() -> Self {
        Self {
            modifier_one: |x, _| x.clone(),
            modifier_many: |x, _, _| x.clone(),
        }
    }

    pub fn modified_one(&mut self, modifier: fn(x: &CsGroup, ext: T) -> CsGroup) {
        self.modifier_one = modifier
    }

    pub fn modified_many(&mut self, modifier: fn(x: &CsGroup, idx: usize, ext: T) -> CsGroup) {
        self.modifier_many = modifier
    }

    pub async fn generate_one(&mut self, db: &PgPool, ext: T) -> anyhow::Result<CsGroup> {
        let data = (self.modifier_one)(&CsGroupDummy::generate(), ext);
        let mut tx = db.begin().await?;
        let data = insert(&mut tx, &data).await?;
        tx.commit().await?;
        Ok(data)
    }

    pub async fn generate_many(
        &mut self,
        db: &PgPool,
        num: u32,
        ext: T,
    ) -> anyhow::Result<Vec<CsGroup>> {
        let mut tx = db.begin().await?;
        let mut result: Vec<CsGroup> = vec![];
        for idx in 0..num as usize {
            let data = (self.modifier_many)(&CsGroupDummy::generate(), idx, ext.clone());
            result.push(insert(&mut tx, &data).await?);
        }
        tx.commit().await?;
        Ok(result)
    }
}

async fn insert(tx: &mut Transaction<'_, Postgres>, data: &CsGroup) -> anyhow::Result<CsGroup> {
    let row: CsGroup = sqlx::query_as(
        format!(
            r#"
        INSERT INTO {} (cs_grp_code, cs_grp_name, cs_grp_m_id, status, created_at, updated_at, deleted_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *"#,
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(&data.cs_grp_code)
    .bind(&data.cs_grp_name)
    .bind(data.cs_grp_m_id)
    .bind(data.status)
    .bind(data.created_at)
    .bind(data.updated_at)
    .bind(data.deleted_at)
    .fetch_one(&mut **tx)
    .await?;
    Ok(row)
}

#[derive(Debug, Dummy, Clone)]
struct CsGroupDummy {
    #[dummy(faker = "1..100000")]
    code_num: u32,
    #[dummy(faker = "CompanyName()")]
    cs_grp_name: String,
    #[dummy(faker = "1..1000")]
    cs_grp_m_id: i32,
    #[dummy(faker = "0..2")]
    status: i32,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl CsGroupDummy {
    fn generate() -> CsGroup {
        let dummy = Faker.fake::<Self>();
        let created_at = dummy.created_at.fixed_offset();
        CsGroup {
            id: 0,
            cs_grp_code: format!("CSG-{:05}", dummy.code_num),
            cs_grp_name: dummy.cs_grp_name,
            cs_grp_m_id: Some(dummy.cs_grp_m_id),
            status: dummy.status,
            created_at: Some(created_at),
            updated_at: Some(created_at),
            deleted_at: None,
        }
    }
}
