//! # Staff Repository

use chrono::Utc;
use sqlx::SqlitePool;

use till_core::StaffMember;

use crate::error::DbResult;

#[derive(Debug, Clone)]
pub struct StaffRepository {
    pool: SqlitePool,
}

impl StaffRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StaffRepository { pool }
    }

    pub async fn insert(&self, shop_id: &str, member: &StaffMember) -> DbResult<()> {
        sqlx::query("INSERT INTO staff (id, shop_id, name, created_at) VALUES (?1, ?2, ?3, ?4)")
            .bind(&member.id)
            .bind(shop_id)
            .bind(&member.name)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Staff of a shop, sorted by name.
    pub async fn list_for_shop(&self, shop_id: &str) -> DbResult<Vec<StaffMember>> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT id, name FROM staff WHERE shop_id = ?1 ORDER BY name")
                .bind(shop_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| StaffMember { id, name })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::memory_db;

    #[tokio::test]
    async fn test_list_is_per_shop_and_sorted() {
        let db = memory_db().await;
        for (id, name, shop) in [("e2", "Zara", "shop-1"), ("e1", "Bilal", "shop-1"), ("e3", "Omar", "shop-2")] {
            let member = StaffMember {
                id: id.to_string(),
                name: name.to_string(),
            };
            db.staff().insert(shop, &member).await.unwrap();
        }

        let names: Vec<String> = db
            .staff()
            .list_for_shop("shop-1")
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Bilal", "Zara"]);
    }
}
