//! `CommunityRepo` over the communities/subscriptions tables.

use async_trait::async_trait;
use chrono::Utc;
use domains::{Community, CommunityRepo, Result};
use sqlx::Row;
use uuid::Uuid;

use super::{blob_to_uuid, map_db_err, uuid_to_blob, SqliteStore};

fn row_to_community(row: &sqlx::sqlite::SqliteRow) -> Community {
    Community {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        name: row.get("name"),
        slug: row.get("slug"),
        description: row.get("description"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl CommunityRepo for SqliteStore {
    async fn create(&self, community: &Community) -> Result<()> {
        sqlx::query(
            "INSERT INTO communities (id, name, slug, description, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(community.id))
        .bind(&community.name)
        .bind(&community.slug)
        .bind(&community.description)
        .bind(community.created_at)
        .execute(self.pool())
        .await
        .map_err(map_db_err)?;
        Ok(())
    }

    async fn by_slug(&self, slug: &str) -> Result<Option<Community>> {
        let row = sqlx::query("SELECT * FROM communities WHERE slug = ?")
            .bind(slug)
            .fetch_optional(self.pool())
            .await
            .map_err(map_db_err)?;
        Ok(row.as_ref().map(row_to_community))
    }

    async fn name_taken(&self, name: &str) -> Result<bool> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM communities WHERE name = ?) AS taken")
            .bind(name)
            .fetch_one(self.pool())
            .await
            .map_err(map_db_err)?;
        Ok(row.get("taken"))
    }

    async fn list(&self) -> Result<Vec<Community>> {
        let rows = sqlx::query("SELECT * FROM communities ORDER BY name ASC")
            .fetch_all(self.pool())
            .await
            .map_err(map_db_err)?;
        Ok(rows.iter().map(row_to_community).collect())
    }

    /// Posts cascade via their foreign key, and comments cascade with the
    /// posts; one DELETE is the whole teardown.
    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM communities WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(self.pool())
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    async fn subscribe(&self, user_id: Uuid, community_id: Uuid) -> Result<()> {
        // OR IGNORE keeps re-subscribing a no-op against the pair's
        // primary key.
        sqlx::query(
            "INSERT OR IGNORE INTO subscriptions (user_id, community_id, created_at) \
             VALUES (?, ?, ?)",
        )
        .bind(uuid_to_blob(user_id))
        .bind(uuid_to_blob(community_id))
        .bind(Utc::now())
        .execute(self.pool())
        .await
        .map_err(map_db_err)?;
        Ok(())
    }

    async fn unsubscribe(&self, user_id: Uuid, community_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM subscriptions WHERE user_id = ? AND community_id = ?")
            .bind(uuid_to_blob(user_id))
            .bind(uuid_to_blob(community_id))
            .execute(self.pool())
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    async fn is_subscribed(&self, user_id: Uuid, community_id: Uuid) -> Result<bool> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM subscriptions WHERE user_id = ? AND community_id = ?) \
             AS subscribed",
        )
        .bind(uuid_to_blob(user_id))
        .bind(uuid_to_blob(community_id))
        .fetch_one(self.pool())
        .await
        .map_err(map_db_err)?;
        Ok(row.get("subscribed"))
    }

    async fn subscriber_count(&self, community_id: Uuid) -> Result<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM subscriptions WHERE community_id = ?")
            .bind(uuid_to_blob(community_id))
            .fetch_one(self.pool())
            .await
            .map_err(map_db_err)?;
        Ok(row.get::<i64, _>("n") as u64)
    }
}
