//! `PostRepo` over the posts table, including the feed queries.
//!
//! Feed rows come back denormalized: author username, community name/slug,
//! and the on-demand score aggregated from the vote table in the same
//! statement.

use async_trait::async_trait;
use domains::{CommunityRef, FeedScope, Post, PostRepo, PostView, Result};
use sqlx::Row;
use uuid::Uuid;

use super::{blob_to_uuid, map_db_err, uuid_to_blob, SqliteStore};

const VIEW_SELECT: &str = "SELECT p.id, p.title, p.content, p.community_id, p.author_id, \
            p.image_id, p.created_at, \
            u.username AS author, \
            c.name AS community_name, c.slug AS community_slug, \
            COALESCE((SELECT SUM(v.direction) FROM post_votes v WHERE v.post_id = p.id), 0) \
                AS score \
     FROM posts p \
     JOIN users u ON u.id = p.author_id \
     LEFT JOIN communities c ON c.id = p.community_id";

fn row_to_post(row: &sqlx::sqlite::SqliteRow) -> Post {
    Post {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        title: row.get("title"),
        content: row.get("content"),
        community_id: row
            .get::<Option<Vec<u8>>, _>("community_id")
            .map(|blob| blob_to_uuid(blob.as_slice())),
        author_id: blob_to_uuid(row.get::<Vec<u8>, _>("author_id").as_slice()),
        image_id: row.get("image_id"),
        created_at: row.get("created_at"),
    }
}

fn row_to_view(row: &sqlx::sqlite::SqliteRow) -> PostView {
    let community = row
        .get::<Option<String>, _>("community_name")
        .map(|name| CommunityRef {
            name,
            slug: row.get("community_slug"),
        });
    PostView {
        post: row_to_post(row),
        author: row.get("author"),
        community,
        score: row.get("score"),
    }
}

/// WHERE fragment plus the bound key for a feed scope.
fn scope_filter(scope: &FeedScope) -> (&'static str, Option<Vec<u8>>) {
    match scope {
        FeedScope::Global => ("", None),
        FeedScope::Community(id) => ("WHERE p.community_id = ?", Some(uuid_to_blob(*id))),
        FeedScope::Author(id) => ("WHERE p.author_id = ?", Some(uuid_to_blob(*id))),
    }
}

#[async_trait]
impl PostRepo for SqliteStore {
    async fn create(&self, post: &Post) -> Result<()> {
        sqlx::query(
            "INSERT INTO posts (id, title, content, community_id, author_id, image_id, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(post.id))
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.community_id.map(uuid_to_blob))
        .bind(uuid_to_blob(post.author_id))
        .bind(&post.image_id)
        .bind(post.created_at)
        .execute(self.pool())
        .await
        .map_err(map_db_err)?;
        Ok(())
    }

    async fn by_id(&self, id: Uuid) -> Result<Option<Post>> {
        let row = sqlx::query("SELECT * FROM posts WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(self.pool())
            .await
            .map_err(map_db_err)?;
        Ok(row.as_ref().map(row_to_post))
    }

    async fn view_by_id(&self, id: Uuid) -> Result<Option<PostView>> {
        let sql = format!("{VIEW_SELECT} WHERE p.id = ?");
        let row = sqlx::query(&sql)
            .bind(uuid_to_blob(id))
            .fetch_optional(self.pool())
            .await
            .map_err(map_db_err)?;
        Ok(row.as_ref().map(row_to_view))
    }

    async fn update(&self, post: &Post) -> Result<()> {
        sqlx::query("UPDATE posts SET title = ?, content = ? WHERE id = ?")
            .bind(&post.title)
            .bind(&post.content)
            .bind(uuid_to_blob(post.id))
            .execute(self.pool())
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(self.pool())
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    async fn count(&self, scope: &FeedScope) -> Result<u64> {
        let (filter, key) = scope_filter(scope);
        let sql = format!("SELECT COUNT(*) AS n FROM posts p {filter}");
        let mut query = sqlx::query(&sql);
        if let Some(key) = key {
            query = query.bind(key);
        }
        let row = query.fetch_one(self.pool()).await.map_err(map_db_err)?;
        Ok(row.get::<i64, _>("n") as u64)
    }

    async fn list_page(
        &self,
        scope: &FeedScope,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<PostView>> {
        let (filter, key) = scope_filter(scope);
        // id is a v7 uuid, so the secondary key keeps same-timestamp rows
        // in creation order.
        let sql = format!(
            "{VIEW_SELECT} {filter} ORDER BY p.created_at DESC, p.id DESC LIMIT ? OFFSET ?"
        );
        let mut query = sqlx::query(&sql);
        if let Some(key) = key {
            query = query.bind(key);
        }
        let rows = query
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(self.pool())
            .await
            .map_err(map_db_err)?;
        Ok(rows.iter().map(row_to_view).collect())
    }
}
