//! `CommentRepo` over the comments table.

use async_trait::async_trait;
use domains::{Comment, CommentRepo, CommentView, Result};
use sqlx::Row;
use uuid::Uuid;

use super::{blob_to_uuid, map_db_err, uuid_to_blob, SqliteStore};

fn row_to_comment(row: &sqlx::sqlite::SqliteRow) -> Comment {
    Comment {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        content: row.get("content"),
        author_id: blob_to_uuid(row.get::<Vec<u8>, _>("author_id").as_slice()),
        post_id: blob_to_uuid(row.get::<Vec<u8>, _>("post_id").as_slice()),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl CommentRepo for SqliteStore {
    async fn create(&self, comment: &Comment) -> Result<()> {
        sqlx::query(
            "INSERT INTO comments (id, content, author_id, post_id, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(comment.id))
        .bind(&comment.content)
        .bind(uuid_to_blob(comment.author_id))
        .bind(uuid_to_blob(comment.post_id))
        .bind(comment.created_at)
        .execute(self.pool())
        .await
        .map_err(map_db_err)?;
        Ok(())
    }

    async fn by_id(&self, id: Uuid) -> Result<Option<Comment>> {
        let row = sqlx::query("SELECT * FROM comments WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(self.pool())
            .await
            .map_err(map_db_err)?;
        Ok(row.as_ref().map(row_to_comment))
    }

    async fn update(&self, comment: &Comment) -> Result<()> {
        sqlx::query("UPDATE comments SET content = ? WHERE id = ?")
            .bind(&comment.content)
            .bind(uuid_to_blob(comment.id))
            .execute(self.pool())
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(self.pool())
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    /// Thread order: oldest first.
    async fn for_post(&self, post_id: Uuid) -> Result<Vec<CommentView>> {
        let rows = sqlx::query(
            "SELECT m.id, m.content, m.author_id, m.post_id, m.created_at, \
                    u.username AS author \
             FROM comments m \
             JOIN users u ON u.id = m.author_id \
             WHERE m.post_id = ? \
             ORDER BY m.created_at ASC, m.id ASC",
        )
        .bind(uuid_to_blob(post_id))
        .fetch_all(self.pool())
        .await
        .map_err(map_db_err)?;
        Ok(rows
            .iter()
            .map(|row| CommentView {
                comment: row_to_comment(row),
                author: row.get("author"),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{mem_store, user};
    use super::*;
    use chrono::Utc;
    use domains::{AccountRepo, Post, PostRepo};

    #[tokio::test]
    async fn comments_come_back_in_thread_order_with_authors() {
        let store = mem_store().await;
        let alice = user("alice");
        let bob = user("bob");
        store.create_user_with_profile(&alice).await.unwrap();
        store.create_user_with_profile(&bob).await.unwrap();

        let post = Post {
            id: Uuid::now_v7(),
            title: "Hello".into(),
            content: None,
            community_id: None,
            author_id: alice.id,
            image_id: None,
            created_at: Utc::now(),
        };
        PostRepo::create(&store, &post).await.unwrap();

        for (author, text) in [(&alice, "first"), (&bob, "second")] {
            CommentRepo::create(
                &store,
                &Comment {
                    id: Uuid::now_v7(),
                    content: text.into(),
                    author_id: author.id,
                    post_id: post.id,
                    created_at: Utc::now(),
                },
            )
            .await
            .unwrap();
        }

        let thread = store.for_post(post.id).await.unwrap();
        assert_eq!(thread.len(), 2);
        assert_eq!(thread[0].comment.content, "first");
        assert_eq!(thread[0].author, "alice");
        assert_eq!(thread[1].author, "bob");
    }
}
