//! `VoteStore` over the post_votes table.
//!
//! Each apply runs read + resolve + write inside one transaction, so two
//! concurrent intents from the same voter serialize; the (post, voter)
//! primary key rejects any duplicate membership that would slip through.

use async_trait::async_trait;
use chrono::Utc;
use domains::{votes::resolve, Error, Result, VoteDirection, VoteOp, VoteStore};
use sqlx::Row;
use uuid::Uuid;

use super::{map_db_err, uuid_to_blob, SqliteStore};

fn direction_from_i64(raw: i64) -> Result<VoteDirection> {
    match raw {
        1 => Ok(VoteDirection::Up),
        -1 => Ok(VoteDirection::Down),
        other => Err(Error::Internal(anyhow::anyhow!(
            "corrupt vote direction {other}"
        ))),
    }
}

#[async_trait]
impl VoteStore for SqliteStore {
    async fn apply(
        &self,
        post_id: Uuid,
        voter_id: Uuid,
        intent: VoteDirection,
    ) -> Result<VoteOp> {
        let mut tx = self.pool().begin().await.map_err(map_db_err)?;

        let current = sqlx::query(
            "SELECT direction FROM post_votes WHERE post_id = ? AND voter_id = ?",
        )
        .bind(uuid_to_blob(post_id))
        .bind(uuid_to_blob(voter_id))
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_err)?
        .map(|row| direction_from_i64(row.get("direction")))
        .transpose()?;

        let op = resolve(current, intent);
        match op {
            VoteOp::Retract => {
                sqlx::query("DELETE FROM post_votes WHERE post_id = ? AND voter_id = ?")
                    .bind(uuid_to_blob(post_id))
                    .bind(uuid_to_blob(voter_id))
                    .execute(&mut *tx)
                    .await
                    .map_err(map_db_err)?;
            }
            VoteOp::Switch(direction) => {
                sqlx::query(
                    "UPDATE post_votes SET direction = ?, created_at = ? \
                     WHERE post_id = ? AND voter_id = ?",
                )
                .bind(direction.delta())
                .bind(Utc::now())
                .bind(uuid_to_blob(post_id))
                .bind(uuid_to_blob(voter_id))
                .execute(&mut *tx)
                .await
                .map_err(map_db_err)?;
            }
            VoteOp::Cast(direction) => {
                sqlx::query(
                    "INSERT INTO post_votes (post_id, voter_id, direction, created_at) \
                     VALUES (?, ?, ?, ?)",
                )
                .bind(uuid_to_blob(post_id))
                .bind(uuid_to_blob(voter_id))
                .bind(direction.delta())
                .bind(Utc::now())
                .execute(&mut *tx)
                .await
                .map_err(map_db_err)?;
            }
        }

        tx.commit().await.map_err(map_db_err)?;
        Ok(op)
    }

    async fn direction_of(
        &self,
        post_id: Uuid,
        voter_id: Uuid,
    ) -> Result<Option<VoteDirection>> {
        sqlx::query("SELECT direction FROM post_votes WHERE post_id = ? AND voter_id = ?")
            .bind(uuid_to_blob(post_id))
            .bind(uuid_to_blob(voter_id))
            .fetch_optional(self.pool())
            .await
            .map_err(map_db_err)?
            .map(|row| direction_from_i64(row.get("direction")))
            .transpose()
    }

    /// Up minus down, straight from the direction column.
    async fn score(&self, post_id: Uuid) -> Result<i64> {
        let row = sqlx::query(
            "SELECT COALESCE(SUM(direction), 0) AS score FROM post_votes WHERE post_id = ?",
        )
        .bind(uuid_to_blob(post_id))
        .fetch_one(self.pool())
        .await
        .map_err(map_db_err)?;
        Ok(row.get("score"))
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{mem_store, user};
    use super::*;
    use domains::{AccountRepo, Post, PostRepo};

    async fn seeded() -> (SqliteStore, Uuid, Uuid) {
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
        (store, post.id, bob.id)
    }

    #[tokio::test]
    async fn cast_retract_cast_cycle() {
        let (store, post_id, bob) = seeded().await;

        let op = store.apply(post_id, bob, VoteDirection::Up).await.unwrap();
        assert_eq!(op, VoteOp::Cast(VoteDirection::Up));
        assert_eq!(store.score(post_id).await.unwrap(), 1);

        let op = store.apply(post_id, bob, VoteDirection::Up).await.unwrap();
        assert_eq!(op, VoteOp::Retract);
        assert_eq!(store.score(post_id).await.unwrap(), 0);
        assert_eq!(store.direction_of(post_id, bob).await.unwrap(), None);
    }

    #[tokio::test]
    async fn switch_moves_the_membership_across() {
        let (store, post_id, bob) = seeded().await;

        store.apply(post_id, bob, VoteDirection::Down).await.unwrap();
        assert_eq!(store.score(post_id).await.unwrap(), -1);

        let op = store.apply(post_id, bob, VoteDirection::Up).await.unwrap();
        assert_eq!(op, VoteOp::Switch(VoteDirection::Up));
        assert_eq!(
            store.direction_of(post_id, bob).await.unwrap(),
            Some(VoteDirection::Up)
        );
        // A switch moves the score by exactly two.
        assert_eq!(store.score(post_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn deleting_the_post_drops_its_votes() {
        let (store, post_id, bob) = seeded().await;
        store.apply(post_id, bob, VoteDirection::Up).await.unwrap();
        PostRepo::delete(&store, post_id).await.unwrap();
        assert_eq!(store.direction_of(post_id, bob).await.unwrap(), None);
    }
}
