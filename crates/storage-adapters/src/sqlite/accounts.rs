//! `AccountRepo` over the users/profiles tables.

use async_trait::async_trait;
use domains::{AccountRepo, Profile, Result, User};
use sqlx::Row;
use uuid::Uuid;

use super::{blob_to_uuid, map_db_err, uuid_to_blob, SqliteStore};

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> User {
    User {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        is_admin: row.get("is_admin"),
        created_at: row.get("created_at"),
    }
}

fn row_to_profile(row: &sqlx::sqlite::SqliteRow) -> Profile {
    Profile {
        user_id: blob_to_uuid(row.get::<Vec<u8>, _>("user_id").as_slice()),
        bio: row.get("bio"),
        location: row.get("location"),
        avatar_id: row.get("avatar_id"),
    }
}

#[async_trait]
impl AccountRepo for SqliteStore {
    /// User row and blank profile in one transaction: a user without a
    /// profile must never be observable.
    async fn create_user_with_profile(&self, user: &User) -> Result<()> {
        let mut tx = self.pool().begin().await.map_err(map_db_err)?;

        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, is_admin, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(user.id))
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(user.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_err)?;

        sqlx::query("INSERT INTO profiles (user_id) VALUES (?)")
            .bind(uuid_to_blob(user.id))
            .execute(&mut *tx)
            .await
            .map_err(map_db_err)?;

        tx.commit().await.map_err(map_db_err)?;
        Ok(())
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(self.pool())
            .await
            .map_err(map_db_err)?;
        Ok(row.as_ref().map(row_to_user))
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(self.pool())
            .await
            .map_err(map_db_err)?;
        Ok(row.as_ref().map(row_to_user))
    }

    async fn credentials_taken(&self, username: &str, email: &str) -> Result<(bool, bool)> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?) AS username_taken, \
                    EXISTS(SELECT 1 FROM users WHERE email = ?) AS email_taken",
        )
        .bind(username)
        .bind(email)
        .fetch_one(self.pool())
        .await
        .map_err(map_db_err)?;
        Ok((row.get("username_taken"), row.get("email_taken")))
    }

    async fn profile_of(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let row = sqlx::query("SELECT * FROM profiles WHERE user_id = ?")
            .bind(uuid_to_blob(user_id))
            .fetch_optional(self.pool())
            .await
            .map_err(map_db_err)?;
        Ok(row.as_ref().map(row_to_profile))
    }

    async fn update_profile(&self, profile: &Profile) -> Result<()> {
        sqlx::query(
            "UPDATE profiles SET bio = ?, location = ?, avatar_id = ? WHERE user_id = ?",
        )
        .bind(&profile.bio)
        .bind(&profile.location)
        .bind(&profile.avatar_id)
        .bind(uuid_to_blob(profile.user_id))
        .execute(self.pool())
        .await
        .map_err(map_db_err)?;
        Ok(())
    }

    async fn delete_user(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(self.pool())
            .await
            .map_err(map_db_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{mem_store, user};
    use domains::AccountRepo;

    #[tokio::test]
    async fn profile_exists_as_soon_as_the_user_does() {
        let store = mem_store().await;
        let alice = user("alice");
        store.create_user_with_profile(&alice).await.unwrap();

        let profile = store.profile_of(alice.id).await.unwrap().unwrap();
        assert_eq!(profile.user_id, alice.id);
        assert!(profile.bio.is_empty());
        assert!(profile.avatar_id.is_none());
    }

    #[tokio::test]
    async fn deleting_a_user_removes_the_profile() {
        let store = mem_store().await;
        let alice = user("alice");
        store.create_user_with_profile(&alice).await.unwrap();
        store.delete_user(alice.id).await.unwrap();
        assert!(store.profile_of(alice.id).await.unwrap().is_none());
        assert!(store.user_by_id(alice.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn credentials_taken_reports_each_field() {
        let store = mem_store().await;
        store.create_user_with_profile(&user("alice")).await.unwrap();
        let (username_taken, email_taken) = store
            .credentials_taken("alice", "someone-else@example.com")
            .await
            .unwrap();
        assert!(username_taken);
        assert!(!email_taken);
    }
}
