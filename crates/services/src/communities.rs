//! # Communities
//!
//! Community creation (with one-time slug derivation), lookup, admin-gated
//! deletion, and the subscribe/unsubscribe membership toggle.

use std::sync::Arc;

use chrono::Utc;
use domains::{Community, CommunityRepo, Error, FieldErrors, Result, UserHandle};

/// Original schema caps the name column at 100 characters.
pub const MAX_NAME_LEN: usize = 100;

/// Derives the URL slug from a community name: lowercased ASCII
/// alphanumerics with every other run of characters collapsed to a single
/// hyphen. Assigned once at creation and never recomputed.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(ch.to_ascii_lowercase());
            pending_hyphen = false;
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

pub struct CommunityService {
    communities: Arc<dyn CommunityRepo>,
}

impl CommunityService {
    pub fn new(communities: Arc<dyn CommunityRepo>) -> Self {
        Self { communities }
    }

    pub async fn create(
        &self,
        creator: &UserHandle,
        name: &str,
        description: Option<String>,
    ) -> Result<Community> {
        let name = name.trim();
        let mut errors = FieldErrors::new();
        if name.is_empty() {
            errors.push("name", "may not be empty");
        } else if name.len() > MAX_NAME_LEN {
            errors.push("name", format!("may not exceed {MAX_NAME_LEN} characters"));
        } else if slugify(name).is_empty() {
            errors.push("name", "must contain letters or digits");
        } else if self.communities.name_taken(name).await? {
            errors.push("name", "a community with this name already exists");
        }
        errors.into_result()?;

        let community = Community {
            id: uuid::Uuid::now_v7(),
            name: name.to_string(),
            slug: slugify(name),
            description: description.and_then(|d| {
                let d = d.trim().to_string();
                (!d.is_empty()).then_some(d)
            }),
            created_at: Utc::now(),
        };
        self.communities.create(&community).await?;
        tracing::info!(community = %community.slug, creator = %creator.username, "community created");
        Ok(community)
    }

    pub async fn get(&self, slug: &str) -> Result<Community> {
        self.communities
            .by_slug(slug)
            .await?
            .ok_or_else(|| Error::NotFound("community", slug.to_string()))
    }

    pub async fn list(&self) -> Result<Vec<Community>> {
        self.communities.list().await
    }

    /// Deleting a community cascades to all its posts (and their comments).
    /// The original exposed this only through its admin surface, so the
    /// actor must hold the admin flag.
    pub async fn delete(&self, actor: &UserHandle, slug: &str) -> Result<()> {
        if !actor.is_admin {
            tracing::warn!(actor = %actor.username, community = slug, "non-admin community deletion refused");
            return Err(Error::Forbidden("community deletion is admin-only"));
        }
        let community = self.get(slug).await?;
        self.communities.delete(community.id).await?;
        tracing::info!(community = slug, actor = %actor.username, "community deleted");
        Ok(())
    }

    /// Idempotent: re-subscribing is a no-op, the (user, community) pair
    /// exists at most once.
    pub async fn subscribe(&self, actor: &UserHandle, slug: &str) -> Result<()> {
        let community = self.get(slug).await?;
        self.communities.subscribe(actor.id, community.id).await
    }

    pub async fn unsubscribe(&self, actor: &UserHandle, slug: &str) -> Result<()> {
        let community = self.get(slug).await?;
        self.communities.unsubscribe(actor.id, community.id).await
    }

    pub async fn is_subscribed(&self, actor: &UserHandle, slug: &str) -> Result<bool> {
        let community = self.get(slug).await?;
        self.communities.is_subscribed(actor.id, community.id).await
    }

    pub async fn subscriber_count(&self, slug: &str) -> Result<u64> {
        let community = self.get(slug).await?;
        self.communities.subscriber_count(community.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::MockCommunityRepo;
    use uuid::Uuid;

    fn admin() -> UserHandle {
        UserHandle {
            id: Uuid::now_v7(),
            username: "admin".into(),
            is_admin: true,
        }
    }

    fn member() -> UserHandle {
        UserHandle {
            id: Uuid::now_v7(),
            username: "carol".into(),
            is_admin: false,
        }
    }

    #[test]
    fn slugs_are_lowercased_and_hyphenated() {
        assert_eq!(slugify("gaming"), "gaming");
        assert_eq!(slugify("Rust Programming"), "rust-programming");
        assert_eq!(slugify("  C++  tips!  "), "c-tips");
        assert_eq!(slugify("---"), "");
    }

    #[tokio::test]
    async fn duplicate_name_is_a_field_error() {
        let mut repo = MockCommunityRepo::new();
        repo.expect_name_taken().returning(|_| Ok(true));
        let service = CommunityService::new(Arc::new(repo));
        let err = service
            .create(&member(), "gaming", None)
            .await
            .unwrap_err();
        match err {
            Error::Validation(fields) => assert_eq!(fields.errors[0].field, "name"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn deletion_requires_the_admin_flag() {
        let service = CommunityService::new(Arc::new(MockCommunityRepo::new()));
        assert!(matches!(
            service.delete(&member(), "gaming").await,
            Err(Error::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn admin_deletion_resolves_the_slug_first() {
        let mut repo = MockCommunityRepo::new();
        repo.expect_by_slug().returning(|_| Ok(None));
        let service = CommunityService::new(Arc::new(repo));
        assert!(matches!(
            service.delete(&admin(), "ghost").await,
            Err(Error::NotFound("community", _))
        ));
    }
}
