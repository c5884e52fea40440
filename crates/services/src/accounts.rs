//! # Accounts
//!
//! Registration, login, and profile maintenance. User creation and its
//! one-and-only profile happen as a single explicit transactional step in
//! the account repository, never as an implicit side effect.

use std::sync::Arc;

use chrono::Utc;
use domains::{
    AccountRepo, Error, FieldErrors, MediaStorage, PasswordHasher, Profile, Result,
    SessionTokens, Upload, User, UserHandle,
};

use crate::content::ensure_image;

/// Username limits lifted from the original identity model.
pub const MAX_USERNAME_LEN: usize = 150;
pub const MIN_PASSWORD_LEN: usize = 8;

fn valid_username_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.' | '@' | '+')
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Profile fields the owner may change; `None` leaves a field unchanged.
#[derive(Debug, Default)]
pub struct ProfileEdit {
    pub bio: Option<String>,
    pub location: Option<String>,
}

pub struct AccountService {
    accounts: Arc<dyn AccountRepo>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn SessionTokens>,
    media: Arc<dyn MediaStorage>,
}

impl AccountService {
    pub fn new(
        accounts: Arc<dyn AccountRepo>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn SessionTokens>,
        media: Arc<dyn MediaStorage>,
    ) -> Self {
        Self {
            accounts,
            hasher,
            tokens,
            media,
        }
    }

    pub async fn register(&self, reg: Registration) -> Result<UserHandle> {
        let username = reg.username.trim().to_string();
        let email = reg.email.trim().to_string();

        let mut errors = FieldErrors::new();
        if username.is_empty() {
            errors.push("username", "may not be empty");
        } else if username.len() > MAX_USERNAME_LEN {
            errors.push(
                "username",
                format!("may not exceed {MAX_USERNAME_LEN} characters"),
            );
        } else if !username.chars().all(valid_username_char) {
            errors.push("username", "contains invalid characters");
        }
        if email.is_empty() || !email.contains('@') {
            errors.push("email", "enter a valid email address");
        }
        if reg.password.len() < MIN_PASSWORD_LEN {
            errors.push(
                "password",
                format!("must be at least {MIN_PASSWORD_LEN} characters"),
            );
        }
        if errors.is_empty() {
            let (username_taken, email_taken) =
                self.accounts.credentials_taken(&username, &email).await?;
            if username_taken {
                errors.push("username", "already in use");
            }
            if email_taken {
                errors.push("email", "already in use");
            }
        }
        errors.into_result()?;

        let user = User {
            id: uuid::Uuid::now_v7(),
            username,
            email,
            password_hash: self.hasher.hash(&reg.password)?,
            is_admin: false,
            created_at: Utc::now(),
        };
        // User row and blank profile land in the same transaction.
        self.accounts.create_user_with_profile(&user).await?;
        tracing::info!(user = %user.username, "account registered");
        Ok(user.handle())
    }

    /// Verifies credentials and issues a session token.
    pub async fn login(&self, username: &str, password: &str) -> Result<(UserHandle, String)> {
        let user = self
            .accounts
            .user_by_username(username.trim())
            .await?
            .ok_or(Error::Unauthenticated)?;
        if !self.hasher.verify(password, &user.password_hash) {
            tracing::warn!(user = username, "failed login attempt");
            return Err(Error::Unauthenticated);
        }
        let handle = user.handle();
        let token = self.tokens.issue(&handle)?;
        Ok((handle, token))
    }

    pub async fn profile(&self, username: &str) -> Result<(User, Profile)> {
        let user = self
            .accounts
            .user_by_username(username)
            .await?
            .ok_or_else(|| Error::NotFound("user", username.to_string()))?;
        let profile = self
            .accounts
            .profile_of(user.id)
            .await?
            .ok_or_else(|| Error::NotFound("profile", username.to_string()))?;
        Ok((user, profile))
    }

    /// Owners edit their own profile; there is no cross-user path here.
    pub async fn update_profile(&self, actor: &UserHandle, edit: ProfileEdit) -> Result<Profile> {
        let mut profile = self
            .accounts
            .profile_of(actor.id)
            .await?
            .ok_or_else(|| Error::NotFound("profile", actor.username.clone()))?;
        if let Some(bio) = edit.bio {
            profile.bio = bio.trim().to_string();
        }
        if let Some(location) = edit.location {
            profile.location = location.trim().to_string();
        }
        self.accounts.update_profile(&profile).await?;
        Ok(profile)
    }

    pub async fn set_avatar(&self, actor: &UserHandle, upload: Upload) -> Result<Profile> {
        ensure_image(&upload, "avatar")?;
        let mut profile = self
            .accounts
            .profile_of(actor.id)
            .await?
            .ok_or_else(|| Error::NotFound("profile", actor.username.clone()))?;
        profile.avatar_id = Some(self.media.save(upload.data, &upload.content_type).await?);
        self.accounts.update_profile(&profile).await?;
        Ok(profile)
    }
}
