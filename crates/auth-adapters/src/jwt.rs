//! Stateless session tokens: HS256 JWTs carrying the user handle and an
//! expiry claim. Nothing is stored server-side; revocation happens by
//! letting tokens age out.

use chrono::{Duration, Utc};
use domains::{Error, Result, SessionTokens, UserHandle};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id.
    sub: Uuid,
    /// Username at issue time.
    name: String,
    /// Admin flag at issue time.
    adm: bool,
    /// Expiry, seconds since the epoch.
    exp: i64,
}

pub struct JwtSessions {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtSessions {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }
}

impl SessionTokens for JwtSessions {
    fn issue(&self, user: &UserHandle) -> Result<String> {
        let claims = Claims {
            sub: user.id,
            name: user.username.clone(),
            adm: user.is_admin,
            exp: (Utc::now() + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| Error::Internal(anyhow::anyhow!("token signing failed: {e}")))
    }

    fn verify(&self, token: &str) -> Result<UserHandle> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|_| Error::Unauthenticated)?;
        Ok(UserHandle {
            id: data.claims.sub,
            username: data.claims.name,
            is_admin: data.claims.adm,
        })
    }
}
