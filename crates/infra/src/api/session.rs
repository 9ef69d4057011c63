//! Signed-in user session
//!
//! Wraps the auth endpoints with the client-side bookkeeping that goes with
//! them: storing the token pair after login, caching the user under
//! `currentUser`, and clearing both on logout or when the session can no
//! longer be refreshed.

use std::path::Path;
use std::sync::Arc;

use mentiq_common::{KeyValueStore, StorageError, TokenPair, TokenStore};
use mentiq_domain::constants::CURRENT_USER_KEY;
use mentiq_domain::{MediaCategory, MediaKind, Role, User};
use parking_lot::RwLock;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::errors::ApiError;
use super::resources::{AuthApi, MediaApi, ProfileChanges, Registration};

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("This account is registered as a {role}. Please select the correct role.")]
    RoleMismatch { role: String },

    #[error("No user logged in")]
    NotSignedIn,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Token pair from a login response: `{tokens: {access, refresh}}` or a flat
/// `{access, refresh}`
fn tokens_from_login(data: &Value) -> Option<TokenPair> {
    let source = data.get("tokens").filter(|tokens| tokens.is_object()).unwrap_or(data);
    let access = source.get("access").and_then(Value::as_str).filter(|a| !a.is_empty())?;
    let refresh = source.get("refresh").and_then(Value::as_str).unwrap_or_default();
    Some(TokenPair::new(access, refresh))
}

/// Signed-in user state backed by the token store and a key-value cache
pub struct Session {
    auth: AuthApi,
    media: MediaApi,
    tokens: Arc<TokenStore>,
    storage: Arc<dyn KeyValueStore>,
    user: RwLock<Option<User>>,
}

impl Session {
    pub fn new(
        auth: AuthApi,
        media: MediaApi,
        tokens: Arc<TokenStore>,
        storage: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self { auth, media, tokens, storage, user: RwLock::new(None) }
    }

    pub fn current_user(&self) -> Option<User> {
        self.user.read().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.read().is_some()
    }

    /// Sign in as `role`
    ///
    /// # Errors
    ///
    /// [`SessionError::RoleMismatch`] when the account has another role; the
    /// tokens stored by the login are cleared again.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str, role: Role) -> Result<User, SessionError> {
        let data = self.auth.login(email, password).await?;

        if let Some(pair) = tokens_from_login(&data) {
            self.tokens.set(pair).await?;
        } else {
            warn!("login response carried no tokens");
        }

        let user = User::from_login(&data, email, role);
        if user.role != role.as_str() {
            if let Err(err) = self.tokens.clear().await {
                warn!(error = %err, "failed to clear tokens after role mismatch");
            }
            return Err(SessionError::RoleMismatch { role: user.role });
        }

        *self.user.write() = Some(user.clone());
        self.persist_user(&user).await?;
        info!(user_id = %user.id, %role, "signed in");
        Ok(user)
    }

    /// Create an account; the user still has to sign in
    #[instrument(skip(self, password))]
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: Role,
    ) -> Result<(), SessionError> {
        self.auth.register(&Registration::new(email, password, name, role)).await?;
        info!(%role, "account registered");
        Ok(())
    }

    /// Sign out. The server call is best effort; local state is always
    /// cleared.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if let Some(refresh) = self.tokens.refresh_token().await.filter(|r| !r.is_empty()) {
            if let Err(err) = self.auth.logout(&refresh).await {
                debug!(error = %err, "logout request failed");
            }
        }
        self.clear_local().await;
        info!("signed out");
    }

    /// Restore the cached user and validate it against the profile endpoint
    ///
    /// Returns `None` when nothing is cached or validation fails; in the
    /// latter case tokens and cache are cleared.
    #[instrument(skip(self))]
    pub async fn restore(&self) -> Option<User> {
        let cached = self.load_cached_user().await?;
        *self.user.write() = Some(cached.clone());

        let has_access = self.tokens.access_token().await.is_some_and(|a| !a.is_empty());
        if !has_access {
            return Some(cached);
        }

        match self.auth.profile().await {
            Ok(data) => {
                let fresh = User::from_profile(&data, &cached);
                *self.user.write() = Some(fresh.clone());
                if let Err(err) = self.persist_user(&fresh).await {
                    warn!(error = %err, "failed to cache refreshed user");
                }
                debug!(user_id = %fresh.id, "session restored");
                Some(fresh)
            }
            Err(err) => {
                warn!(error = %err, "stored session is no longer valid");
                self.clear_local().await;
                None
            }
        }
    }

    /// Update name, bio and optionally the profile picture
    #[instrument(skip(self, bio, image))]
    pub async fn update_profile(
        &self,
        name: &str,
        bio: &str,
        image: Option<&Path>,
    ) -> Result<User, SessionError> {
        let current = self.current_user().ok_or(SessionError::NotSignedIn)?;

        let mut profile_image = current.profile_image.clone();
        if let Some(path) = image {
            profile_image =
                self.media.upload_file(path, MediaKind::Image, MediaCategory::Profile).await?;
        }

        let changes = ProfileChanges {
            name: Some(name.to_string()),
            bio: Some(bio.to_string()),
            profile_image: Some(profile_image.clone()).filter(|image| !image.is_empty()),
        };
        let data = self.auth.update_profile(&changes).await?;

        let updated = current.with_profile_update(&data, name, bio, &profile_image);
        *self.user.write() = Some(updated.clone());
        self.persist_user(&updated).await?;
        Ok(updated)
    }

    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), SessionError> {
        self.auth.change_password(old_password, new_password).await?;
        Ok(())
    }

    pub async fn update_fcm_token(&self, fcm_token: &str) -> Result<(), SessionError> {
        self.auth.update_fcm_token(fcm_token).await?;
        Ok(())
    }

    /// Drop the signed-in user after the token store has been cleared
    ///
    /// Called from the auth-failure handler, which cannot await; removal of
    /// the cached user is spawned when a runtime is available.
    pub fn reset(&self) {
        self.user.write().take();

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let storage = self.storage.clone();
            handle.spawn(async move {
                if let Err(err) = storage.remove_item(CURRENT_USER_KEY).await {
                    warn!(error = %err, "failed to remove cached user");
                }
            });
        }
        info!("session reset after authentication failure");
    }

    async fn clear_local(&self) {
        if let Err(err) = self.tokens.clear().await {
            warn!(error = %err, "failed to clear tokens");
        }
        self.user.write().take();
        if let Err(err) = self.storage.remove_item(CURRENT_USER_KEY).await {
            warn!(error = %err, "failed to remove cached user");
        }
    }

    async fn persist_user(&self, user: &User) -> Result<(), StorageError> {
        let raw = serde_json::to_string(user)?;
        self.storage.set_item(CURRENT_USER_KEY, &raw).await
    }

    async fn load_cached_user(&self) -> Option<User> {
        let raw = match self.storage.get_item(CURRENT_USER_KEY).await {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(error = %err, "failed to read cached user");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!(error = %err, "discarding malformed cached user");
                None
            }
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("logged_in", &self.is_logged_in()).finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn tokens_are_read_from_either_shape() {
        let nested = json!({ "tokens": { "access": "a1", "refresh": "r1" }, "user": {} });
        assert_eq!(tokens_from_login(&nested), Some(TokenPair::new("a1", "r1")));

        let flat = json!({ "access": "a2", "refresh": "r2" });
        assert_eq!(tokens_from_login(&flat), Some(TokenPair::new("a2", "r2")));

        assert_eq!(tokens_from_login(&json!({ "user": {} })), None);
    }

    #[test]
    fn role_mismatch_message_names_the_role() {
        let err = SessionError::RoleMismatch { role: "teacher".into() };
        assert_eq!(
            err.to_string(),
            "This account is registered as a teacher. Please select the correct role."
        );
    }
}
