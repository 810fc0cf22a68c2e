//! Shared-secret gate for the admin surface.
//!
//! This keeps casual visitors out of the admin API and nothing more. The
//! secret is compared as plain text, there is no lockout or rate limiting,
//! and the only state is a marker in the visitor's session.

use secrecy::{ExposeSecret, SecretString};
use tower_sessions::Session;

use crate::storage::keys;

/// Checks the admin secret and tracks the login marker in the session.
#[derive(Clone)]
pub struct AuthGate {
    secret: SecretString,
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate").finish_non_exhaustive()
    }
}

impl AuthGate {
    #[must_use]
    pub const fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Whether `attempt` equals the configured secret.
    #[must_use]
    pub fn matches(&self, attempt: &str) -> bool {
        !attempt.is_empty() && attempt == self.secret.expose_secret()
    }

    /// Log in with `attempt`.
    ///
    /// On a match the session marker is set and `true` returned. On a
    /// mismatch the session is left alone and `false` returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn login(
        &self,
        session: &Session,
        attempt: &str,
    ) -> Result<bool, tower_sessions::session::Error> {
        if !self.matches(attempt) {
            tracing::info!("Admin login rejected");
            return Ok(false);
        }
        session.cycle_id().await?;
        session.insert(keys::ADMIN_AUTH, true).await?;
        tracing::info!("Admin logged in");
        Ok(true)
    }

    /// Clear the session marker.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn logout(session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.remove::<bool>(keys::ADMIN_AUTH).await?;
        Ok(())
    }

    /// Whether the session carries the login marker.
    pub async fn is_authenticated(session: &Session) -> bool {
        session
            .get::<bool>(keys::ADMIN_AUTH)
            .await
            .ok()
            .flatten()
            .unwrap_or(false)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn gate() -> AuthGate {
        AuthGate::new(SecretString::from("open-sesame"))
    }

    #[tokio::test]
    async fn test_wrong_secret_sets_nothing() {
        let session = session();
        assert!(!gate().login(&session, "wrong").await.unwrap());
        assert!(!gate().login(&session, "").await.unwrap());
        assert!(!AuthGate::is_authenticated(&session).await);
        assert!(session.is_empty().await);
    }

    #[tokio::test]
    async fn test_login_then_logout() {
        let session = session();
        assert!(gate().login(&session, "open-sesame").await.unwrap());
        assert!(AuthGate::is_authenticated(&session).await);
        assert_eq!(
            session.get::<bool>(keys::ADMIN_AUTH).await.unwrap(),
            Some(true)
        );

        AuthGate::logout(&session).await.unwrap();
        assert!(!AuthGate::is_authenticated(&session).await);
        // Logging out twice is fine.
        AuthGate::logout(&session).await.unwrap();
    }

    #[test]
    fn test_debug_hides_secret() {
        assert!(!format!("{:?}", gate()).contains("open-sesame"));
    }
}
