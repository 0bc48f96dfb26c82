use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::ClientError;
use crate::platform::KeyValueStore;

/// Storage key holding the raw session token
pub const TOKEN_KEY: &str = "token";
/// Storage key holding the cached user profile (JSON)
pub const PROFILE_KEY: &str = "user_profile";

/// Cached identity of the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<String>,
    pub nickname: String,
    #[serde(default)]
    pub avatar_url: String,
}

/// The client's current authentication state
///
/// An empty token means unauthenticated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub profile: Option<UserProfile>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.profile.as_ref().and_then(|p| p.id.as_deref())
    }
}

/// Holder of the one live [`Session`] per client instance
///
/// All mutation goes through `set`/`clear`; everything else reads snapshots.
/// `clear` is idempotent and safe to call from both the gateway's 401
/// handling and an explicit logout.
pub struct SessionStore {
    store: Box<dyn KeyValueStore>,
    session: RwLock<Session>,
    changes: watch::Sender<Session>,
}

impl SessionStore {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        let (changes, _) = watch::channel(Session::default());
        Self {
            store,
            session: RwLock::new(Session::default()),
            changes,
        }
    }

    /// Restore a persisted session, if any.
    ///
    /// A missing or unreadable store entry leaves the client unauthenticated
    /// rather than failing startup.
    pub async fn init(&self) {
        let token = match self.store.get(TOKEN_KEY).await {
            Ok(Some(token)) => token,
            Ok(None) => {
                info!("No persisted session, starting unauthenticated");
                return;
            }
            Err(e) => {
                warn!("Failed to read persisted token: {}", e);
                return;
            }
        };

        let profile = match self.store.get(PROFILE_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<UserProfile>(&raw) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    warn!("Discarding unreadable cached profile: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to read cached profile: {}", e);
                None
            }
        };

        info!("Restored persisted session");
        self.replace(Session { token, profile });
    }

    /// Store and persist a new session after login
    pub async fn set(
        &self,
        token: &str,
        profile: Option<UserProfile>,
    ) -> Result<(), ClientError> {
        self.store
            .set(TOKEN_KEY, token)
            .await
            .map_err(ClientError::storage)?;

        if let Some(profile) = &profile {
            let raw = serde_json::to_string(profile).map_err(ClientError::storage)?;
            self.store
                .set(PROFILE_KEY, &raw)
                .await
                .map_err(ClientError::storage)?;
        } else {
            self.store
                .remove(PROFILE_KEY)
                .await
                .map_err(ClientError::storage)?;
        }

        self.replace(Session {
            token: token.to_string(),
            profile,
        });
        Ok(())
    }

    /// Drop the session, persisted and in-memory. Idempotent.
    ///
    /// Persistence failures are logged, not propagated: the in-memory state
    /// must always end up unauthenticated.
    pub async fn clear(&self) {
        if let Err(e) = self.store.remove(TOKEN_KEY).await {
            warn!("Failed to remove persisted token: {}", e);
        }
        if let Err(e) = self.store.remove(PROFILE_KEY).await {
            warn!("Failed to remove cached profile: {}", e);
        }

        let was_authenticated = self.current().is_authenticated();
        self.replace(Session::default());
        if was_authenticated {
            info!("Session cleared");
        }
    }

    /// Synchronous snapshot of the present session
    pub fn current(&self) -> Session {
        self.session
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Watch session changes; receivers see every `set`/`clear`
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.changes.subscribe()
    }

    fn replace(&self, session: Session) {
        {
            let mut current = self.session.write().unwrap_or_else(|e| e.into_inner());
            *current = session.clone();
        }
        // Receivers may all be gone; that is fine
        let _ = self.changes.send(session);
    }
}
