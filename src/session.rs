use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub uid: String,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: String, uid: String) -> Self {
        let now = Utc::now();
        Self {
            token,
            uid,
            created_at: now,
            last_active: now,
            expires_at: now + Duration::hours(24),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    pub fn touch(&mut self) {
        self.last_active = Utc::now();
        self.expires_at = Utc::now() + Duration::hours(24);
    }
}

/// Opaque tokens mapping back to member uids, with a 24h sliding expiry.
#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn create_session(&self, uid: String) -> Session {
        let token = uuid::Uuid::new_v4().to_string();
        let session = Session::new(token, uid);

        self.sessions
            .write()
            .await
            .insert(session.token.clone(), session.clone());
        session
    }

    pub async fn get_session(&self, token: &str) -> Option<Session> {
        let mut sessions = self.sessions.write().await;

        if let Some(session) = sessions.get_mut(token) {
            if session.is_expired() {
                sessions.remove(token);
                return None;
            }

            session.touch();
            Some(session.clone())
        } else {
            None
        }
    }

    /// The member uid behind a live session token.
    pub async fn resolve_uid(&self, token: &str) -> Option<String> {
        self.get_session(token).await.map(|s| s.uid)
    }

    pub async fn cleanup_expired_sessions(&self) {
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, session| !session.is_expired());
    }

    pub async fn get_session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
