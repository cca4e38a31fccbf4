use crate::r#trait::Expired;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

///Per-client unlocked state. A session only exists once a code or invite
///token has verified; an absent or expired entry means LOCKED.
#[derive(Debug, Clone)]
pub struct GateSession {
    pub valid_code: Option<String>,
    pub invitee_email: Option<String>,
    pub admin: bool,
    expiry: DateTime<Utc>,
}

///Snapshot of the session threaded explicitly into every gated operation,
///so the core never reads ambient request state.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub valid_code: Option<String>,
    pub invitee_email: Option<String>,
}

pub struct GateSessions {
    sessions: RwLock<HashMap<Uuid, GateSession>>,
    lifetime: Duration,
}

impl GateSessions {
    pub fn new(lifetime_seconds: i64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            lifetime: Duration::seconds(lifetime_seconds),
        }
    }

    pub fn lifetime_seconds(&self) -> i64 {
        self.lifetime.num_seconds()
    }

    ///LOCKED -> UNLOCKED via a valid access code. Re-entry while already
    ///unlocked updates the recorded code without restarting the TTL clock.
    pub async fn unlock_with_code(&self, session_id: Option<Uuid>, code: String) -> Uuid {
        self.upsert(session_id, |session| session.valid_code = Some(code))
            .await
    }

    ///LOCKED -> UNLOCKED via a verified invite token.
    pub async fn unlock_with_invite(&self, session_id: Option<Uuid>, email: String) -> Uuid {
        self.upsert(session_id, |session| session.invitee_email = Some(email))
            .await
    }

    pub async fn grant_admin(&self, session_id: Option<Uuid>) -> Uuid {
        self.upsert(session_id, |session| session.admin = true).await
    }

    ///Empty context when the session is absent or past its TTL.
    pub async fn context(&self, session_id: Option<Uuid>) -> SessionContext {
        let Some(session_id) = session_id else {
            return SessionContext::default();
        };
        match self.sessions.read().await.get(&session_id) {
            Some(session) if !session.expiry.expired() => SessionContext {
                valid_code: session.valid_code.to_owned(),
                invitee_email: session.invitee_email.to_owned(),
            },
            _ => SessionContext::default(),
        }
    }

    pub async fn remove_expired(&self) {
        let mut expired: Vec<Uuid> = Vec::new();
        {
            for (session_id, session) in self.sessions.read().await.iter() {
                if session.expiry.expired() {
                    expired.push(*session_id);
                }
            }
        }
        if expired.is_empty() {
            return;
        }
        let mut sessions = self.sessions.write().await;
        for session_id in expired.iter() {
            let _ = sessions.remove(session_id);
        }
    }

    async fn upsert(&self, session_id: Option<Uuid>, apply: impl FnOnce(&mut GateSession)) -> Uuid {
        let mut sessions = self.sessions.write().await;
        if let Some(session_id) = session_id {
            if let Some(session) = sessions.get_mut(&session_id) {
                if !session.expiry.expired() {
                    apply(session);
                    return session_id;
                }
                let _ = sessions.remove(&session_id);
            }
        }
        let session_id = Uuid::new_v4();
        let mut session = GateSession {
            valid_code: None,
            invitee_email: None,
            admin: false,
            expiry: Utc::now() + self.lifetime,
        };
        apply(&mut session);
        sessions.insert(session_id, session);
        session_id
    }
}
