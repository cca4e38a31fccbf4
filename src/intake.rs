use crate::{
    access_code::AccessCodeRegistry,
    config::Config,
    error::{AuthError, Error},
    gate_session::{GateSessions, SessionContext},
    invite_token::{InvitePayload, InviteTokenCodec},
    notify::{Notification, NotifyHandle},
    store::RecordStore,
    validate::{validate, Rejection, SubmissionType},
};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone)]
pub struct SubmissionReceipt {
    pub id: String,
}

///Normal outcomes of a submission. Storage and configuration failures use
///Error instead; a Rejection never touches the store.
#[derive(Debug)]
pub enum SubmissionOutcome {
    Accepted(SubmissionReceipt),
    Rejected(Rejection),
}

///Owns the gate and intake pipeline: access codes, invite verification,
///gate sessions, persistence, and best-effort notification. Shared with
///every handler as an `Extension(Arc<IntakeManager>)`.
pub struct IntakeManager {
    pub config: Arc<Config>,
    pub codes: AccessCodeRegistry,
    pub sessions: GateSessions,
    invite_codec: Option<InviteTokenCodec>,
    store: Arc<dyn RecordStore>,
    notifier: NotifyHandle,
}

impl IntakeManager {
    pub fn new(config: Arc<Config>, store: Arc<dyn RecordStore>, notifier: NotifyHandle) -> Self {
        let codes = AccessCodeRegistry::new(&config.gate.access_codes);
        let sessions = GateSessions::new(config.gate.session_lifetime_seconds);
        let invite_codec = config
            .gate
            .invite_signing_secret
            .as_deref()
            .and_then(InviteTokenCodec::new);
        Self {
            config,
            codes,
            sessions,
            invite_codec,
            store,
            notifier,
        }
    }

    ///None when the token is invalid for any reason, including the invite
    ///feature being disabled by configuration.
    pub fn verify_invite(&self, token: &str) -> Option<InvitePayload> {
        self.invite_codec.as_ref()?.verify(token)
    }

    ///Validate -> persist exactly once -> queue one notification. A
    ///rejection returns before any persistence; a notification failure
    ///never changes the outcome.
    pub async fn submit(
        &self,
        kind: SubmissionType,
        raw: &Map<String, Value>,
        session: &SessionContext,
    ) -> Result<SubmissionOutcome, Error> {
        let record = match validate(kind, raw, &self.codes, session) {
            Ok(record) => record,
            Err(rejection) => {
                #[cfg(feature = "debug-logging")]
                tracing::debug!("{} rejected: {}", kind, rejection);
                return Ok(SubmissionOutcome::Rejected(rejection));
            }
        };
        let id = self.store.append(&record).await?;
        info!("{} {} persisted", kind, id);
        self.notifier.notify(Notification {
            kind,
            record_id: id.to_owned(),
            fields: record.fields,
        });
        Ok(SubmissionOutcome::Accepted(SubmissionReceipt { id }))
    }

    ///Admin credential check against the configured email and argon2 hash.
    pub fn validate_admin_credentials(&self, email: &str, password: &str) -> Result<(), Error> {
        let admin = self
            .config
            .admin
            .as_ref()
            .ok_or(Error::Auth(AuthError::AdminNotConfigured))?;
        if !email.trim().eq_ignore_ascii_case(&admin.email) {
            return Err(Error::Auth(AuthError::InvalidCredentials));
        }
        match argon2::verify_encoded(&admin.password_hash, password.as_bytes()) {
            Ok(true) => Ok(()),
            Ok(false) => Err(Error::Auth(AuthError::InvalidCredentials)),
            Err(err) => Err(Error::Auth(AuthError::InvalidPasswordHash(err))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::StorageConfig, store::json::JsonFileStore, validate::SubmissionType};
    use serde_json::json;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn test_config(data_dir: PathBuf) -> Config {
        let mut config: Config = toml::from_str(
            r#"
            [server]
            allowed_origins = []

            [gate]
            access_codes = ["IC-1234"]
            invite_signing_secret = "unit-test-secret"

            [storage]
            backend = "json"
            data_dir = "placeholder"
            "#,
        )
        .unwrap();
        config.storage = StorageConfig::Json { data_dir };
        config
    }

    async fn manager() -> (IntakeManager, PathBuf) {
        let dir = std::env::temp_dir().join(format!("gatehouse-intake-{}", Uuid::new_v4().simple()));
        let store = Arc::new(JsonFileStore::new(&dir).await.unwrap());
        let config = Arc::new(test_config(dir.to_owned()));
        (
            IntakeManager::new(config, store, NotifyHandle::disabled()),
            dir,
        )
    }

    fn object(value: serde_json::Value) -> Map<String, Value> {
        value.as_object().unwrap().to_owned()
    }

    #[tokio::test]
    async fn valid_rsvp_persists_exactly_one_record() {
        let (manager, dir) = manager().await;
        let raw = object(json!({
            "firstName": "Ava",
            "lastName": "Stone",
            "notify": "email",
            "plusOne": "no",
            "email": "ava@x.com",
            "code": "IC-1234",
        }));
        let outcome = manager
            .submit(SubmissionType::Rsvp, &raw, &SessionContext::default())
            .await
            .unwrap();
        assert!(matches!(outcome, SubmissionOutcome::Accepted(_)));
        assert_eq!(manager.store.count(SubmissionType::Rsvp).await.unwrap(), 1);
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn honeypot_rejection_persists_nothing() {
        let (manager, dir) = manager().await;
        let raw = object(json!({
            "fullName": "Ava Stone",
            "email": "ava@x.com",
            "typeOfRequest": "dinner",
            "company": "bot inc",
        }));
        let outcome = manager
            .submit(
                SubmissionType::ConciergeRequest,
                &raw,
                &SessionContext::default(),
            )
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            SubmissionOutcome::Rejected(Rejection::Rejected)
        ));
        assert_eq!(
            manager
                .store
                .count(SubmissionType::ConciergeRequest)
                .await
                .unwrap(),
            0
        );
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn missing_fields_leave_the_store_unchanged() {
        let (manager, dir) = manager().await;
        let raw = object(json!({
            "fullName": "Ava Stone",
            "email": "ava@x.com",
        }));
        let outcome = manager
            .submit(
                SubmissionType::ConciergeRequest,
                &raw,
                &SessionContext::default(),
            )
            .await
            .unwrap();
        match outcome {
            SubmissionOutcome::Rejected(Rejection::MissingFields(fields)) => {
                assert_eq!(fields, vec!["typeOfRequest".to_string()]);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(
            manager
                .store
                .count(SubmissionType::ConciergeRequest)
                .await
                .unwrap(),
            0
        );
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn invite_verification_roundtrips_through_the_manager() {
        let (manager, dir) = manager().await;
        let codec = InviteTokenCodec::new("unit-test-secret").unwrap();
        let token = codec.issue("ava@example.com", 600).unwrap();
        let payload = manager.verify_invite(&token).unwrap();
        assert_eq!(payload.email, "ava@example.com");
        assert!(manager.verify_invite("garbage").is_none());
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn admin_login_verifies_the_configured_hash() {
        let dir = std::env::temp_dir().join(format!("gatehouse-intake-{}", Uuid::new_v4().simple()));
        let store = Arc::new(JsonFileStore::new(&dir).await.unwrap());
        let mut config = test_config(dir.to_owned());
        let hash = argon2::hash_encoded(
            b"corr3ct-horse",
            Uuid::new_v4().as_bytes(),
            &argon2::Config::default(),
        )
        .unwrap();
        config.admin = Some(crate::config::AdminConfig {
            email: "admin@example.com".to_string(),
            password_hash: hash,
        });
        let manager = IntakeManager::new(Arc::new(config), store, NotifyHandle::disabled());

        assert!(manager
            .validate_admin_credentials("admin@example.com", "corr3ct-horse")
            .is_ok());
        //email comparison ignores case and surrounding whitespace
        assert!(manager
            .validate_admin_credentials("  Admin@Example.com ", "corr3ct-horse")
            .is_ok());
        assert!(matches!(
            manager.validate_admin_credentials("admin@example.com", "wrong"),
            Err(Error::Auth(AuthError::InvalidCredentials))
        ));
        assert!(matches!(
            manager.validate_admin_credentials("mallory@example.com", "corr3ct-horse"),
            Err(Error::Auth(AuthError::InvalidCredentials))
        ));
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn admin_login_requires_configuration() {
        let (manager, dir) = manager().await;
        let result = manager.validate_admin_credentials("admin@example.com", "secret");
        assert!(matches!(
            result,
            Err(Error::Auth(AuthError::AdminNotConfigured))
        ));
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
