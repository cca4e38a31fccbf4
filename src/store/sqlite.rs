use crate::{
    error::{Error, StorageError},
    model::{ApplicationModel, ConciergeRequestModel, RsvpModel},
    schema,
    store::{generate_record_id, RecordStore},
    validate::{SubmissionType, ValidatedRecord},
};
use async_trait::async_trait;
use chrono::Utc;
use diesel::{Connection, QueryDsl, RunQueryDsl, SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tokio::sync::Mutex;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

///Relational backend: one table per submission type, NOT NULL on every
///required column as a second line of defense behind the validator. A
///single held connection serializes writes in-process and keeps
///`:memory:` databases alive for tests.
pub struct SqliteStore {
    connection: Mutex<SqliteConnection>,
}

impl SqliteStore {
    pub fn new(database_url: &str) -> Result<Self, Error> {
        let mut connection =
            SqliteConnection::establish(database_url).map_err(StorageError::Connection)?;
        connection
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| StorageError::Migrations(err.to_string()))?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn append(&self, record: &ValidatedRecord) -> Result<String, Error> {
        let id = generate_record_id();
        let created_at = Utc::now().to_rfc3339();
        let mut connection = self.connection.lock().await;
        match record.kind {
            SubmissionType::Rsvp => {
                diesel::insert_into(schema::rsvp::table)
                    .values(RsvpModel::from_validated(record, id.to_owned(), created_at))
                    .execute(&mut *connection)
                    .map_err(StorageError::Insert)?;
            }
            SubmissionType::ConciergeRequest => {
                diesel::insert_into(schema::concierge_request::table)
                    .values(ConciergeRequestModel::from_validated(
                        record,
                        id.to_owned(),
                        created_at,
                    ))
                    .execute(&mut *connection)
                    .map_err(StorageError::Insert)?;
            }
            SubmissionType::Application => {
                diesel::insert_into(schema::application::table)
                    .values(ApplicationModel::from_validated(
                        record,
                        id.to_owned(),
                        created_at,
                    ))
                    .execute(&mut *connection)
                    .map_err(StorageError::Insert)?;
            }
        }
        Ok(id)
    }

    async fn count(&self, kind: SubmissionType) -> Result<usize, Error> {
        let mut connection = self.connection.lock().await;
        let count: i64 = match kind {
            SubmissionType::Rsvp => schema::rsvp::table
                .count()
                .get_result(&mut *connection)
                .map_err(StorageError::Count)?,
            SubmissionType::ConciergeRequest => schema::concierge_request::table
                .count()
                .get_result(&mut *connection)
                .map_err(StorageError::Count)?,
            SubmissionType::Application => schema::application::table
                .count()
                .get_result(&mut *connection)
                .map_err(StorageError::Count)?,
        };
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn rsvp_record() -> ValidatedRecord {
        let mut fields: BTreeMap<String, String> = BTreeMap::new();
        fields.insert("code".to_string(), "IC-1234".to_string());
        fields.insert("firstName".to_string(), "Ava".to_string());
        fields.insert("lastName".to_string(), "Stone".to_string());
        fields.insert("plusOne".to_string(), "no".to_string());
        fields.insert("notify".to_string(), "email".to_string());
        fields.insert("email".to_string(), "ava@x.com".to_string());
        fields.insert("phone".to_string(), String::new());
        ValidatedRecord {
            kind: SubmissionType::Rsvp,
            fields,
        }
    }

    #[tokio::test]
    async fn migrations_run_and_appends_count() {
        let store = SqliteStore::new(":memory:").unwrap();
        assert_eq!(store.count(SubmissionType::Rsvp).await.unwrap(), 0);
        let id = store.append(&rsvp_record()).await.unwrap();
        assert_eq!(id.len(), 32);
        assert_eq!(store.count(SubmissionType::Rsvp).await.unwrap(), 1);
        assert_eq!(
            store.count(SubmissionType::ConciergeRequest).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn appends_assign_distinct_ids() {
        let store = SqliteStore::new(":memory:").unwrap();
        let first = store.append(&rsvp_record()).await.unwrap();
        let second = store.append(&rsvp_record()).await.unwrap();
        assert_ne!(first, second);
        assert_eq!(store.count(SubmissionType::Rsvp).await.unwrap(), 2);
    }
}
