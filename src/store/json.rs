use crate::{
    error::{Error, StorageError},
    store::{generate_record_id, RecordStore},
    validate::{SubmissionType, ValidatedRecord},
};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::sync::Mutex;
use uuid::Uuid;

///Flat-file backend: one JSON array per collection. Writes go to a temp
///file in the same directory and are renamed over the original, so the
///rename is the only observable state transition.
pub struct JsonFileStore {
    data_dir: PathBuf,
    ///serializes the read-modify-rename cycle; single-process deployment
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub async fn new(data_dir: &Path) -> Result<Self, Error> {
        tokio::fs::create_dir_all(data_dir)
            .await
            .map_err(StorageError::Io)?;
        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            write_lock: Mutex::new(()),
        })
    }

    pub fn collection_path(&self, kind: SubmissionType) -> PathBuf {
        self.data_dir.join(format!("{}.json", kind.collection()))
    }

    async fn read_collection(&self, kind: SubmissionType) -> Result<Vec<Value>, Error> {
        match tokio::fs::read(self.collection_path(kind)).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)
                .map_err(StorageError::CorruptCollection)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(StorageError::Io(err).into()),
        }
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn append(&self, record: &ValidatedRecord) -> Result<String, Error> {
        let _guard = self.write_lock.lock().await;

        let mut rows = self.read_collection(record.kind).await?;
        let id = generate_record_id();
        let mut row = serde_json::Map::new();
        row.insert("id".to_string(), Value::String(id.to_owned()));
        row.insert(
            "createdAt".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        for (name, value) in record.fields.iter() {
            row.insert(name.to_owned(), Value::String(value.to_owned()));
        }
        rows.push(Value::Object(row));

        let body =
            serde_json::to_vec_pretty(&rows).map_err(StorageError::SerialiseCollection)?;
        let path = self.collection_path(record.kind);
        let temp_path = self.data_dir.join(format!(
            "{}.{}.tmp",
            record.kind.collection(),
            Uuid::new_v4().simple()
        ));
        tokio::fs::write(&temp_path, body)
            .await
            .map_err(StorageError::Io)?;
        tokio::fs::rename(&temp_path, &path)
            .await
            .map_err(StorageError::Io)?;

        Ok(id)
    }

    async fn count(&self, kind: SubmissionType) -> Result<usize, Error> {
        Ok(self.read_collection(kind).await?.len())
    }
}
