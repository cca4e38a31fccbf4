pub mod json;
pub mod sqlite;

use crate::{
    error::Error,
    validate::{SubmissionType, ValidatedRecord},
};
use async_trait::async_trait;
use uuid::Uuid;

///Append-only persistence of validated intake records. No update or delete
///operations exist; corrections are new records made by an external process.
#[async_trait]
pub trait RecordStore: Send + Sync {
    ///Assigns a unique id and creation timestamp, then durably persists the
    ///record. Each append is atomic: a crash mid-write leaves the collection
    ///either without the record or with it exactly once, never corrupted.
    async fn append(&self, record: &ValidatedRecord) -> Result<String, Error>;

    async fn count(&self, kind: SubmissionType) -> Result<usize, Error>;
}

///128-bit random identifier, 32 hex characters.
pub fn generate_record_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn record_ids_are_32_hex_chars_and_unique() {
        let mut seen: HashSet<String> = HashSet::new();
        for _ in 0..256 {
            let id = generate_record_id();
            assert_eq!(id.len(), 32);
            assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
            assert!(seen.insert(id));
        }
    }
}
