use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::db::models::JournalEntry;
use crate::error::AppError;

/// Fields of a journal entry that can be edited after creation.
/// The movie itself is immutable once logged.
#[derive(Debug, Clone, Default)]
pub struct JournalEntryChanges {
    pub rating: Option<u8>,
    pub date_watched: Option<DateTime<Utc>>,
    pub rewatches: Option<u32>,
}

/// Repository trait for per-user journal storage.
#[async_trait]
pub trait JournalRepository: Send + Sync {
    /// Insert a new entry.
    async fn insert(&self, entry: JournalEntry) -> Result<(), AppError>;

    /// All entries for one user, most recently watched first.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<JournalEntry>, AppError>;

    /// Apply edits to an entry owned by `user_id`. Returns whether a
    /// matching entry existed.
    async fn update(
        &self,
        entry_id: &str,
        user_id: &str,
        changes: JournalEntryChanges,
    ) -> Result<bool, AppError>;

    /// Delete an entry owned by `user_id`. Returns whether an entry was
    /// removed.
    async fn delete(&self, entry_id: &str, user_id: &str) -> Result<bool, AppError>;
}

/// MongoDB implementation of the JournalRepository.
pub struct MongoJournalRepository {
    collection: mongodb::Collection<JournalEntry>,
}

impl MongoJournalRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("journal_entries"),
        }
    }
}

#[async_trait]
impl JournalRepository for MongoJournalRepository {
    async fn insert(&self, entry: JournalEntry) -> Result<(), AppError> {
        self.collection.insert_one(&entry).await?;
        Ok(())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<JournalEntry>, AppError> {
        use mongodb::bson::doc;
        use mongodb::options::FindOptions;

        let options = FindOptions::builder()
            .sort(doc! { "dateWatched": -1 })
            .build();

        let mut cursor = self
            .collection
            .find(doc! { "user_id": user_id })
            .with_options(options)
            .await?;

        let mut entries = Vec::new();
        use futures::TryStreamExt;
        while let Some(entry) = cursor.try_next().await? {
            entries.push(entry);
        }

        Ok(entries)
    }

    async fn update(
        &self,
        entry_id: &str,
        user_id: &str,
        changes: JournalEntryChanges,
    ) -> Result<bool, AppError> {
        use mongodb::bson::doc;

        let mut set = doc! {};
        if let Some(rating) = changes.rating {
            set.insert("rating", rating as i32);
        }
        if let Some(date_watched) = changes.date_watched {
            // Serialize through serde so the stored format matches inserts.
            let value = mongodb::bson::to_bson(&date_watched)
                .map_err(|e| AppError::Internal(format!("Failed to serialize date: {e}")))?;
            set.insert("dateWatched", value);
        }
        if let Some(rewatches) = changes.rewatches {
            set.insert("rewatches", rewatches as i64);
        }

        if set.is_empty() {
            // Nothing to change; report whether the entry exists.
            let existing = self
                .collection
                .find_one(doc! { "entry_id": entry_id, "user_id": user_id })
                .await?;
            return Ok(existing.is_some());
        }

        let result = self
            .collection
            .update_one(
                doc! { "entry_id": entry_id, "user_id": user_id },
                doc! { "$set": set },
            )
            .await?;

        Ok(result.matched_count > 0)
    }

    async fn delete(&self, entry_id: &str, user_id: &str) -> Result<bool, AppError> {
        use mongodb::bson::doc;

        let result = self
            .collection
            .delete_one(doc! { "entry_id": entry_id, "user_id": user_id })
            .await?;

        Ok(result.deleted_count > 0)
    }
}
