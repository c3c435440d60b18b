use async_trait::async_trait;

use crate::db::models::{List, MovieSummary};
use crate::error::AppError;

/// Repository trait for canonical list storage.
///
/// Lists are queried by their `list_id` field; user profiles only hold
/// references, so every mutation here is a single-document update.
#[async_trait]
pub trait ListRepository: Send + Sync {
    /// Insert a new list.
    async fn insert(&self, list: List) -> Result<(), AppError>;

    /// Find a list by its identity key.
    async fn find_by_list_id(&self, list_id: &str) -> Result<Option<List>, AppError>;

    /// Resolve a sequence of list ids, preserving the input order.
    /// Ids that no longer resolve are skipped.
    async fn find_by_ids(&self, list_ids: &[String]) -> Result<Vec<List>, AppError>;

    /// Delete a list. Returns whether a document was removed.
    async fn delete_by_list_id(&self, list_id: &str) -> Result<bool, AppError>;

    /// Append a movie unless one with the same `movie_id` is already
    /// present. Returns whether the movie was appended.
    async fn add_movie(&self, list_id: &str, movie: &MovieSummary) -> Result<bool, AppError>;

    /// Remove the movie with the given id. Returns whether an entry was
    /// removed.
    async fn remove_movie(&self, list_id: &str, movie_id: &str) -> Result<bool, AppError>;
}

/// MongoDB implementation of the ListRepository.
pub struct MongoListRepository {
    collection: mongodb::Collection<List>,
}

impl MongoListRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("lists"),
        }
    }
}

#[async_trait]
impl ListRepository for MongoListRepository {
    async fn insert(&self, list: List) -> Result<(), AppError> {
        self.collection.insert_one(&list).await?;
        Ok(())
    }

    async fn find_by_list_id(&self, list_id: &str) -> Result<Option<List>, AppError> {
        use mongodb::bson::doc;

        Ok(self.collection.find_one(doc! { "list_id": list_id }).await?)
    }

    async fn find_by_ids(&self, list_ids: &[String]) -> Result<Vec<List>, AppError> {
        use mongodb::bson::doc;

        if list_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut cursor = self
            .collection
            .find(doc! { "list_id": { "$in": list_ids } })
            .await?;

        let mut found = Vec::new();
        use futures::TryStreamExt;
        while let Some(list) = cursor.try_next().await? {
            found.push(list);
        }

        // $in gives no ordering guarantee; reassemble in reference order.
        let mut ordered = Vec::with_capacity(found.len());
        for id in list_ids {
            if let Some(pos) = found.iter().position(|l| &l.list_id == id) {
                ordered.push(found.swap_remove(pos));
            }
        }

        Ok(ordered)
    }

    async fn delete_by_list_id(&self, list_id: &str) -> Result<bool, AppError> {
        use mongodb::bson::doc;

        let result = self
            .collection
            .delete_one(doc! { "list_id": list_id })
            .await?;

        Ok(result.deleted_count > 0)
    }

    async fn add_movie(&self, list_id: &str, movie: &MovieSummary) -> Result<bool, AppError> {
        use mongodb::bson::doc;

        let movie_doc = mongodb::bson::to_bson(movie)
            .map_err(|e| AppError::Internal(format!("Failed to serialize movie: {e}")))?;

        // The filter also excludes lists that already contain the movie, so
        // the duplicate check and the append are one atomic update.
        let result = self
            .collection
            .update_one(
                doc! {
                    "list_id": list_id,
                    "movies.movie_id": { "$ne": &movie.movie_id },
                },
                doc! { "$push": { "movies": movie_doc } },
            )
            .await?;

        Ok(result.matched_count > 0)
    }

    async fn remove_movie(&self, list_id: &str, movie_id: &str) -> Result<bool, AppError> {
        use mongodb::bson::doc;

        let result = self
            .collection
            .update_one(
                doc! { "list_id": list_id },
                doc! { "$pull": { "movies": { "movie_id": movie_id } } },
            )
            .await?;

        Ok(result.modified_count > 0)
    }
}
