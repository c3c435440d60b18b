use async_trait::async_trait;

use crate::db::models::{FriendRequest, RequestStatus};
use crate::error::AppError;

/// Repository trait for friend-request lifecycle storage.
#[async_trait]
pub trait FriendRequestRepository: Send + Sync {
    /// Insert a new request (always created `pending`).
    async fn insert(&self, request: FriendRequest) -> Result<(), AppError>;

    /// Find a request by its id.
    async fn find_by_id(&self, id: &str) -> Result<Option<FriendRequest>, AppError>;

    /// Find an open request for a (sender, recipient) pair, if any.
    /// Used to enforce at-most-one pending request per pair.
    async fn find_pending_between(
        &self,
        from: &str,
        recipient_id: &str,
    ) -> Result<Option<FriendRequest>, AppError>;

    /// One page of a recipient's pending requests, oldest first.
    async fn list_pending(
        &self,
        recipient_id: &str,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<FriendRequest>, AppError>;

    /// Total number of pending requests for a recipient.
    async fn count_pending(&self, recipient_id: &str) -> Result<u64, AppError>;

    /// Transition a request to a terminal status.
    async fn set_status(&self, id: &str, status: RequestStatus) -> Result<(), AppError>;
}

/// MongoDB implementation of the FriendRequestRepository.
pub struct MongoFriendRequestRepository {
    collection: mongodb::Collection<FriendRequest>,
}

impl MongoFriendRequestRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("friend_requests"),
        }
    }
}

#[async_trait]
impl FriendRequestRepository for MongoFriendRequestRepository {
    async fn insert(&self, request: FriendRequest) -> Result<(), AppError> {
        self.collection.insert_one(&request).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<FriendRequest>, AppError> {
        use mongodb::bson::doc;

        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn find_pending_between(
        &self,
        from: &str,
        recipient_id: &str,
    ) -> Result<Option<FriendRequest>, AppError> {
        use mongodb::bson::doc;

        Ok(self
            .collection
            .find_one(doc! {
                "from": from,
                "recipient_id": recipient_id,
                "status": "pending",
            })
            .await?)
    }

    async fn list_pending(
        &self,
        recipient_id: &str,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<FriendRequest>, AppError> {
        use mongodb::bson::doc;
        use mongodb::options::FindOptions;

        // created_at ascending gives a stable, deterministic page order.
        let options = FindOptions::builder()
            .sort(doc! { "created_at": 1 })
            .skip(skip)
            .limit(limit)
            .build();

        let mut cursor = self
            .collection
            .find(doc! { "recipient_id": recipient_id, "status": "pending" })
            .with_options(options)
            .await?;

        let mut requests = Vec::new();
        use futures::TryStreamExt;
        while let Some(request) = cursor.try_next().await? {
            requests.push(request);
        }

        Ok(requests)
    }

    async fn count_pending(&self, recipient_id: &str) -> Result<u64, AppError> {
        use mongodb::bson::doc;

        Ok(self
            .collection
            .count_documents(doc! { "recipient_id": recipient_id, "status": "pending" })
            .await?)
    }

    async fn set_status(&self, id: &str, status: RequestStatus) -> Result<(), AppError> {
        use mongodb::bson::doc;

        let status_str = match status {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Rejected => "rejected",
        };

        self.collection
            .update_one(doc! { "_id": id }, doc! { "$set": { "status": status_str } })
            .await?;

        Ok(())
    }
}
