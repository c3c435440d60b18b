use async_trait::async_trait;

use crate::db::models::User;
use crate::error::AppError;

/// Repository trait for user-profile operations.
///
/// This trait allows mocking the database layer in tests.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user profile.
    async fn create(&self, user: User) -> Result<(), AppError>;

    /// Find a user by their authentication uid.
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;

    /// Find a user by their unique display handle.
    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>, AppError>;

    /// Add `friend_user_name` to the `friends` array of the user identified
    /// by `user_name`. Duplicate-free by construction (`$addToSet`).
    async fn add_friend(&self, user_name: &str, friend_user_name: &str) -> Result<(), AppError>;

    /// Remove `friend_user_name` from the `friends` array of the user
    /// identified by `user_name`. Returns whether an entry was removed.
    async fn remove_friend(
        &self,
        user_name: &str,
        friend_user_name: &str,
    ) -> Result<bool, AppError>;

    /// Record list membership on a user's profile.
    async fn add_list_id(&self, user_id: &str, list_id: &str) -> Result<(), AppError>;

    /// Drop a list reference from every user that carries it.
    async fn remove_list_id_from_all(&self, list_id: &str) -> Result<(), AppError>;
}

/// MongoDB implementation of the UserRepository.
pub struct MongoUserRepository {
    collection: mongodb::Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("users"),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn create(&self, user: User) -> Result<(), AppError> {
        self.collection.insert_one(&user).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        use mongodb::bson::doc;

        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>, AppError> {
        use mongodb::bson::doc;

        Ok(self
            .collection
            .find_one(doc! { "userName": user_name })
            .await?)
    }

    async fn add_friend(&self, user_name: &str, friend_user_name: &str) -> Result<(), AppError> {
        use mongodb::bson::doc;

        self.collection
            .update_one(
                doc! { "userName": user_name },
                doc! { "$addToSet": { "friends": friend_user_name } },
            )
            .await?;

        Ok(())
    }

    async fn remove_friend(
        &self,
        user_name: &str,
        friend_user_name: &str,
    ) -> Result<bool, AppError> {
        use mongodb::bson::doc;

        let result = self
            .collection
            .update_one(
                doc! { "userName": user_name },
                doc! { "$pull": { "friends": friend_user_name } },
            )
            .await?;

        Ok(result.modified_count > 0)
    }

    async fn add_list_id(&self, user_id: &str, list_id: &str) -> Result<(), AppError> {
        use mongodb::bson::doc;

        self.collection
            .update_one(
                doc! { "_id": user_id },
                doc! { "$addToSet": { "list_ids": list_id } },
            )
            .await?;

        Ok(())
    }

    async fn remove_list_id_from_all(&self, list_id: &str) -> Result<(), AppError> {
        use mongodb::bson::doc;

        self.collection
            .update_many(
                doc! { "list_ids": list_id },
                doc! { "$pull": { "list_ids": list_id } },
            )
            .await?;

        Ok(())
    }
}
