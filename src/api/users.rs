use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::models::AuthenticatedUser;
use crate::db::models::User;
use crate::db::user_repository::UserRepository;
use crate::error::AppError;

/// Request payload for creating the profile document of an authenticated
/// identity. The uid comes from the bearer token, never from the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterBody {
    #[serde(rename = "userName")]
    pub user_name: String,
    pub email: String,
}

/// Response from a successful registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: User,
}

/// Create the profile document for the caller's uid.
///
/// Handles must be unique; a taken handle or an already-registered uid is a
/// Conflict.
pub async fn process_register(
    users: &dyn UserRepository,
    user_id: &str,
    body: RegisterBody,
) -> Result<RegisterResponse, AppError> {
    let user_name = body.user_name.trim();
    if user_name.is_empty() {
        return Err(AppError::BadRequest("userName is required".into()));
    }
    if body.email.trim().is_empty() {
        return Err(AppError::BadRequest("email is required".into()));
    }

    if users.find_by_id(user_id).await?.is_some() {
        return Err(AppError::Conflict("User is already registered".into()));
    }
    if users.find_by_user_name(user_name).await?.is_some() {
        return Err(AppError::Conflict("userName is already taken".into()));
    }

    let user = User {
        id: user_id.to_string(),
        user_name: user_name.to_string(),
        email: body.email.trim().to_string(),
        friends: vec![],
        list_ids: vec![],
        created_at: Utc::now(),
    };

    users.create(user.clone()).await?;

    Ok(RegisterResponse {
        message: "User registered successfully".to_string(),
        user,
    })
}

/// `POST /api/users/register`
pub async fn register_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    caller: AuthenticatedUser,
    axum::Json(body): axum::Json<RegisterBody>,
) -> Result<(axum::http::StatusCode, axum::Json<RegisterResponse>), AppError> {
    let response = process_register(state.users.as_ref(), &caller.user_id, body).await?;
    Ok((axum::http::StatusCode::CREATED, axum::Json(response)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockUsers {
        users: Mutex<Vec<User>>,
    }

    impl MockUsers {
        fn new() -> Self {
            Self {
                users: Mutex::new(vec![]),
            }
        }
    }

    #[async_trait]
    impl UserRepository for MockUsers {
        async fn create(&self, user: User) -> Result<(), AppError> {
            self.users.lock().unwrap().push(user);
            Ok(())
        }

        async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id == id)
                .cloned())
        }

        async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>, AppError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.user_name == user_name)
                .cloned())
        }

        async fn add_friend(&self, _: &str, _: &str) -> Result<(), AppError> {
            Ok(())
        }

        async fn remove_friend(&self, _: &str, _: &str) -> Result<bool, AppError> {
            Ok(false)
        }

        async fn add_list_id(&self, _: &str, _: &str) -> Result<(), AppError> {
            Ok(())
        }

        async fn remove_list_id_from_all(&self, _: &str) -> Result<(), AppError> {
            Ok(())
        }
    }

    fn body(user_name: &str, email: &str) -> RegisterBody {
        RegisterBody {
            user_name: user_name.to_string(),
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register() {
        let users = MockUsers::new();
        let response = process_register(&users, "uid-a", body("alice", "alice@example.com"))
            .await
            .unwrap();
        assert_eq!(response.user.user_name, "alice");
        assert!(response.user.friends.is_empty());
    }

    #[tokio::test]
    async fn test_register_taken_handle() {
        let users = MockUsers::new();
        process_register(&users, "uid-a", body("alice", "alice@example.com"))
            .await
            .unwrap();

        let result = process_register(&users, "uid-b", body("alice", "other@example.com")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_twice_same_uid() {
        let users = MockUsers::new();
        process_register(&users, "uid-a", body("alice", "alice@example.com"))
            .await
            .unwrap();

        let result = process_register(&users, "uid-a", body("alice2", "alice@example.com")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_empty_handle() {
        let users = MockUsers::new();
        let result = process_register(&users, "uid-a", body("  ", "alice@example.com")).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
