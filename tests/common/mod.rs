use std::sync::Arc;

use axum::Router;
use chrono::Utc;
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::mongo::Mongo;

use reelmates::app::{api_router, AppState};
use reelmates::auth::token::issue_token;
use reelmates::db::friend_repository::{FriendRequestRepository, MongoFriendRequestRepository};
use reelmates::db::journal_repository::{JournalRepository, MongoJournalRepository};
use reelmates::db::list_repository::{ListRepository, MongoListRepository};
use reelmates::db::models::User;
use reelmates::db::user_repository::{MongoUserRepository, UserRepository};

/// HMAC secret used to mint bearer tokens in tests.
pub const JWT_SECRET: &str = "test-secret";

/// Holds the running Mongo container and provides the Axum router for
/// integration tests.
///
/// The container is kept alive for as long as this struct lives. When
/// dropped, it is stopped and cleaned up automatically.
pub struct TestEnv {
    _mongo: ContainerAsync<Mongo>,
    pub router: Router,
    pub users: Arc<dyn UserRepository>,
    pub friend_requests: Arc<dyn FriendRequestRepository>,
    pub lists: Arc<dyn ListRepository>,
    pub journal: Arc<dyn JournalRepository>,
}

impl TestEnv {
    /// Spin up a Mongo container and build an Axum router wired to it.
    pub async fn start() -> Self {
        let mongo_container = Mongo::default()
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let mongo_port = mongo_container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");
        let mongo_uri = format!("mongodb://127.0.0.1:{}", mongo_port);
        let mongo_client = mongodb::Client::with_uri_str(&mongo_uri)
            .await
            .expect("Failed to connect to MongoDB");
        let mongo_db = mongo_client.database("reelmates_test");

        let users: Arc<dyn UserRepository> = Arc::new(MongoUserRepository::new(&mongo_db));
        let friend_requests: Arc<dyn FriendRequestRepository> =
            Arc::new(MongoFriendRequestRepository::new(&mongo_db));
        let lists: Arc<dyn ListRepository> = Arc::new(MongoListRepository::new(&mongo_db));
        let journal: Arc<dyn JournalRepository> = Arc::new(MongoJournalRepository::new(&mongo_db));

        let app_state = AppState {
            users: users.clone(),
            friend_requests: friend_requests.clone(),
            lists: lists.clone(),
            journal: journal.clone(),
            jwt_secret: JWT_SECRET.to_string(),
        };

        let router = api_router(app_state);

        Self {
            _mongo: mongo_container,
            router,
            users,
            friend_requests,
            lists,
            journal,
        }
    }

    /// Build an `axum_test::TestServer` from this environment's router.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .expect_success_by_default()
            .build(self.router.clone())
    }

    /// Build a `TestServer` that does NOT expect success by default (for
    /// error tests).
    pub fn server_permissive(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .build(self.router.clone())
    }

    /// Seed a user profile directly through the repository and return a
    /// bearer token for it.
    pub async fn seed_user(&self, id: &str, user_name: &str) -> String {
        self.seed_user_with_friends(id, user_name, &[]).await
    }

    /// Seed a user with a pre-populated friends array.
    pub async fn seed_user_with_friends(
        &self,
        id: &str,
        user_name: &str,
        friends: &[&str],
    ) -> String {
        self.users
            .create(User {
                id: id.to_string(),
                user_name: user_name.to_string(),
                email: format!("{user_name}@example.com"),
                friends: friends.iter().map(|f| f.to_string()).collect(),
                list_ids: vec![],
                created_at: Utc::now(),
            })
            .await
            .expect("Failed to seed user");

        self.token(id, user_name)
    }

    /// Mint a bearer token for the given identity.
    pub fn token(&self, id: &str, user_name: &str) -> String {
        issue_token(JWT_SECRET, id, user_name, None).expect("Failed to issue token")
    }
}
