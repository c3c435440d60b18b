use std::sync::Arc;

use reelmates::app::AppState;
use reelmates::db::friend_repository::MongoFriendRequestRepository;
use reelmates::db::journal_repository::MongoJournalRepository;
use reelmates::db::list_repository::MongoListRepository;
use reelmates::db::user_repository::MongoUserRepository;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reelmates=info,tower_http=info".into()),
        )
        .init();

    tracing::info!("Starting Reelmates server...");

    // Connect to MongoDB
    let mongo_uri =
        std::env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let mongo_db_name =
        std::env::var("MONGODB_DATABASE").unwrap_or_else(|_| "reelmates".to_string());

    let mongo_client = mongodb::Client::with_uri_str(&mongo_uri)
        .await
        .expect("Failed to connect to MongoDB");
    let mongo_db = mongo_client.database(&mongo_db_name);

    tracing::info!("Connected to MongoDB at {}", mongo_uri);

    // Bearer-token secret shared with the token-issuing front door
    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| "dev-secret".to_string());

    // Build application state
    let app_state = AppState {
        users: Arc::new(MongoUserRepository::new(&mongo_db)),
        friend_requests: Arc::new(MongoFriendRequestRepository::new(&mongo_db)),
        lists: Arc::new(MongoListRepository::new(&mongo_db)),
        journal: Arc::new(MongoJournalRepository::new(&mongo_db)),
        jwt_secret,
    };

    let app = reelmates::app::api_router(app_state);

    // Start the server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app.into_make_service())
        .await
        .unwrap();
}
