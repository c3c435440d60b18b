use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::db::friend_repository::FriendRequestRepository;
use crate::db::journal_repository::JournalRepository;
use crate::db::list_repository::ListRepository;
use crate::db::user_repository::UserRepository;

/// Shared application state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub friend_requests: Arc<dyn FriendRequestRepository>,
    pub lists: Arc<dyn ListRepository>,
    pub journal: Arc<dyn JournalRepository>,
    /// HMAC secret for bearer-token verification.
    pub jwt_secret: String,
}

/// Build the API router. Shared between `main` and the integration tests so
/// both serve exactly the same surface.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Friends
        .route("/api/friends", get(api::friends::get_friends_handler))
        .route(
            "/api/friends/requests",
            get(api::friends::get_friend_requests_handler),
        )
        .route(
            "/api/friends/request",
            post(api::friends::send_friend_request_handler),
        )
        .route(
            "/api/friends/respond",
            post(api::friends::respond_to_friend_request_handler),
        )
        .route(
            "/api/friends/remove",
            post(api::friends::remove_friend_handler),
        )
        .route(
            "/api/friends/top-movies",
            get(api::friends::friend_top_movies_handler),
        )
        .route(
            "/api/friends/data/{username}",
            get(api::friends::friend_profile_handler),
        )
        // Lists
        .route("/api/lists/create", post(api::lists::create_list_handler))
        .route("/api/lists/{id}", get(api::lists::get_lists_handler))
        .route(
            "/api/lists/{id}/remove-list",
            delete(api::lists::delete_list_handler),
        )
        .route(
            "/api/lists/{id}/add-movie",
            post(api::lists::add_movie_handler),
        )
        .route(
            "/api/lists/{id}/remove-movie",
            delete(api::lists::remove_movie_handler),
        )
        // Journal
        .route(
            "/api/journal",
            get(api::journal::get_entries_handler).post(api::journal::add_entry_handler),
        )
        .route(
            "/api/journal/{id}",
            put(api::journal::edit_entry_handler).delete(api::journal::delete_entry_handler),
        )
        // Users
        .route("/api/users/register", post(api::users::register_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
