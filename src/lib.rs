pub mod app;
pub mod auth;
pub mod error;
pub mod pagination;
pub mod db {
    pub mod friend_repository;
    pub mod journal_repository;
    pub mod list_repository;
    pub mod models;
    pub mod user_repository;
}
pub mod api {
    pub mod errors;
    pub mod friends;
    pub mod journal;
    pub mod lists;
    pub mod users;
}
