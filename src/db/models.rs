use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user profile stored in MongoDB.
///
/// The `_id` is the authentication uid and `userName` is the unique display
/// handle other users address this profile by. Friendship is stored as
/// userName references on both sides; the accept/remove operations keep the
/// two arrays symmetric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "userName")]
    pub user_name: String,
    pub email: String,
    /// userNames of this user's friends; each handle appears at most once.
    #[serde(default)]
    pub friends: Vec<String>,
    /// Identity keys of the lists this user is a member of. The canonical
    /// list documents live in the `lists` collection; only references are
    /// stored here.
    #[serde(default)]
    pub list_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Status of a friend request. `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

/// An invitation from one user to another, resolved at most once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendRequest {
    #[serde(rename = "_id")]
    pub id: String,
    /// Sender's userName.
    pub from: String,
    /// Target user's id (requests are looked up by recipient at read time).
    pub recipient_id: String,
    pub status: RequestStatus,
    /// Stable sort key for pending-request listings (ascending).
    pub created_at: DateTime<Utc>,
}

/// Membership entry on a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMember {
    pub user_id: String,
    pub is_author: bool,
}

/// A named collection of movie summaries with membership metadata.
///
/// Queried by the `list_id` field; the driver-generated `_id` is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct List {
    pub list_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub list_type: String,
    #[serde(rename = "isPublic")]
    pub is_public: bool,
    /// Unique by `movie_id` within this list.
    #[serde(default)]
    pub movies: Vec<MovieSummary>,
    pub members: Vec<ListMember>,
    pub date_created: DateTime<Utc>,
}

/// An embedded movie record, immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieSummary {
    pub movie_id: String,
    pub title: String,
    pub poster_path: String,
    pub release_date: String,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
}

/// A watch-journal record: one movie watched by one user on one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub entry_id: String,
    pub user_id: String,
    #[serde(flatten)]
    pub movie: MovieSummary,
    /// Star rating, 0 (unrated) to 5.
    pub rating: u8,
    #[serde(rename = "dateWatched")]
    pub date_watched: DateTime<Utc>,
    /// How many times the movie has been watched; at least 1.
    pub rewatches: u32,
}
