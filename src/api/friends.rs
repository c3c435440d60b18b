use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::models::AuthenticatedUser;
use crate::db::friend_repository::FriendRequestRepository;
use crate::db::list_repository::ListRepository;
use crate::db::models::{FriendRequest, MovieSummary, RequestStatus};
use crate::db::user_repository::UserRepository;
use crate::error::AppError;
use crate::pagination::{paginate_slice, PageMeta, PageParams, PageQuery};

/// One page of a user's friends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendsPage {
    pub friends: Vec<String>,
    pub meta: PageMeta,
}

/// One page of a recipient's pending friend requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingRequestsPage {
    #[serde(rename = "pendingRequests")]
    pub pending_requests: Vec<FriendRequestView>,
    pub meta: PageMeta,
}

/// A pending request as exposed to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendRequestView {
    pub id: String,
    pub from: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<FriendRequest> for FriendRequestView {
    fn from(request: FriendRequest) -> Self {
        Self {
            id: request.id,
            from: request.from,
            created_at: request.created_at,
        }
    }
}

/// Request payload for sending a friend request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendFriendRequestBody {
    #[serde(rename = "friendUserName")]
    pub friend_user_name: String,
}

/// Response from a successful friend-request send.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendFriendRequestResponse {
    pub message: String,
    #[serde(rename = "requestId")]
    pub request_id: String,
}

/// Request payload for responding to a friend request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespondBody {
    #[serde(rename = "requestId")]
    pub request_id: String,
    /// "accept" or "reject".
    pub action: String,
}

/// Request payload for removing a friend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveFriendBody {
    #[serde(rename = "friendUserName")]
    pub friend_user_name: String,
}

/// Generic mutation acknowledgment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub message: String,
}

/// A friend's "Top 5 Movies" list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendTopMovies {
    pub friend: String,
    pub movies: Vec<MovieSummary>,
}

/// Public profile data for a friend lookup by handle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendProfile {
    #[serde(rename = "userName")]
    pub user_name: String,
    #[serde(rename = "friendCount")]
    pub friend_count: usize,
    #[serde(rename = "publicLists")]
    pub public_lists: Vec<crate::db::models::List>,
}

/// The list name the top-movies aggregation looks for.
const TOP_MOVIES_LIST_NAME: &str = "Top 5 Movies";

/// Paginated friends listing.
///
/// The whole relationship array lives on the caller's profile document, so
/// pagination is a slice over the loaded array and `totalCount` is the
/// caller's full friend count.
pub async fn process_get_friends(
    users: &dyn UserRepository,
    caller: &AuthenticatedUser,
    params: PageParams,
) -> Result<FriendsPage, AppError> {
    let user = users
        .find_by_id(&caller.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let (friends, meta) = paginate_slice(&user.friends, &params);

    Ok(FriendsPage { friends, meta })
}

/// Paginated pending-request listing, oldest request first.
pub async fn process_get_friend_requests(
    requests: &dyn FriendRequestRepository,
    caller: &AuthenticatedUser,
    params: PageParams,
) -> Result<PendingRequestsPage, AppError> {
    let total_count = requests.count_pending(&caller.user_id).await?;
    let page = requests
        .list_pending(&caller.user_id, params.start_index() as u64, params.limit)
        .await?;

    Ok(PendingRequestsPage {
        pending_requests: page.into_iter().map(FriendRequestView::from).collect(),
        meta: PageMeta::new(total_count, params.limit),
    })
}

/// Create a pending friend request addressed to `friend_user_name`.
///
/// At most one pending request may exist per (sender, recipient) pair;
/// a second send without an intervening response is a Conflict. Does not
/// touch either `friends` array.
pub async fn process_send_friend_request(
    users: &dyn UserRepository,
    requests: &dyn FriendRequestRepository,
    caller: &AuthenticatedUser,
    friend_user_name: &str,
) -> Result<SendFriendRequestResponse, AppError> {
    if friend_user_name.is_empty() {
        return Err(AppError::BadRequest("friendUserName is required".into()));
    }
    if friend_user_name == caller.user_name {
        return Err(AppError::BadRequest(
            "Cannot send a friend request to yourself".into(),
        ));
    }

    let target = users
        .find_by_user_name(friend_user_name)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if target.friends.iter().any(|f| f == &caller.user_name) {
        return Err(AppError::Conflict("Already friends".into()));
    }

    if requests
        .find_pending_between(&caller.user_name, &target.id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "A pending friend request to this user already exists".into(),
        ));
    }

    let request = FriendRequest {
        id: uuid::Uuid::new_v4().to_string(),
        from: caller.user_name.clone(),
        recipient_id: target.id,
        status: RequestStatus::Pending,
        created_at: Utc::now(),
    };
    let request_id = request.id.clone();

    requests.insert(request).await?;

    Ok(SendFriendRequestResponse {
        message: "Friend request sent".to_string(),
        request_id,
    })
}

/// Accept or reject a pending request addressed to the caller.
///
/// Accepting appends each party's userName to the other's `friends` array.
/// Both writes use `$addToSet`, so a retry after a partial failure
/// converges instead of duplicating entries.
pub async fn process_respond_to_friend_request(
    users: &dyn UserRepository,
    requests: &dyn FriendRequestRepository,
    caller: &AuthenticatedUser,
    request_id: &str,
    action: &str,
) -> Result<AckResponse, AppError> {
    let status = match action {
        "accept" => RequestStatus::Accepted,
        "reject" => RequestStatus::Rejected,
        other => {
            return Err(AppError::BadRequest(format!(
                "Invalid action '{other}'. Expected: accept, reject"
            )))
        }
    };

    let request = requests
        .find_by_id(request_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Friend request not found".into()))?;

    if request.recipient_id != caller.user_id {
        return Err(AppError::Forbidden(
            "You are not the recipient of this friend request".into(),
        ));
    }

    if request.status != RequestStatus::Pending {
        return Err(AppError::InvalidState(
            "Friend request has already been resolved".into(),
        ));
    }

    requests.set_status(request_id, status).await?;

    if status == RequestStatus::Accepted {
        users.add_friend(&caller.user_name, &request.from).await?;
        users.add_friend(&request.from, &caller.user_name).await?;
    }

    let message = match status {
        RequestStatus::Accepted => "Friend request accepted",
        _ => "Friend request rejected",
    };

    Ok(AckResponse {
        message: message.to_string(),
    })
}

/// Symmetric friend removal: the handle is pulled from the caller's array
/// and the caller's handle from the friend's array.
pub async fn process_remove_friend(
    users: &dyn UserRepository,
    caller: &AuthenticatedUser,
    friend_user_name: &str,
) -> Result<AckResponse, AppError> {
    users
        .find_by_user_name(friend_user_name)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let removed = users
        .remove_friend(&caller.user_name, friend_user_name)
        .await?;
    users
        .remove_friend(friend_user_name, &caller.user_name)
        .await?;

    if !removed {
        return Err(AppError::NotFound(format!(
            "{friend_user_name} is not in your friends list"
        )));
    }

    Ok(AckResponse {
        message: "Friend removed".to_string(),
    })
}

/// Collect each friend's "Top 5 Movies" list, skipping friends without one.
pub async fn process_friend_top_movies(
    users: &dyn UserRepository,
    lists: &dyn ListRepository,
    caller: &AuthenticatedUser,
) -> Result<Vec<FriendTopMovies>, AppError> {
    let user = users
        .find_by_id(&caller.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let mut result = Vec::new();
    for friend_name in &user.friends {
        let Some(friend) = users.find_by_user_name(friend_name).await? else {
            continue;
        };

        let friend_lists = lists.find_by_ids(&friend.list_ids).await?;
        if let Some(top) = friend_lists
            .into_iter()
            .find(|l| l.name == TOP_MOVIES_LIST_NAME)
        {
            result.push(FriendTopMovies {
                friend: friend_name.clone(),
                movies: top.movies,
            });
        }
    }

    Ok(result)
}

/// Public profile lookup by handle: friend count plus public lists only.
pub async fn process_friend_profile(
    users: &dyn UserRepository,
    lists: &dyn ListRepository,
    user_name: &str,
) -> Result<FriendProfile, AppError> {
    let user = users
        .find_by_user_name(user_name)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let public_lists = lists
        .find_by_ids(&user.list_ids)
        .await?
        .into_iter()
        .filter(|l| l.is_public)
        .collect();

    Ok(FriendProfile {
        user_name: user.user_name,
        friend_count: user.friends.len(),
        public_lists,
    })
}

// --- Axum handlers ---

/// `GET /api/friends?page&limit`
pub async fn get_friends_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    caller: AuthenticatedUser,
    axum::extract::Query(query): axum::extract::Query<PageQuery>,
) -> Result<axum::Json<FriendsPage>, AppError> {
    let params = PageParams::from_query(&query)?;
    let page = process_get_friends(state.users.as_ref(), &caller, params).await?;
    Ok(axum::Json(page))
}

/// `GET /api/friends/requests?page&limit`
pub async fn get_friend_requests_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    caller: AuthenticatedUser,
    axum::extract::Query(query): axum::extract::Query<PageQuery>,
) -> Result<axum::Json<PendingRequestsPage>, AppError> {
    let params = PageParams::from_query(&query)?;
    let page = process_get_friend_requests(state.friend_requests.as_ref(), &caller, params).await?;
    Ok(axum::Json(page))
}

/// `POST /api/friends/request`
pub async fn send_friend_request_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    caller: AuthenticatedUser,
    axum::Json(body): axum::Json<SendFriendRequestBody>,
) -> Result<axum::Json<SendFriendRequestResponse>, AppError> {
    let response = process_send_friend_request(
        state.users.as_ref(),
        state.friend_requests.as_ref(),
        &caller,
        &body.friend_user_name,
    )
    .await?;
    Ok(axum::Json(response))
}

/// `POST /api/friends/respond`
pub async fn respond_to_friend_request_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    caller: AuthenticatedUser,
    axum::Json(body): axum::Json<RespondBody>,
) -> Result<axum::Json<AckResponse>, AppError> {
    let response = process_respond_to_friend_request(
        state.users.as_ref(),
        state.friend_requests.as_ref(),
        &caller,
        &body.request_id,
        &body.action,
    )
    .await?;
    Ok(axum::Json(response))
}

/// `POST /api/friends/remove`
pub async fn remove_friend_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    caller: AuthenticatedUser,
    axum::Json(body): axum::Json<RemoveFriendBody>,
) -> Result<axum::Json<AckResponse>, AppError> {
    let response =
        process_remove_friend(state.users.as_ref(), &caller, &body.friend_user_name).await?;
    Ok(axum::Json(response))
}

/// `GET /api/friends/top-movies`
pub async fn friend_top_movies_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    caller: AuthenticatedUser,
) -> Result<axum::Json<Vec<FriendTopMovies>>, AppError> {
    let response =
        process_friend_top_movies(state.users.as_ref(), state.lists.as_ref(), &caller).await?;
    Ok(axum::Json(response))
}

/// `GET /api/friends/data/{username}`
pub async fn friend_profile_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    _caller: AuthenticatedUser,
    axum::extract::Path(username): axum::extract::Path<String>,
) -> Result<axum::Json<FriendProfile>, AppError> {
    let response =
        process_friend_profile(state.users.as_ref(), state.lists.as_ref(), &username).await?;
    Ok(axum::Json(response))
}
