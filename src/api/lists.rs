use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::models::AuthenticatedUser;
use crate::db::list_repository::ListRepository;
use crate::db::models::{List, ListMember, MovieSummary};
use crate::db::user_repository::UserRepository;
use crate::error::AppError;
use crate::pagination::{paginate_slice, PageMeta, PageParams, PageQuery};

/// Request payload for creating a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateListBody {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "isPublic", default)]
    pub is_public: Option<bool>,
    #[serde(default)]
    pub list_type: Option<String>,
    #[serde(default)]
    pub movies: Option<Vec<MovieSummary>>,
    #[serde(default)]
    pub members: Option<Vec<ListMember>>,
}

/// Response from a successful list creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateListResponse {
    pub message: String,
    pub list: List,
}

/// Request payload for removing a movie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveMovieBody {
    pub movie_id: String,
}

/// Response from a successful movie addition: ack plus the updated list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddMovieResponse {
    pub message: String,
    pub list: List,
}

/// Generic mutation acknowledgment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub message: String,
}

/// One page of a user's lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListsPage {
    pub lists: Vec<List>,
    pub meta: PageMeta,
}

fn is_member(list: &List, user_id: &str) -> bool {
    list.members.iter().any(|m| m.user_id == user_id)
}

fn is_author(list: &List, user_id: &str) -> bool {
    list.members.iter().any(|m| m.user_id == user_id && m.is_author)
}

/// Create a canonical list and record its id on every member's profile.
///
/// Defaults: `list_type = "user"`, empty movies, private, and the caller as
/// sole author member when no member array is supplied.
pub async fn process_create_list(
    users: &dyn UserRepository,
    lists: &dyn ListRepository,
    caller: &AuthenticatedUser,
    body: CreateListBody,
) -> Result<CreateListResponse, AppError> {
    if body.name.trim().is_empty() {
        return Err(AppError::BadRequest("List name cannot be empty".into()));
    }

    let members = body.members.unwrap_or_else(|| {
        vec![ListMember {
            user_id: caller.user_id.clone(),
            is_author: true,
        }]
    });

    if !members.iter().any(|m| m.is_author) {
        return Err(AppError::BadRequest(
            "List must have at least one author".into(),
        ));
    }

    let list = List {
        list_id: uuid::Uuid::new_v4().to_string(),
        name: body.name,
        description: body.description.unwrap_or_default(),
        list_type: body.list_type.unwrap_or_else(|| "user".to_string()),
        is_public: body.is_public.unwrap_or(false),
        movies: body.movies.unwrap_or_default(),
        members,
        date_created: Utc::now(),
    };

    lists.insert(list.clone()).await?;

    for member in &list.members {
        users.add_list_id(&member.user_id, &list.list_id).await?;
    }

    Ok(CreateListResponse {
        message: "List created successfully".to_string(),
        list,
    })
}

/// Delete a list. Only an author member may delete; the reference is pulled
/// from every member's profile, not just the caller's.
pub async fn process_delete_list(
    users: &dyn UserRepository,
    lists: &dyn ListRepository,
    caller: &AuthenticatedUser,
    list_id: &str,
) -> Result<AckResponse, AppError> {
    let list = lists
        .find_by_list_id(list_id)
        .await?
        .ok_or_else(|| AppError::NotFound("List not found".into()))?;

    if !is_author(&list, &caller.user_id) {
        return Err(AppError::Forbidden(
            "You are not authorized to delete this list".into(),
        ));
    }

    lists.delete_by_list_id(list_id).await?;
    users.remove_list_id_from_all(list_id).await?;

    Ok(AckResponse {
        message: "List deleted successfully".to_string(),
    })
}

/// Append a movie to a list the caller is a member of.
///
/// The repository update is guarded on `movie_id` absence, so the duplicate
/// check holds even when two members add the same movie concurrently.
pub async fn process_add_movie(
    lists: &dyn ListRepository,
    caller: &AuthenticatedUser,
    list_id: &str,
    movie: MovieSummary,
) -> Result<AddMovieResponse, AppError> {
    let mut list = lists
        .find_by_list_id(list_id)
        .await?
        .ok_or_else(|| AppError::NotFound("List not found".into()))?;

    if !is_member(&list, &caller.user_id) {
        return Err(AppError::Forbidden(
            "You are not a member of this list".into(),
        ));
    }

    let added = lists.add_movie(list_id, &movie).await?;
    if !added {
        // The guarded update also matches nothing when the list was deleted
        // after the member check; only a surviving list means a duplicate.
        if lists.find_by_list_id(list_id).await?.is_none() {
            return Err(AppError::NotFound("List not found".into()));
        }
        return Err(AppError::Conflict(
            "Movie already exists in the list".into(),
        ));
    }

    list.movies.push(movie);

    Ok(AddMovieResponse {
        message: "Movie added to the list successfully".to_string(),
        list,
    })
}

/// Remove a movie from a list the caller is a member of. The canonical list
/// is the single source of truth, so the removal is visible to all members.
pub async fn process_remove_movie(
    lists: &dyn ListRepository,
    caller: &AuthenticatedUser,
    list_id: &str,
    movie_id: &str,
) -> Result<AckResponse, AppError> {
    let list = lists
        .find_by_list_id(list_id)
        .await?
        .ok_or_else(|| AppError::NotFound("List not found".into()))?;

    if !is_member(&list, &caller.user_id) {
        return Err(AppError::Forbidden(
            "You are not a member of this list".into(),
        ));
    }

    let removed = lists.remove_movie(list_id, movie_id).await?;
    if !removed {
        return Err(AppError::NotFound("Movie not found in the list".into()));
    }

    Ok(AckResponse {
        message: "Movie removed from the list successfully".to_string(),
    })
}

/// Paginated list retrieval for one user: slice the profile's id references
/// and resolve the page against the canonical collection, preserving order.
pub async fn process_get_lists(
    users: &dyn UserRepository,
    lists: &dyn ListRepository,
    target_user_id: &str,
    params: PageParams,
) -> Result<ListsPage, AppError> {
    let user = users
        .find_by_id(target_user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let (page_ids, meta) = paginate_slice(&user.list_ids, &params);
    let page = lists.find_by_ids(&page_ids).await?;

    Ok(ListsPage { lists: page, meta })
}

// --- Axum handlers ---

/// `POST /api/lists/create`
pub async fn create_list_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    caller: AuthenticatedUser,
    axum::Json(body): axum::Json<CreateListBody>,
) -> Result<(axum::http::StatusCode, axum::Json<CreateListResponse>), AppError> {
    let response =
        process_create_list(state.users.as_ref(), state.lists.as_ref(), &caller, body).await?;
    Ok((axum::http::StatusCode::CREATED, axum::Json(response)))
}

/// `GET /api/lists/{uid}?page&limit`
pub async fn get_lists_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    _caller: AuthenticatedUser,
    axum::extract::Path(uid): axum::extract::Path<String>,
    axum::extract::Query(query): axum::extract::Query<PageQuery>,
) -> Result<axum::Json<ListsPage>, AppError> {
    let params = PageParams::from_query(&query)?;
    let page = process_get_lists(state.users.as_ref(), state.lists.as_ref(), &uid, params).await?;
    Ok(axum::Json(page))
}

/// `DELETE /api/lists/{listId}/remove-list`
pub async fn delete_list_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    caller: AuthenticatedUser,
    axum::extract::Path(list_id): axum::extract::Path<String>,
) -> Result<axum::Json<AckResponse>, AppError> {
    let response =
        process_delete_list(state.users.as_ref(), state.lists.as_ref(), &caller, &list_id).await?;
    Ok(axum::Json(response))
}

/// `POST /api/lists/{listId}/add-movie`
pub async fn add_movie_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    caller: AuthenticatedUser,
    axum::extract::Path(list_id): axum::extract::Path<String>,
    axum::Json(movie): axum::Json<MovieSummary>,
) -> Result<axum::Json<AddMovieResponse>, AppError> {
    let response = process_add_movie(state.lists.as_ref(), &caller, &list_id, movie).await?;
    Ok(axum::Json(response))
}

/// `DELETE /api/lists/{listId}/remove-movie`
pub async fn remove_movie_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    caller: AuthenticatedUser,
    axum::extract::Path(list_id): axum::extract::Path<String>,
    axum::Json(body): axum::Json<RemoveMovieBody>,
) -> Result<axum::Json<AckResponse>, AppError> {
    let response =
        process_remove_movie(state.lists.as_ref(), &caller, &list_id, &body.movie_id).await?;
    Ok(axum::Json(response))
}
