use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::models::AuthenticatedUser;
use crate::db::journal_repository::{JournalEntryChanges, JournalRepository};
use crate::db::models::{JournalEntry, MovieSummary};
use crate::error::AppError;

/// Request payload for logging a watched movie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddEntryBody {
    #[serde(flatten)]
    pub movie: MovieSummary,
    #[serde(default)]
    pub rating: u8,
    #[serde(rename = "dateWatched")]
    pub date_watched: DateTime<Utc>,
    #[serde(default = "default_rewatches")]
    pub rewatches: u32,
}

fn default_rewatches() -> u32 {
    1
}

/// Request payload for editing an entry. Absent fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditEntryBody {
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(rename = "dateWatched", default)]
    pub date_watched: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rewatches: Option<u32>,
}

/// Generic mutation acknowledgment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub message: String,
}

const MAX_RATING: u8 = 5;

fn validate_rating(rating: u8) -> Result<(), AppError> {
    if rating > MAX_RATING {
        return Err(AppError::BadRequest(format!(
            "Rating must be between 0 and {MAX_RATING}"
        )));
    }
    Ok(())
}

fn validate_rewatches(rewatches: u32) -> Result<(), AppError> {
    if rewatches == 0 {
        return Err(AppError::BadRequest("Rewatches must be at least 1".into()));
    }
    Ok(())
}

/// Log a watched movie in the caller's journal.
pub async fn process_add_entry(
    journal: &dyn JournalRepository,
    caller: &AuthenticatedUser,
    body: AddEntryBody,
) -> Result<JournalEntry, AppError> {
    validate_rating(body.rating)?;
    validate_rewatches(body.rewatches)?;

    let entry = JournalEntry {
        entry_id: uuid::Uuid::new_v4().to_string(),
        user_id: caller.user_id.clone(),
        movie: body.movie,
        rating: body.rating,
        date_watched: body.date_watched,
        rewatches: body.rewatches,
    };

    journal.insert(entry.clone()).await?;

    Ok(entry)
}

/// All of the caller's entries, most recently watched first.
pub async fn process_get_entries(
    journal: &dyn JournalRepository,
    caller: &AuthenticatedUser,
) -> Result<Vec<JournalEntry>, AppError> {
    journal.list_for_user(&caller.user_id).await
}

/// Edit an entry owned by the caller. Entries belonging to other users are
/// indistinguishable from missing ones.
pub async fn process_edit_entry(
    journal: &dyn JournalRepository,
    caller: &AuthenticatedUser,
    entry_id: &str,
    body: EditEntryBody,
) -> Result<AckResponse, AppError> {
    if let Some(rating) = body.rating {
        validate_rating(rating)?;
    }
    if let Some(rewatches) = body.rewatches {
        validate_rewatches(rewatches)?;
    }

    let changes = JournalEntryChanges {
        rating: body.rating,
        date_watched: body.date_watched,
        rewatches: body.rewatches,
    };

    let updated = journal.update(entry_id, &caller.user_id, changes).await?;
    if !updated {
        return Err(AppError::NotFound("Journal entry not found".into()));
    }

    Ok(AckResponse {
        message: "Journal entry updated".to_string(),
    })
}

/// Delete an entry owned by the caller.
pub async fn process_delete_entry(
    journal: &dyn JournalRepository,
    caller: &AuthenticatedUser,
    entry_id: &str,
) -> Result<AckResponse, AppError> {
    let deleted = journal.delete(entry_id, &caller.user_id).await?;
    if !deleted {
        return Err(AppError::NotFound("Journal entry not found".into()));
    }

    Ok(AckResponse {
        message: "Journal entry deleted".to_string(),
    })
}

// --- Axum handlers ---

/// `GET /api/journal`
pub async fn get_entries_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    caller: AuthenticatedUser,
) -> Result<axum::Json<Vec<JournalEntry>>, AppError> {
    let entries = process_get_entries(state.journal.as_ref(), &caller).await?;
    Ok(axum::Json(entries))
}

/// `POST /api/journal`
pub async fn add_entry_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    caller: AuthenticatedUser,
    axum::Json(body): axum::Json<AddEntryBody>,
) -> Result<(axum::http::StatusCode, axum::Json<JournalEntry>), AppError> {
    let entry = process_add_entry(state.journal.as_ref(), &caller, body).await?;
    Ok((axum::http::StatusCode::CREATED, axum::Json(entry)))
}

/// `PUT /api/journal/{entryId}`
pub async fn edit_entry_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    caller: AuthenticatedUser,
    axum::extract::Path(entry_id): axum::extract::Path<String>,
    axum::Json(body): axum::Json<EditEntryBody>,
) -> Result<axum::Json<AckResponse>, AppError> {
    let response = process_edit_entry(state.journal.as_ref(), &caller, &entry_id, body).await?;
    Ok(axum::Json(response))
}

/// `DELETE /api/journal/{entryId}`
pub async fn delete_entry_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    caller: AuthenticatedUser,
    axum::extract::Path(entry_id): axum::extract::Path<String>,
) -> Result<axum::Json<AckResponse>, AppError> {
    let response = process_delete_entry(state.journal.as_ref(), &caller, &entry_id).await?;
    Ok(axum::Json(response))
}
