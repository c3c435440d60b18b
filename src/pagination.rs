use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Raw `?page=&limit=` query parameters as they arrive on the wire.
///
/// Both are optional at the extractor level; validation happens in
/// [`PageParams::from_query`] so that missing values produce the same
/// 400 response as out-of-range ones.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Validated pagination parameters: `page >= 1`, `limit >= 1`.
#[derive(Debug, Clone, Copy)]
pub struct PageParams {
    pub page: i64,
    pub limit: i64,
}

impl PageParams {
    /// Validate raw query params, rejecting missing or non-positive values.
    pub fn from_query(query: &PageQuery) -> Result<Self, AppError> {
        match (query.page, query.limit) {
            (Some(page), Some(limit)) if page > 0 && limit > 0 => Ok(Self { page, limit }),
            _ => Err(AppError::BadRequest(
                "Invalid query params for pagination".into(),
            )),
        }
    }

    /// Index of the first element on this page. Saturates on huge
    /// page/limit combinations; callers clamp against the actual length.
    pub fn start_index(&self) -> usize {
        usize::try_from((self.page - 1).saturating_mul(self.limit)).unwrap_or(usize::MAX)
    }
}

/// The pagination envelope returned alongside every paginated result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(rename = "totalCount")]
    pub total_count: u64,
    pub limit: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
}

impl PageMeta {
    pub fn new(total_count: u64, limit: i64) -> Self {
        Self {
            total_count,
            limit,
            total_pages: total_count.div_ceil(limit as u64),
        }
    }
}

/// Slice one page out of an already-loaded sequence.
///
/// Used where the source data lives inside a single document (a user's
/// `friends` or `list_ids` array), so the whole sequence is in memory and
/// pagination is plain index arithmetic.
pub fn paginate_slice<T: Clone>(items: &[T], params: &PageParams) -> (Vec<T>, PageMeta) {
    let meta = PageMeta::new(items.len() as u64, params.limit);
    let start = params.start_index().min(items.len());
    let end = start
        .saturating_add(usize::try_from(params.limit).unwrap_or(usize::MAX))
        .min(items.len());
    (items[start..end].to_vec(), meta)
}
