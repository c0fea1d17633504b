//! Page windows over already-fetched lists.
//!
//! List endpoints load the full result set and cut a window out of it with
//! [`paginate`]. The arithmetic is kept bit-for-bit compatible with existing
//! clients:
//!
//! 1. negative `limit` and `page` are clamped to `0`
//! 2. `limit` is capped at the total number of items
//! 3. `start = (page - 1) * limit`, capped at `total`
//! 4. `end = start + limit`, capped at `total`
//!
//! A negative `start` (page `0` with a non-zero limit) is never raised to
//! zero; it is reported as an internal error.
//!
//! # Query parameters
//!
//! `?page=&limit=` are parsed by [`PaginationParams`]. When both are absent the
//! whole list is returned. An unparsable `limit` falls back to
//! [`DEFAULT_LIMIT`] and an unparsable `page` to [`DEFAULT_PAGE`].

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::IntoParams;

use crate::errors::AppError;

pub const DEFAULT_LIMIT: i64 = 10;
pub const DEFAULT_PAGE: i64 = 1;

/// Treats empty query values (`?page=`) as absent.
fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.is_empty()))
}

/// Raw `page`/`limit` query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number, 1-indexed
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub page: Option<String>,
    /// Items per page
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub limit: Option<String>,
}

impl PaginationParams {
    /// Resolves the requested `(page, limit)` window, or `None` when
    /// pagination was not requested at all.
    #[must_use]
    pub fn window(&self) -> Option<(i64, i64)> {
        if self.page.is_none() && self.limit.is_none() {
            return None;
        }

        let limit = self
            .limit
            .as_deref()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_LIMIT);
        let page = self
            .page
            .as_deref()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_PAGE);

        Some((page, limit))
    }
}

/// A window of items plus the size of the full list it was cut from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> Page<T> {
    /// Every item, for requests that asked for no window.
    pub fn all(items: Vec<T>) -> Self {
        let total = items.len();
        Self { items, total }
    }
}

/// Cuts the `page`-th window of `limit` items out of `items`.
///
/// # Errors
///
/// Returns an internal error when the computed start lies before the first
/// item, which happens for `page == 0` with a non-zero effective limit.
pub fn paginate<T>(items: Vec<T>, page: i64, limit: i64) -> Result<Page<T>, AppError> {
    let total = items.len() as i64;

    let mut limit = limit.max(0);
    let page = page.max(0);

    if limit > total {
        limit = total;
    }

    let mut start = (page - 1).saturating_mul(limit);
    if start > total {
        start = total;
    }

    let mut end = start.saturating_add(limit);
    if end > total {
        end = total;
    }

    if start < 0 {
        tracing::error!(page, limit, start, "pagination window starts before the first item");
        return Err(AppError::internal());
    }

    let items = items
        .into_iter()
        .skip(start as usize)
        .take((end - start) as usize)
        .collect();

    Ok(Page {
        items,
        total: total as usize,
    })
}
