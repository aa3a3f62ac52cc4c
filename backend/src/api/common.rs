//! Shared API plumbing for list endpoints and error responses.
//!
//! Provides:
//! - The generic paginated-query engine reused by every list endpoint
//! - The page envelope returned to clients
//! - ServiceError to HTTP status code mapping
//! - Validation error formatting helpers
//!
//! # Paging Flow
//! 1. The handler deserializes query parameters into a `PagedRequest`
//! 2. The service fetches the matching collection from its repository
//! 3. `paginate` filters, counts, sorts and slices, in that order, so the
//!    totals stay consistent regardless of slice position
//!
//! # Error Handling Flow
//! 1. Service layer returns a domain-specific `ServiceError`
//! 2. `service_error_to_http` converts it to the appropriate HTTP response
//! 3. Internal detail is logged here and never echoed to the client

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// Pagination and filtering parameters accepted by list endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedRequest {
    /// Page number (1-indexed)
    pub page: Option<u32>,
    /// Number of items per page
    pub page_size: Option<u32>,
    /// Free-text search term, matched across an entity's search fields
    pub search: Option<String>,
    /// Field to sort by
    pub sort_by: Option<String>,
    /// "asc" (default) or "desc"
    pub sort_order: Option<String>,
}

impl PagedRequest {
    /// Page number with default, never below 1.
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size with default, clamped to 1-100.
    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(10).clamp(1, 100)
    }

    /// Number of records to skip before the requested page.
    pub fn skip(&self) -> usize {
        ((self.page() as u64 - 1) * self.page_size() as u64) as usize
    }

    pub fn ascending(&self) -> bool {
        !matches!(self.sort_order.as_deref(), Some(order) if order.eq_ignore_ascii_case("desc"))
    }

    /// The search term with surrounding whitespace removed; a blank term is
    /// equivalent to no term at all.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

/// Page envelope carrying a data slice plus pagination metadata.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    pub data: Vec<T>,
    pub total_count: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl<T> PagedResponse<T> {
    /// Builds the envelope from a data slice and the *pre-slice* total.
    pub fn new(data: Vec<T>, total_count: u64, page: u32, page_size: u32) -> Self {
        let total_pages = (total_count.div_ceil(page_size as u64)) as u32;
        PagedResponse {
            data,
            total_count,
            page,
            page_size,
            total_pages,
            has_next_page: page < total_pages,
            has_previous_page: page > 1,
        }
    }
}

/// Entities with a fixed set of free-text-searchable string fields.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

pub type Predicate<'a, T> = Box<dyn Fn(&T) -> bool + 'a>;
pub type SortKey<'a, T> = Box<dyn Fn(&T) -> String + 'a>;

/// Builds the search predicate for a request: an OR of case-insensitive
/// substring matches across the entity's search fields. Returns `None` when
/// the request carries no usable term.
pub fn search_filter<'a, T: Searchable>(request: &PagedRequest) -> Option<Predicate<'a, T>> {
    let needle = request.search_term()?.to_lowercase();
    Some(Box::new(move |item: &T| {
        item.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }))
}

/// Applies the paged query to a collection: filter, count, sort, then slice.
///
/// The total is computed before skip/take so `totalPages`, `hasNextPage` and
/// `hasPreviousPage` are consistent for every page of the same query.
pub fn paginate<T>(
    items: Vec<T>,
    request: &PagedRequest,
    predicate: Option<Predicate<'_, T>>,
    sort_key: Option<SortKey<'_, T>>,
    ascending: bool,
) -> PagedResponse<T> {
    let mut filtered: Vec<T> = match predicate {
        Some(matches) => items.into_iter().filter(|item| matches(item)).collect(),
        None => items,
    };

    let total_count = filtered.len() as u64;

    if let Some(key) = sort_key {
        filtered.sort_by(|a, b| {
            let ordering = key(a).cmp(&key(b));
            if ascending { ordering } else { ordering.reverse() }
        });
    }

    let data: Vec<T> = filtered
        .into_iter()
        .skip(request.skip())
        .take(request.page_size() as usize)
        .collect();

    PagedResponse::new(data, total_count, request.page(), request.page_size())
}

/// Error body returned for failed requests.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Human-readable, safe-for-clients message
    pub message: String,
    /// Machine-readable error category
    pub error_type: String,
}

/// Converts ServiceError to the appropriate HTTP response.
///
/// Full detail for token and persistence failures is logged here; clients
/// only ever see the classified kind and a generic message.
pub fn service_error_to_http(error: ServiceError) -> (StatusCode, String) {
    let (status, error_type, message) = match error {
        ServiceError::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "Invalid credentials".to_string(),
        ),
        ServiceError::InvalidToken { message } => {
            tracing::warn!("Token rejected: {}", message);
            (
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "Invalid or expired token".to_string(),
            )
        }
        ServiceError::AlreadyExists { entity, identifier } => (
            StatusCode::CONFLICT,
            "already_exists",
            format!("{} '{}' already exists", entity, identifier),
        ),
        ServiceError::Unauthorized { message } => {
            (StatusCode::UNAUTHORIZED, "unauthorized", message)
        }
        ServiceError::NotFound { entity, identifier } => (
            StatusCode::NOT_FOUND,
            "not_found",
            format!("{} '{}' not found", entity, identifier),
        ),
        ServiceError::Validation { message } => {
            (StatusCode::BAD_REQUEST, "validation_error", message)
        }
        ServiceError::Database { source } => {
            tracing::error!("Database error: {}", source);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "database_error",
                "Internal server error".to_string(),
            )
        }
        ServiceError::Internal { message } => {
            tracing::error!("Internal error: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error".to_string(),
            )
        }
    };

    let body = ApiError {
        message,
        error_type: error_type.to_string(),
    };
    (status, serde_json::to_string(&body).unwrap())
}

/// Flattens validator errors into a single human-readable message.
pub fn validation_errors_to_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                format!(
                    "{}: {}",
                    field,
                    error.message.as_ref().unwrap_or(&"Invalid value".into())
                )
            })
        })
        .collect::<Vec<String>>()
        .join(", ")
}
