use crate::auth::Claims;
use crate::contact::ContactLinks;
use crate::db::models::{QuoteFilter, QuoteStatus, Service};
use crate::db::quotes;
use crate::http::{
    ApiError, AppState, BulkDeleteResponse, BulkIds, BulkStatusResponse, BulkStatusUpdate, MessageResponse,
    QuoteCreated, QuoteDetail, QuoteListQuery, QuoteListResponse, QuoteSubmission, StatusUpdate,
};
use crate::utils::{mask_email, mask_sensitive};
use crate::validation::validate_quote;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Duration, Utc};

const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 100;
/// Upper bound on ids accepted by one bulk request.
const MAX_BULK_IDS: usize = 500;

const QUOTE_NOT_FOUND: &str = "Quote not found";

pub async fn submit_quote_handler(
    State(state): State<AppState>,
    payload: Result<Json<QuoteSubmission>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let new_quote = validate_quote(&req)?;

    tracing::info!(
        "📥 Quote request: service={} email={} phone={}",
        new_quote.service,
        mask_email(&new_quote.email),
        mask_sensitive(&new_quote.phone)
    );

    let quote = quotes::create_quote(&state.db_pool, new_quote)
        .await
        .map_err(|e| ApiError::internal("Error submitting quote request", e))?;

    Ok((
        StatusCode::CREATED,
        Json(QuoteCreated {
            message: "Quote request submitted successfully".to_string(),
            quote,
        }),
    ))
}

pub async fn list_quotes_handler(
    State(state): State<AppState>,
    query: Result<Query<QuoteListQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = query?;
    let (filter, page) = build_filter(&params, Utc::now())?;

    let (quotes_page, total) = quotes::list_quotes(&state.db_pool, &filter)
        .await
        .map_err(|e| ApiError::internal("Error fetching quotes", e))?;

    Ok((
        StatusCode::OK,
        Json(QuoteListResponse {
            quotes: quotes_page,
            total,
            page,
            total_pages: total_pages(total, filter.limit),
        }),
    ))
}

pub async fn quote_stats_handler(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let stats = quotes::count_by_status(&state.db_pool)
        .await
        .map_err(|e| ApiError::internal("Error fetching quote statistics", e))?;

    Ok((StatusCode::OK, Json(stats)))
}

pub async fn get_quote_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let quote = quotes::get_quote_by_id(&state.db_pool, &id)
        .await
        .map_err(|e| ApiError::internal("Error fetching quote", e))?
        .ok_or_else(|| ApiError::NotFound(QUOTE_NOT_FOUND.to_string()))?;

    let contact = ContactLinks::for_quote(&quote);
    Ok((StatusCode::OK, Json(QuoteDetail { quote, contact })))
}

pub async fn update_status_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let status = payload
        .ok()
        .and_then(|Json(req)| parse_status(&req.status))
        .ok_or_else(|| ApiError::BadRequest("Invalid status".to_string()))?;

    let quote = quotes::update_quote_status(&state.db_pool, &id, status)
        .await
        .map_err(|e| ApiError::internal("Error updating quote status", e))?
        .ok_or_else(|| ApiError::NotFound(QUOTE_NOT_FOUND.to_string()))?;

    tracing::info!("🔄 Quote {} -> {} by {}", quote.id, status, mask_email(&claims.email));

    Ok((StatusCode::OK, Json(quote)))
}

pub async fn delete_quote_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = quotes::delete_quote(&state.db_pool, &id)
        .await
        .map_err(|e| ApiError::internal("Error deleting quote", e))?;

    if !deleted {
        return Err(ApiError::NotFound(QUOTE_NOT_FOUND.to_string()));
    }

    tracing::info!("🗑️ Quote {} deleted by {}", id, mask_email(&claims.email));

    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: "Quote deleted successfully".to_string(),
        }),
    ))
}

pub async fn bulk_delete_handler(
    State(state): State<AppState>,
    payload: Result<Json<BulkIds>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let ids = check_ids(req.ids)?;

    let deleted_count = quotes::bulk_delete_quotes(&state.db_pool, &ids)
        .await
        .map_err(|e| ApiError::internal("Error deleting quotes", e))?;

    tracing::info!("🗑️ Bulk delete: {} of {} quotes removed", deleted_count, ids.len());

    Ok((
        StatusCode::OK,
        Json(BulkDeleteResponse {
            message: format!("{} quote(s) deleted successfully", deleted_count),
            deleted_count,
        }),
    ))
}

pub async fn bulk_status_handler(
    State(state): State<AppState>,
    payload: Result<Json<BulkStatusUpdate>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let status = parse_status(&req.status).ok_or_else(|| ApiError::BadRequest("Invalid status".to_string()))?;
    let ids = check_ids(req.ids)?;

    let modified_count = quotes::bulk_update_quote_status(&state.db_pool, &ids, status)
        .await
        .map_err(|e| ApiError::internal("Error updating quotes status", e))?;

    tracing::info!("🔄 Bulk status -> {}: {} of {} quotes", status, modified_count, ids.len());

    Ok((
        StatusCode::OK,
        Json(BulkStatusResponse {
            message: format!("{} quote(s) updated successfully", modified_count),
            modified_count,
        }),
    ))
}

fn parse_status(raw: &str) -> Option<QuoteStatus> {
    raw.trim().parse().ok()
}

/// Drops blanks and duplicates; rejects an empty or oversized selection.
fn check_ids(ids: Vec<String>) -> Result<Vec<String>, ApiError> {
    let mut unique: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        let id = id.trim().to_string();
        if !id.is_empty() && !unique.contains(&id) {
            unique.push(id);
        }
    }

    if unique.is_empty() {
        return Err(ApiError::BadRequest("No quotes selected".to_string()));
    }
    if unique.len() > MAX_BULK_IDS {
        return Err(ApiError::BadRequest(format!(
            "At most {} quotes can be changed at once",
            MAX_BULK_IDS
        )));
    }
    Ok(unique)
}

/// `None` for an absent, empty or `Any` filter value.
fn filter_value(raw: &Option<String>) -> Option<&str> {
    raw.as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("any"))
}

fn range_start(range: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match range {
        "today" => now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|midnight| midnight.and_utc()),
        "week" => Some(now - Duration::days(7)),
        "month" => Some(now - Duration::days(30)),
        _ => None,
    }
}

/// Translates dashboard query parameters into a store filter and the
/// effective page number.
fn build_filter(params: &QuoteListQuery, now: DateTime<Utc>) -> Result<(QuoteFilter, u32), ApiError> {
    let status = filter_value(&params.status)
        .map(|v| parse_status(v).ok_or_else(|| ApiError::BadRequest("Invalid status".to_string())))
        .transpose()?;

    let service = filter_value(&params.service)
        .map(|v| {
            v.parse::<Service>()
                .map_err(|_| ApiError::BadRequest("Invalid service".to_string()))
        })
        .transpose()?;

    let created_since = filter_value(&params.date_range)
        .map(|v| range_start(v, now).ok_or_else(|| ApiError::BadRequest("Invalid date range".to_string())))
        .transpose()?;

    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

    let filter = QuoteFilter {
        status,
        service,
        created_since,
        search: params.search.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(String::from),
        limit: i64::from(limit),
        offset: i64::from(page - 1) * i64::from(limit),
    };

    Ok((filter, page))
}

fn total_pages(total: i64, limit: i64) -> u32 {
    if total <= 0 || limit <= 0 {
        return 1;
    }
    u32::try_from((total + limit - 1) / limit).unwrap_or(u32::MAX)
}
