//! CRUD and boost endpoints over the showcase store.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::TimeDelta;
use linkkarma_core::domain::parse_http_url;
use linkkarma_core::{Category, Showcase, ShowcaseStatus};
use linkkarma_store::{NewShowcase, ShowcaseFilter, ShowcaseUpdate, SortOrder};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_BOOST_HOURS: i64 = 24;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

fn ok<T>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        data,
    })
}

/// Query string of `GET /api/showcases`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowcaseQuery {
    pub category: Option<Category>,
    pub status: Option<ShowcaseStatus>,
    pub user_id: Option<String>,
    pub search: Option<String>,
    #[serde(default)]
    pub sort: SortOrder,
}

impl From<ShowcaseQuery> for ShowcaseFilter {
    fn from(q: ShowcaseQuery) -> Self {
        Self {
            category: q.category,
            status: q.status,
            user_id: q.user_id,
            search: q.search,
            sort: q.sort,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BoostRequest {
    pub karma: i64,
    #[serde(default = "default_boost_hours")]
    pub hours: i64,
}

fn default_boost_hours() -> i64 {
    DEFAULT_BOOST_HOURS
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| ApiError::InvalidBody(e.body_text()))
}

pub async fn list_showcases(
    State(state): State<AppState>,
    query: Result<Query<ShowcaseQuery>, QueryRejection>,
) -> Result<Json<Envelope<Vec<Showcase>>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::InvalidQuery(e.body_text()))?;
    let showcases = state.store.list(&query.into()).await?;
    Ok(ok(showcases))
}

pub async fn create_showcase(
    State(state): State<AppState>,
    payload: Result<Json<NewShowcase>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Showcase>>), ApiError> {
    let new = json_body(payload)?;
    if parse_http_url(&new.referral_url).is_none() {
        return Err(ApiError::InvalidUrl);
    }
    let showcase = state.store.create(new).await?;
    Ok((StatusCode::CREATED, ok(showcase)))
}

pub async fn get_showcase(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Showcase>>, ApiError> {
    Ok(ok(state.store.get(&id).await?))
}

pub async fn update_showcase(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ShowcaseUpdate>, JsonRejection>,
) -> Result<Json<Envelope<Showcase>>, ApiError> {
    let update = json_body(payload)?;
    if let Some(url) = &update.referral_url
        && parse_http_url(url).is_none()
    {
        return Err(ApiError::InvalidUrl);
    }
    let showcase = state.store.update(&id, update).await?;
    Ok(ok(showcase))
}

pub async fn delete_showcase(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.store.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn boost_showcase(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<BoostRequest>, JsonRejection>,
) -> Result<Json<Envelope<Showcase>>, ApiError> {
    let boost = json_body(payload)?;
    let featured_for = TimeDelta::try_hours(boost.hours)
        .filter(|d| *d > TimeDelta::zero())
        .ok_or_else(|| ApiError::Validation(format!("hours must be positive, got {}", boost.hours)))?;
    let showcase = state.store.boost(&id, boost.karma, featured_for).await?;
    Ok(ok(showcase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_maps_to_filter() {
        let query: ShowcaseQuery =
            serde_json::from_str(r#"{"category": "crypto", "userId": "ana", "sort": "popular"}"#)
                .unwrap();
        let filter = ShowcaseFilter::from(query);
        assert_eq!(filter.category, Some(Category::Crypto));
        assert_eq!(filter.user_id.as_deref(), Some("ana"));
        assert_eq!(filter.sort, SortOrder::Popular);
        assert!(filter.search.is_none());
    }

    #[test]
    fn boost_hours_default() {
        let boost: BoostRequest = serde_json::from_str(r#"{"karma": 50}"#).unwrap();
        assert_eq!(boost.hours, DEFAULT_BOOST_HOURS);
    }
}
