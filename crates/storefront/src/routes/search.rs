//! Search route handlers.
//!
//! Both endpoints are debounced per visitor. A request that a newer one
//! superseded answers `204 No Content`; the client keeps showing whatever the
//! newest request returns.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use foodhub_core::models::{Meal, Provider};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::{MealQuery, Page};
use crate::error::{AppError, Envelope, Result};
use crate::search::{SearchKind, visitor_key};
use crate::state::AppState;

/// Search query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

impl SearchParams {
    fn term(&self) -> Option<String> {
        Some(self.q.trim())
            .filter(|q| !q.is_empty())
            .map(String::from)
    }
}

/// Search meals by name.
#[instrument(skip(state, session))]
pub async fn meals(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<SearchParams>,
) -> Result<Response> {
    let visitor = visitor_key(&session).await?;
    let search = state.searches().get(&visitor, SearchKind::Meals).await;

    let query = MealQuery {
        search: params.term(),
        ..MealQuery::default()
    };
    let api = state.api();
    let result = search
        .run(|| async move { api.list_meals(&query).await.map_err(AppError::from) })
        .await?;

    Ok(respond::<Meal>(result))
}

/// Search providers by name.
#[instrument(skip(state, session))]
pub async fn providers(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<SearchParams>,
) -> Result<Response> {
    let visitor = visitor_key(&session).await?;
    let search = state.searches().get(&visitor, SearchKind::Providers).await;

    let term = params.term();
    let api = state.api();
    let result = search
        .run(|| async move {
            api.list_providers(term.as_deref())
                .await
                .map_err(AppError::from)
        })
        .await?;

    Ok(respond::<Provider>(result))
}

fn respond<T: serde::Serialize>(result: Option<Page<T>>) -> Response {
    match result {
        Some(page) => Envelope::ok(page).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
