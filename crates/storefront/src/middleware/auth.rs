//! Authentication extractors.
//!
//! Sign-in is handled by the external auth provider. These extractors forward
//! the caller's cookie to the provider's session lookup and turn the answer
//! into a [`CurrentUser`].

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
    response::{IntoResponse, Redirect, Response},
};

use crate::api::Credentials;
use crate::error::{AppError, set_sentry_user};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Where browsers are sent when a page needs a signed-in user.
pub const LOGIN_PATH: &str = "/login";

/// Extractor that requires a signed-in user.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when authentication is required but nobody is signed in.
pub enum AuthRejection {
    /// Redirect to login page (for browser navigation).
    RedirectToLogin,
    /// Unauthorized response (for API clients).
    Unauthorized,
    /// The auth provider could not be asked.
    Unavailable(AppError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::Unauthorized => {
                AppError::Unauthorized("Please log in to continue.".to_string()).into_response()
            }
            Self::Unavailable(err) => err.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match resolve_user(parts, state).await {
            Ok(Some(user)) => Ok(Self(user)),
            Ok(None) if wants_html(&parts.headers) => Err(AuthRejection::RedirectToLogin),
            Ok(None) => Err(AuthRejection::Unauthorized),
            Err(err) => Err(AuthRejection::Unavailable(err)),
        }
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this never rejects: an unreachable auth provider is
/// logged and treated as signed out.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = resolve_user(parts, state).await.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Session lookup failed, continuing as guest");
            None
        });
        Ok(Self(user))
    }
}

async fn resolve_user(parts: &Parts, state: &AppState) -> Result<Option<CurrentUser>, AppError> {
    let Some(credentials) = Credentials::from_headers(&parts.headers) else {
        return Ok(None);
    };

    let Some(user) = state.api().get_session(&credentials).await? else {
        return Ok(None);
    };

    set_sentry_user(&user.id, Some(&user.email));
    Ok(Some(CurrentUser::new(user, credentials)))
}

/// Whether the client is a browser navigating to a page.
pub(crate) fn wants_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};

    fn headers(accept: Option<&str>) -> HeaderMap {
        let mut builder = Request::builder().uri("/orders");
        if let Some(accept) = accept {
            builder = builder.header(header::ACCEPT, accept);
        }
        builder.body(()).unwrap().into_parts().0.headers
    }

    #[test]
    fn test_wants_html() {
        assert!(wants_html(&headers(Some("text/html,application/xhtml+xml"))));
        assert!(!wants_html(&headers(Some("application/json"))));
        assert!(!wants_html(&headers(None)));
    }

    #[test]
    fn test_rejection_responses() {
        let redirect = AuthRejection::RedirectToLogin.into_response();
        assert_eq!(redirect.status(), StatusCode::SEE_OTHER);
        assert_eq!(redirect.headers().get(header::LOCATION).unwrap(), LOGIN_PATH);

        let unauthorized = AuthRejection::Unauthorized.into_response();
        assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);
    }
}
