//! Session lookup against the authentication provider.
//!
//! Sign-in and sign-up live entirely with the provider; the storefront only
//! asks who the forwarded cookie belongs to.

use foodhub_core::{Role, UserId};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{ApiClient, ApiError, Credentials, decode, join_url, with_credentials};

/// The signed-in identity as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    pub role: Role,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Deserialize)]
struct SessionBody {
    #[serde(default)]
    user: Option<SessionUser>,
}

impl ApiClient {
    /// Resolve the session behind the forwarded cookie.
    ///
    /// Returns `Ok(None)` when the provider knows no session for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider is unreachable or answers with an
    /// unexpected body.
    #[instrument(skip(self, credentials))]
    pub async fn get_session(
        &self,
        credentials: &Credentials,
    ) -> Result<Option<SessionUser>, ApiError> {
        let url = join_url(&self.inner.auth_url, &["get-session"])?;
        let request = with_credentials(
            self.inner.client.request(Method::GET, url),
            Some(credentials),
        );

        let body = match self.execute_raw(request, "Session not found.").await {
            Ok(body) => body,
            Err(ApiError::Remote { status, .. })
                if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN =>
            {
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let session: Option<SessionBody> = decode(&body)?;
        Ok(session.and_then(|s| s.user))
    }
}
