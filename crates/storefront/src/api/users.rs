//! User endpoints.

use foodhub_core::models::{UpdateUserStatus, User, UserProfileInput};
use foodhub_core::{UserId, UserStatus};
use reqwest::Method;
use tracing::instrument;

use super::{ApiClient, ApiError, Credentials, Page};

impl ApiClient {
    /// The full record of the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not signed in or the request fails.
    #[instrument(skip(self, credentials))]
    pub async fn current_user(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let request = self.request(Method::GET, &["users", "me"], Some(credentials))?;
        self.execute(request, "Failed to fetch user.").await
    }

    /// List all users (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, credentials))]
    pub async fn list_users(&self, credentials: &Credentials) -> Result<Page<User>, ApiError> {
        let request = self.request(Method::GET, &["users"], Some(credentials))?;
        self.execute_list(request, "Failed to fetch users.").await
    }

    /// Get one user.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for unknown IDs, or another error if the
    /// API request fails.
    #[instrument(skip(self, credentials), fields(user_id = %id))]
    pub async fn get_user(&self, credentials: &Credentials, id: &UserId) -> Result<User, ApiError> {
        let request = self.request(Method::GET, &["users", id.as_str()], Some(credentials))?;
        self.execute(request, "User not found.").await
    }

    /// Update a user's own profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the request or it fails.
    #[instrument(skip(self, credentials, input), fields(user_id = %id))]
    pub async fn update_user_profile(
        &self,
        credentials: &Credentials,
        id: &UserId,
        input: &UserProfileInput,
    ) -> Result<User, ApiError> {
        let request = self
            .request(Method::PATCH, &["users", id.as_str()], Some(credentials))?
            .json(input);
        self.execute(request, "Failed to update profile.").await
    }

    /// Activate or suspend an account (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the request or it fails.
    #[instrument(skip(self, credentials), fields(user_id = %id, status = %status))]
    pub async fn update_user_status(
        &self,
        credentials: &Credentials,
        id: &UserId,
        status: UserStatus,
    ) -> Result<User, ApiError> {
        let request = self
            .request(
                Method::PATCH,
                &["users", id.as_str(), "status"],
                Some(credentials),
            )?
            .json(&UpdateUserStatus { status });
        self.execute(request, "Failed to update user status.").await
    }
}
