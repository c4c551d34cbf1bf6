//! Command implementations.
//!
//! Every command talks to the marketplace API with the operator's own
//! session, so the API enforces the same permissions it would in a browser.
//!
//! # Environment Variables
//!
//! - `FOODHUB_API_URL` - Marketplace REST API base URL
//! - `FOODHUB_AUTH_URL` - Auth provider base URL
//! - `FOODHUB_SESSION_COOKIE` - Cookie header of a signed-in session

pub mod categories;
pub mod meals;
pub mod orders;
pub mod users;

use std::io::Write;

use foodhub_storefront::api::{ApiClient, ApiError, Credentials};
use foodhub_storefront::config::{ApiConfig, ConfigError};
use serde::Serialize;
use thiserror::Error;

/// Environment variable holding the operator's session cookie.
const SESSION_COOKIE_VAR: &str = "FOODHUB_SESSION_COOKIE";

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration is missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// The API call failed.
    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),

    /// The request was refused before reaching the API.
    #[error("{0}")]
    Rejected(String),

    /// Output could not be written.
    #[error("Failed to write output: {0}")]
    Output(#[from] serde_json::Error),
}

/// API client and credentials for one invocation.
pub struct Context {
    pub api: ApiClient,
    pub credentials: Credentials,
}

impl Context {
    /// Build the context from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the API configuration or session cookie is missing.
    pub fn from_env() -> Result<Self, CliError> {
        dotenvy::dotenv().ok();

        let config = ApiConfig::from_env()?;
        let credentials = std::env::var(SESSION_COOKIE_VAR)
            .ok()
            .as_deref()
            .and_then(Credentials::from_cookie_header)
            .ok_or(CliError::MissingEnvVar(SESSION_COOKIE_VAR))?;

        Ok(Self {
            api: ApiClient::new(&config)?,
            credentials,
        })
    }
}

/// Write a value to stdout as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout).map_err(serde_json::Error::io)?;
    Ok(())
}
