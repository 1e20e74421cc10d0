//! API Credentials - Authorization Header Selection
//!
//! Holds the single Manifold API key loaded from the environment and
//! renders it into the `Authorization` header each endpoint expects.
//! Which scheme an endpoint needs is fixed by the remote API:
//! profile lookups take a bearer token, writes and `/me` take the
//! `Key` scheme, everything else is public.

use std::fmt;

use crate::error::ApiError;

/// Environment variables searched for the API key, in order.
pub const API_KEY_VARS: [&str; 2] = ["MANIFOLD_API_KEY", "API_KEY"];

/// How a request is authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// No header.
    Public,
    /// `Authorization: Bearer <key>`.
    Bearer,
    /// `Authorization: Key <key>`.
    Key,
}

/// API credentials. The key never appears in `Debug` output.
#[derive(Clone, Default)]
pub struct ApiCredentials {
    api_key: Option<String>,
}

impl ApiCredentials {
    /// Load the key from the process environment, reading `.env` first.
    ///
    /// A missing key is not an error here: public endpoints still work,
    /// and authenticated calls fail with `ApiError::MissingCredentials`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load the key through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = API_KEY_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty());
        Self { api_key }
    }

    /// Credentials with an explicit key.
    pub fn with_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
        }
    }

    /// Credentials without a key (public endpoints only).
    pub const fn anonymous() -> Self {
        Self { api_key: None }
    }

    pub const fn has_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// `Authorization` header value for `scheme`, if any.
    ///
    /// # Errors
    /// `ApiError::MissingCredentials` when `scheme` needs a key and none
    /// is configured.
    pub fn authorization(&self, scheme: AuthScheme, path: &str) -> Result<Option<String>, ApiError> {
        let prefix = match scheme {
            AuthScheme::Public => return Ok(None),
            AuthScheme::Bearer => "Bearer",
            AuthScheme::Key => "Key",
        };
        match &self.api_key {
            Some(key) => Ok(Some(format!("{prefix} {key}"))),
            None => Err(ApiError::MissingCredentials {
                path: path.to_string(),
            }),
        }
    }
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
