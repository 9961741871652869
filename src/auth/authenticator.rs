//! Authenticator implementation
//!
//! Builds the `Authorization: Basic <base64(key:secret)>` header.

use super::types::Credentials;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::fmt;

/// Name of the header produced by the authenticator
pub const AUTHORIZATION: &str = "Authorization";

/// Produces the basic-auth header for every API request
#[derive(Clone)]
pub struct Authenticator {
    credentials: Credentials,
    /// Header value, computed once
    header_value: String,
}

impl Authenticator {
    /// Create a new authenticator for the given credentials
    pub fn new(credentials: Credentials) -> Self {
        let token = STANDARD.encode(format!(
            "{}:{}",
            credentials.api_key, credentials.api_secret
        ));
        Self {
            credentials,
            header_value: format!("Basic {token}"),
        }
    }

    /// The credentials this authenticator was built from
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The `Authorization` header as a `(name, value)` pair
    pub fn header(&self) -> (&'static str, &str) {
        (AUTHORIZATION, &self.header_value)
    }

    /// Just the header value (`Basic ...`)
    pub fn header_value(&self) -> &str {
        &self.header_value
    }
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}
