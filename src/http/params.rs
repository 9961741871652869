//! Request parameter construction
//!
//! Pure data transform: no I/O happens here.

use crate::auth::Authenticator;
use crate::types::{Item, Method, StringMap};

/// API version sent in the `Accept` header when none is configured
pub const DEFAULT_API_VERSION: u32 = 1;

/// Everything needed to issue one request, apart from the URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParams {
    /// HTTP method
    pub method: Method,
    /// Request headers
    pub headers: StringMap,
    /// Serialized JSON body (PATCH/POST only)
    pub body: Option<String>,
    /// Log the response at debug level instead of info
    pub muted: bool,
}

impl RequestParams {
    /// Same parameters, with response logging lowered to debug
    #[must_use]
    pub fn muted(mut self) -> Self {
        self.muted = true;
        self
    }

    /// Look up a header value
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// Builds [`RequestParams`] carrying auth and version headers
#[derive(Debug, Clone)]
pub struct ParamBuilder {
    authenticator: Authenticator,
    api_version: u32,
}

impl ParamBuilder {
    /// Create a builder for the given authenticator and API version
    pub fn new(authenticator: Authenticator, api_version: u32) -> Self {
        Self {
            authenticator,
            api_version,
        }
    }

    /// The API version embedded in the `Accept` header
    pub fn api_version(&self) -> u32 {
        self.api_version
    }

    /// Build request parameters for `method`.
    ///
    /// PATCH and POST serialize `payload` (an empty object when absent);
    /// GET and DELETE never carry a body.
    pub fn build(&self, method: Method, payload: Option<&Item>) -> RequestParams {
        let mut headers = StringMap::new();
        let (auth_name, auth_value) = self.authenticator.header();
        headers.insert(auth_name.to_string(), auth_value.to_string());
        headers.insert(
            "Accept".to_string(),
            format!("application/json;version={}", self.api_version),
        );
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        let body = method
            .carries_body()
            .then(|| payload.map_or_else(|| "{}".to_string(), ToString::to_string));

        RequestParams {
            method,
            headers,
            body,
            muted: false,
        }
    }
}
