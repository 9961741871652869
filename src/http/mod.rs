//! HTTP module
//!
//! Request parameter building and the single-call HTTP wrapper.
//!
//! # Features
//!
//! - **ParamBuilder**: method, auth/version headers, and JSON body per request
//! - **HttpCaller**: one request, 2xx classification, one log record per call
//! - **ApiClient**: the `reqwest` implementation of `HttpCaller`
//!
//! Calls are never retried here. Callers decide what a failure means.

mod client;
mod params;

pub use client::{ApiClient, ApiClientConfig, ApiClientConfigBuilder, HttpCaller, RawResponse};
pub use params::{ParamBuilder, RequestParams, DEFAULT_API_VERSION};
