//! Authentication module
//!
//! The API uses HTTP Basic authentication built from an API key and secret.
//! The `Authenticator` turns [`Credentials`] into the `Authorization` header
//! consumed by the request parameter builder.

mod authenticator;
mod types;

pub use authenticator::{Authenticator, AUTHORIZATION};
pub use types::Credentials;
