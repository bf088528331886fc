//! FOLIO gateway.
//!
//! [`FolioClient`] implements [`fuiman_import::Gateway`] over blocking HTTP:
//! it logs in with `/authn/login-with-expiry`, sends the tenant and token
//! headers with every request, posts batches to `/user-import` and logs out
//! when the connection is dropped.

mod client;
mod config;
mod error;

pub use client::{
    ACCESS_TOKEN_COOKIE, FolioClient, FolioConnection, HEALTH_PATH, LOGIN_PATH, LOGOUT_PATH,
    login_failure_reason,
};
pub use config::{DEFAULT_TIMEOUT, FolioConfig, parse_endpoint};
pub use error::{FolioError, Result};
