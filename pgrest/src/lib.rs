//! Client for a PostgREST-style data service and its token-issuing auth API.
//!
//! The wire shapes follow the hosted "backend as a service" layout: tables under
//! `/rest/v1/{table}` and tokens under `/auth/v1/token`.

mod auth;
mod client;
mod query;
mod service_url;

#[cfg(any(test, feature = "test-util"))]
pub mod test_server;

pub use auth::*;
pub use client::*;
pub use query::*;
pub use service_url::*;
