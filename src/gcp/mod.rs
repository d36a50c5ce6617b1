//! GCP plumbing
//!
//! Authentication and HTTP transport for the Compute Engine API.
//!
//! # Module Structure
//!
//! - [`auth`] - Credentials (ADC or static token) and project/zone discovery
//! - [`http`] - reqwest-backed [`Transport`] implementation
//! - [`transport`] - The [`Transport`] trait and [`ApiRequest`] descriptor
//!
//! # Example
//!
//! ```ignore
//! use gcompute::gcp::{ApiRequest, Credentials, HttpTransport, Transport};
//!
//! async fn example() -> gcompute::Result<()> {
//!     let credentials = Credentials::application_default().await?;
//!     let transport = HttpTransport::new(gcompute::gcp::DEFAULT_BASE_URL, "my-project", credentials)?;
//!     let zones = transport.send(ApiRequest::get("/zones")).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod http;
pub mod transport;

pub use auth::{Credentials, COMPUTE_SCOPE};
pub use http::{HttpTransport, DEFAULT_BASE_URL};
pub use transport::{ApiRequest, Transport};
