//! Google Compute Engine client
//!
//! Firewalls, networks, backend services, disks, VMs, snapshots, zones,
//! regions, operations, autoscalers and addresses as Rust values.
//!
//! # Module Structure
//!
//! - [`compute`] - The project-scoped [`Compute`] facade
//! - [`resource`] - Resource handles and list normalization
//! - [`gcp`] - Authentication and HTTP transport
//! - [`query`] - List query parameters
//! - [`config`] - Persistent configuration
//! - [`error`] - Error type
//!
//! # Example
//!
//! ```ignore
//! use gcompute::{Compute, Query};
//! use gcompute::resource::ServiceObject;
//! use serde_json::json;
//!
//! async fn example() -> gcompute::Result<()> {
//!     let compute = Compute::new("my-project").await?;
//!
//!     let page = compute
//!         .get_vms(Some(&Query::new().with("maxResults", 50)))
//!         .await?;
//!     for vm in &page.items {
//!         println!("{} in {}", vm.name(), vm.zone_name());
//!     }
//!
//!     let created = compute
//!         .create_firewall("allow-ssh", json!({ "protocols": { "tcp": 22 }, "ranges": "0.0.0.0/0" }))
//!         .await?;
//!     println!("operation {}", created.operation.name());
//!     Ok(())
//! }
//! ```

pub mod compute;
pub mod config;
pub mod error;
pub mod gcp;
pub mod query;
pub mod resource;

pub use compute::{Compute, ComputeBuilder};
pub use config::Config;
pub use error::{format_api_error, Error, Result};
pub use query::Query;
pub use resource::{paginate, Created, ListPage};
