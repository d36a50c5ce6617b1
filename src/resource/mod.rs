//! Resource handles
//!
//! One lightweight handle type per Compute Engine resource kind. Handles
//! carry identity (facade or parent, name) plus the last metadata seen, and
//! expose their REST verbs through the capability traits in [`core`].
//!
//! # Architecture
//!
//! - [`core`] - [`ResourceCore`] and the [`ServiceObject`] / [`Exists`] /
//!   [`GetMetadata`] / [`Get`] / [`Delete`] traits
//! - [`list`] - Flat and aggregated list normalization, [`paginate`]
//! - one module per kind: firewalls, networks, backend services,
//!   operations, regions, zones, snapshots, disks, VMs, addresses and
//!   autoscalers
//!
//! # Example
//!
//! ```ignore
//! use gcompute::resource::{Delete, ServiceObject};
//!
//! async fn drop_snapshot(compute: &gcompute::Compute) -> gcompute::Result<()> {
//!     let mut operation = compute.snapshot("nightly").delete().await?;
//!     operation.wait_for_done(std::time::Duration::from_secs(2)).await?;
//!     Ok(())
//! }
//! ```

mod address;
mod autoscaler;
pub mod core;
mod disk;
mod firewall;
pub mod list;
mod network;
mod operation;
mod region;
mod service;
mod snapshot;
mod vm;
mod zone;

pub use self::core::{Delete, Exists, Get, GetMetadata, ResourceCore, Scope, ServiceObject};
pub use address::Address;
pub use autoscaler::Autoscaler;
pub use disk::Disk;
pub use firewall::Firewall;
pub(crate) use firewall::normalize_firewall_config;
pub use list::{paginate, Created, ListPage, LocationScope};
pub use network::Network;
pub(crate) use network::normalize_network_config;
pub use operation::{Operation, STATUS_DONE};
pub use region::Region;
pub use service::Service;
pub use snapshot::{Snapshot, SnapshotOwner};
pub use vm::Vm;
pub use zone::Zone;
