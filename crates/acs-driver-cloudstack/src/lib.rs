//! CloudStack driver
//!
//! This crate implements the [`ClusterDriver`](acs_driver_core::ClusterDriver)
//! trait for CloudStack. Creating a cluster deploys a virtual machine
//! through the CloudStack HTTP query API; the other lifecycle operations
//! are answered without contacting the cloud.
//!
//! # Features
//!
//! - Settings extraction from the host's option bag
//! - Signed API requests (HMAC-SHA1) with async-job polling
//! - Virtual machine deployment
//! - Project creation
//!
//! # Example
//!
//! ```ignore
//! use acs_driver_cloudstack::CloudStackDriver;
//! use acs_driver_core::{ClusterDriver, ClusterInfo, DriverOptions};
//!
//! let driver = CloudStackDriver::new();
//! let opts = DriverOptions::new()
//!     .with_string("cluster-name", "demo")
//!     .with_string("cloudstack-endpoint", "https://cloud.example.com/client/api")
//!     .with_string("cloudstack-access", "AK")
//!     .with_string("cloudstack-secret", "SK");
//!
//! let info = driver.create(&opts, &ClusterInfo::default()).await?;
//! ```

pub mod api;
pub mod client;
pub mod driver;
pub mod error;
pub mod project;
pub mod settings;
pub mod virtual_machine;

#[cfg(test)]
mod test_support;

pub use api::{Nic, Project, VirtualMachine};
pub use client::CloudStackClient;
pub use driver::CloudStackDriver;
pub use error::{CloudStackError, Result};
pub use settings::{AcsSettings, CloudConfig, Settings};
pub use virtual_machine::DeployVirtualMachineParams;
