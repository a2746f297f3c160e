//! Cluster driver contract
//!
//! This crate defines the interface between an orchestration host and a
//! cluster driver: the typed option bag, flag descriptors, the records
//! passed through every lifecycle call, and the [`ClusterDriver`] trait.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │               Orchestration host                │
//! │          (acs-driver CLI, or a plugin host)      │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                acs-driver-core                  │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │        trait ClusterDriver { ... }        │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────────────┐    │
//! │  │ DriverOptions│  │ ClusterInfo / Caps   │    │
//! │  └──────────────┘  └──────────────────────┘    │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//!           ┌───────▼────────┐
//!           │   cloudstack   │
//!           │     driver     │
//!           └────────────────┘
//! ```

pub mod cluster;
pub mod driver;
pub mod error;
pub mod options;

// Re-exports
pub use cluster::{
    Capabilities, Capability, ClusterInfo, IngressCapabilities, K8sCapabilities,
    KubernetesVersion, LoadBalancerCapabilities, NodeCount,
};
pub use driver::ClusterDriver;
pub use error::{DriverError, Result};
pub use options::{DriverFlags, DriverOptions, Flag, FlagType, OptionValue};
