//! Relationship-based access control debugger
//!
//! Explains why (or whether) a subject holds a permission on an object by
//! reconstructing the relationship paths of an OpenFGA-style authorization
//! model:
//! - Recursive expansion of rewrite trees through the remote `expand` API
//! - Flattening of the expansion rounds into an ordered edge sequence
//! - Assembly of a directed permission graph
//! - Recovery of the chain linking the subject to the queried permission
//!
//! # Core Concepts
//!
//! - **Userset**: an `object#relation` id, e.g. `folder:2#viewer`
//! - **Rewrite tree**: the expansion service's answer for one userset
//!   (unions, computed usersets, tuple-to-userset and direct users)
//! - **Level**: the expansion round that discovered an edge
//! - **Path**: the records linking the subject back to the queried userset
//!
//! Failures never abort a run. An unreachable branch contributes nothing and
//! a subject without a provable chain yields the full graph in the neutral
//! colour instead of the highlighted path.
//!
//! # Example
//!
//! ```rust,no_run
//! use zanzibar_debug::{ClientConfig, ExpanderConfig, PermissionDebugger};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let debugger = PermissionDebugger::connect(
//!         ClientConfig::new("http://localhost:8080", "01HVB8GBE194NYZR9W3QP0VP05"),
//!         ExpanderConfig::default(),
//!     )?;
//!
//!     let explanation = debugger.explain("document:1", "viewer", "user:anne").await;
//!     if explanation.found() {
//!         println!("{}", explanation.graph.to_dot());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod expand;
pub mod graph;
pub mod models;
pub mod normalize;
pub mod resolve;

pub use client::{ExpandClient, HttpExpandClient, StaticExpandClient};
pub use config::*;
pub use engine::*;
pub use error::*;
pub use expand::TreeExpander;
pub use graph::*;
pub use models::*;
pub use normalize::{normalize, ROOT_LEVEL, SUBJECT_LEVEL};
pub use resolve::*;
