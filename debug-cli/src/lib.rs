//! Command-line front end for the Zanzibar permission debugger
//!
//! Wires settings, logging and output formats around
//! [`zanzibar_debug::PermissionDebugger`].
//!
//! # Example Usage
//!
//! ```bash
//! # Explain against a live store
//! zanzibar-debug --store-id 01HVB8GBE194NYZR9W3QP0VP05 \
//!     explain --object document:1 --relation viewer --user user:anne
//!
//! # Graphviz output
//! zanzibar-debug explain --object document:1 --relation viewer --user user:anne --format dot | dot -Tsvg
//!
//! # Replay captured trees offline
//! zanzibar-debug --fixture trees.json records --object document:1 --relation viewer --user user:anne
//! ```
//!
//! # Configuration
//!
//! ```yaml
//! # zanzibar-debug.yaml
//! api_url: http://localhost:8080
//! store_id: 01HVB8GBE194NYZR9W3QP0VP05
//! request_timeout_secs: 30
//! dedupe_calls: true
//! max_depth: 16
//! deadline_secs: 60
//! ```
//!
//! Every key can also be set as `ZANZIBAR_DEBUG_<KEY>` in the environment
//! or a `.env` file.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod output;
pub mod settings;

pub use cli::*;
pub use commands::run;
pub use settings::*;
