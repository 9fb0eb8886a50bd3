//! Common error handling for the Zanzibar debugger front ends
//!
//! Provides the error enum returned by the command-line tool and the
//! process exit code each error maps to. The debugging core itself never
//! fails a run; these errors cover configuration, input and I/O.
//!
//! # Example
//!
//! ```rust
//! use error_common::{DebuggerError, Result};
//!
//! fn require_store(store_id: &str) -> Result<()> {
//!     if store_id.is_empty() {
//!         return Err(DebuggerError::ConfigError("store_id must not be empty".into()));
//!     }
//!     Ok(())
//! }
//!
//! let error = require_store("").unwrap_err();
//! assert_eq!(error.exit_code(), error_common::codes::system::CONFIG);
//! ```

pub mod codes;
pub mod types;

pub use types::*;
