//! WolfHDFS - In-memory WebHDFS emulation
//!
//! Lets HDFS clients and proxies be exercised without a real distributed
//! filesystem. Requests are decoded into an operation, a path and a set of
//! parameters; the handler mutates a volatile path-indexed store or writes
//! a WebHDFS response body.
//!
//! # Architecture
//!
//! - [`store`]: entry model and the path-to-entry store
//! - [`handler`]: per-operation precondition checks, mutations and
//!   streaming payload ingestion
//! - [`api`]: the WebHDFS HTTP transport
//!
//! Nothing is persisted: the store lives as long as the handler that owns it.

pub mod config;
pub mod error;
pub mod store;
pub mod handler;
pub mod api;

pub use config::WolfHdfsConfig;
pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::WolfHdfsConfig;
    pub use crate::error::{Error, Result};
    pub use crate::handler::{BufferedSink, MemoryHandler, OpRequest, Operation, Params, ResponseSink};
    pub use crate::store::{Entry, EntryType, PathStore};
}
