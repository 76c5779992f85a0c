//! Store Module
//!
//! The path-indexed, volatile entry store backing every WebHDFS operation.

mod entry;
mod path_store;

pub use entry::{
    now_millis, Entry, EntryDefaults, EntryType, FileStatusResponse, FileStatuses,
    FileStatusesResponse,
};
pub use path_store::{base_name, parent_path, NodeId, PathStore};
