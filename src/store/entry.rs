//! Entry model
//!
//! One [`Entry`] describes a file or directory node. Its JSON form is the
//! WebHDFS `FileStatus` object; the accumulated payload is never serialized.

use serde::{Deserialize, Serialize};

/// Kind of filesystem node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryType {
    File,
    Directory,
}

/// Attribute values given to newly created entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDefaults {
    pub group: String,
    pub permission: String,
    pub replication: u32,
    pub block_size: u64,
    /// Placeholder length reported for directories
    pub directory_length: u64,
}

impl Default for EntryDefaults {
    fn default() -> Self {
        Self {
            group: "supergroup".to_string(),
            permission: "644".to_string(),
            replication: 1,
            block_size: 0,
            directory_length: 24930,
        }
    }
}

/// A file or directory node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Last access, epoch milliseconds
    pub access_time: i64,

    pub block_size: u64,

    pub group: String,

    /// Byte count for files, fixed placeholder for directories
    pub length: u64,

    /// Last modification, epoch milliseconds
    pub modification_time: i64,

    pub owner: String,

    /// Final segment of the path this entry was last bound under
    pub path_suffix: String,

    pub permission: String,

    #[serde(rename = "replication")]
    pub replication_factor: u32,

    #[serde(rename = "type")]
    pub entry_type: EntryType,

    /// Accumulated payload (files only)
    #[serde(skip)]
    pub content: Vec<u8>,
}

/// Current wall clock time as epoch milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

impl Entry {
    /// Create a directory entry
    pub fn directory(owner: &str, path_suffix: &str, defaults: &EntryDefaults) -> Self {
        Self::new(EntryType::Directory, owner, path_suffix, defaults.directory_length, defaults)
    }

    /// Create an empty file entry
    pub fn file(owner: &str, path_suffix: &str, defaults: &EntryDefaults) -> Self {
        Self::new(EntryType::File, owner, path_suffix, 0, defaults)
    }

    fn new(
        entry_type: EntryType,
        owner: &str,
        path_suffix: &str,
        length: u64,
        defaults: &EntryDefaults,
    ) -> Self {
        let now = now_millis();
        Self {
            access_time: now,
            block_size: defaults.block_size,
            group: defaults.group.clone(),
            length,
            modification_time: now,
            owner: owner.to_string(),
            path_suffix: path_suffix.to_string(),
            permission: defaults.permission.clone(),
            replication_factor: defaults.replication,
            entry_type,
            content: Vec::new(),
        }
    }

    /// Check if this is a directory
    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Directory
    }

    /// Apply one payload chunk: replace the content when it is currently
    /// empty, otherwise concatenate.
    pub fn ingest_chunk(&mut self, chunk: &[u8]) {
        if self.content.is_empty() {
            self.content = chunk.to_vec();
        } else {
            self.content.extend_from_slice(chunk);
        }
    }

    /// Recompute derived attributes once the payload stream has ended
    pub fn finish_write(&mut self, path_suffix: &str) {
        self.path_suffix = path_suffix.to_string();
        self.length = self.content.len() as u64;
        self.modification_time = now_millis();
    }

    /// Record a metadata or content change
    pub fn touch_modified(&mut self) {
        self.modification_time = now_millis();
    }

    /// Record a read
    pub fn touch_accessed(&mut self) {
        self.access_time = now_millis();
    }
}

/// `{"FileStatus": <entry>}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileStatusResponse {
    pub file_status: Entry,
}

/// `{"FileStatuses": {"FileStatus": [...]}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileStatusesResponse {
    pub file_statuses: FileStatuses,
}

/// Inner list of a `liststatus` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileStatuses {
    pub file_status: Vec<Entry>,
}
