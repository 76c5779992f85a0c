//! Decoded request form: operation name, target path and parameters

use std::collections::HashMap;
use std::fmt;

/// WebHDFS operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Mkdirs,
    Create,
    Append,
    Open,
    ListStatus,
    GetFileStatus,
    Rename,
    SetPermission,
    SetOwner,
    CreateSymlink,
    Delete,
    /// Any other operation name; dispatched as a no-op
    Other(String),
}

impl Operation {
    /// Parse an operation name (case-insensitive)
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "mkdirs" => Operation::Mkdirs,
            "create" => Operation::Create,
            "append" => Operation::Append,
            "open" => Operation::Open,
            "liststatus" => Operation::ListStatus,
            "getfilestatus" => Operation::GetFileStatus,
            "rename" => Operation::Rename,
            "setpermission" => Operation::SetPermission,
            "setowner" => Operation::SetOwner,
            "createsymlink" => Operation::CreateSymlink,
            "delete" => Operation::Delete,
            other => Operation::Other(other.to_string()),
        }
    }

    /// Canonical lowercase name
    pub fn as_str(&self) -> &str {
        match self {
            Operation::Mkdirs => "mkdirs",
            Operation::Create => "create",
            Operation::Append => "append",
            Operation::Open => "open",
            Operation::ListStatus => "liststatus",
            Operation::GetFileStatus => "getfilestatus",
            Operation::Rename => "rename",
            Operation::SetPermission => "setpermission",
            Operation::SetOwner => "setowner",
            Operation::CreateSymlink => "createsymlink",
            Operation::Delete => "delete",
            Operation::Other(name) => name,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owner used when a request carries no `user.name`
pub const ANONYMOUS_USER: &str = "dr.who";

/// Operation parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(HashMap<String, String>);

impl Params {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a parameter
    pub fn insert(&mut self, key: &str, value: &str) {
        self.0.insert(key.to_string(), value.to_string());
    }

    /// Get a parameter value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Interpret a parameter as a flag. `None` when absent; `"false"`, `"0"`,
    /// `"no"` and the empty string are false, anything else is true.
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).map(|value| {
            !matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "false" | "0" | "no" | ""
            )
        })
    }

    /// Requesting user (`user.name`)
    pub fn user_name(&self) -> &str {
        self.get("user.name").unwrap_or(ANONYMOUS_USER)
    }

    pub fn destination(&self) -> Option<&str> {
        self.get("destination")
    }
}

impl FromIterator<(String, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<HashMap<String, String>> for Params {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

/// One decoded request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpRequest {
    pub path: String,
    pub operation: Operation,
    pub params: Params,
}

impl OpRequest {
    pub fn new(operation: Operation, path: &str, params: Params) -> Self {
        Self {
            path: path.to_string(),
            operation,
            params,
        }
    }
}
