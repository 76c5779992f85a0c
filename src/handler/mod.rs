//! Operation handlers
//!
//! [`MemoryHandler`] executes decoded WebHDFS operations against a shared
//! [`PathStore`]. Each call returns exactly once: `Ok(())` for success or the
//! failure. Read operations write their body through a [`ResponseSink`]
//! before returning `Ok(())`; failing calls never write to the sink.
//!
//! Every precondition check and the mutation that follows it run under a
//! single acquisition of the store lock. Payload ingestion re-acquires the
//! lock per chunk.

mod ingest;
mod operation;
mod sink;

pub use ingest::{bounded_chunks, empty_payload, ingest, payload_from};
pub use operation::{OpRequest, Operation, Params, ANONYMOUS_USER};
pub use sink::{BufferedSink, ResponseSink};

use std::sync::Arc;

use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use bytes::Bytes;
use futures::Stream;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::WolfHdfsConfig;
use crate::error::{Error, Result};
use crate::store::{
    base_name, parent_path, Entry, EntryDefaults, FileStatusResponse, FileStatuses,
    FileStatusesResponse, PathStore,
};

/// In-memory WebHDFS operation handler
#[derive(Clone)]
pub struct MemoryHandler {
    store: Arc<Mutex<PathStore>>,
    defaults: Arc<EntryDefaults>,
}

impl Default for MemoryHandler {
    fn default() -> Self {
        Self::new(EntryDefaults::default())
    }
}

impl MemoryHandler {
    /// Create a handler over a fresh, empty store
    pub fn new(defaults: EntryDefaults) -> Self {
        Self::with_store(Arc::new(Mutex::new(PathStore::new())), defaults)
    }

    /// Create a handler over an existing store
    pub fn with_store(store: Arc<Mutex<PathStore>>, defaults: EntryDefaults) -> Self {
        Self {
            store,
            defaults: Arc::new(defaults),
        }
    }

    /// Create a handler using the configured entry defaults
    pub fn from_config(config: &WolfHdfsConfig) -> Self {
        Self::new(config.storage.entry_defaults())
    }

    /// Shared store handle
    pub fn store(&self) -> Arc<Mutex<PathStore>> {
        Arc::clone(&self.store)
    }

    /// Run one decoded request.
    ///
    /// A decoding failure handed in by the transport is returned unchanged
    /// without touching the store.
    pub async fn handle<P, K>(
        &self,
        decoded: Result<OpRequest>,
        payload: P,
        sink: &mut K,
    ) -> Result<()>
    where
        P: Stream<Item = Result<Bytes>> + Unpin + Send,
        K: ResponseSink + ?Sized,
    {
        let request = decoded?;
        let OpRequest { path, operation, params } = request;
        let path = path.as_str();

        let result = match &operation {
            Operation::Mkdirs => self.mkdirs(path, &params).await,
            Operation::Create => self.create(path, &params, payload).await,
            Operation::Append => self.append(path, &params, payload).await,
            Operation::Open => self.open(path, sink).await,
            Operation::ListStatus => self.list_status(path, sink).await,
            Operation::GetFileStatus => self.get_file_status(path, sink).await,
            Operation::Rename => self.rename(path, &params).await,
            Operation::SetPermission => self.set_permission(path, &params).await,
            Operation::SetOwner => self.set_owner(path, &params).await,
            Operation::CreateSymlink => self.create_symlink(path, &params).await,
            Operation::Delete => self.delete(path, &params).await,
            Operation::Other(name) => {
                debug!("Ignoring unsupported operation '{}' on {}", name, path);
                Ok(())
            }
        };

        if let Err(ref e) = result {
            warn!("{} {} failed: {}", operation, path, e);
        }
        result
    }

    /// Create a directory
    pub async fn mkdirs(&self, path: &str, params: &Params) -> Result<()> {
        let mut store = self.store.lock().await;
        if store.contains(path) {
            return Err(Error::AlreadyExists(path.to_string()));
        }

        store.put(path, Entry::directory(params.user_name(), base_name(path), &self.defaults));
        info!("Created directory {}", path);
        Ok(())
    }

    /// Create a file and stream the payload into it.
    ///
    /// `overwrite` defaults to true; with `overwrite=false` an existing path
    /// fails the call before any chunk is read.
    pub async fn create<P>(&self, path: &str, params: &Params, payload: P) -> Result<()>
    where
        P: Stream<Item = Result<Bytes>> + Unpin + Send,
    {
        let overwrite = params.flag("overwrite").unwrap_or(true);
        self.write(path, params, payload, overwrite).await
    }

    /// Append the payload to a file, creating it when absent
    pub async fn append<P>(&self, path: &str, params: &Params, payload: P) -> Result<()>
    where
        P: Stream<Item = Result<Bytes>> + Unpin + Send,
    {
        self.write(path, params, payload, true).await
    }

    async fn write<P>(&self, path: &str, params: &Params, payload: P, overwrite: bool) -> Result<()>
    where
        P: Stream<Item = Result<Bytes>> + Unpin + Send,
    {
        {
            let mut store = self.store.lock().await;
            let exists = store.contains(path);

            if exists && !overwrite {
                return Err(Error::AlreadyExists(path.to_string()));
            }

            if !exists {
                let owner = params.user_name();
                store.put(path, Entry::file(owner, base_name(path), &self.defaults));

                let parent = parent_path(path);
                if !parent.is_empty() && parent != "." && !store.contains(parent) {
                    store.put(parent, Entry::directory(owner, base_name(parent), &self.defaults));
                    info!("Created parent directory {}", parent);
                }
                info!("Created file {}", path);
            }
        }

        let length = ingest(&self.store, path, payload).await?;
        info!("Wrote {} ({} bytes)", path, length);
        Ok(())
    }

    /// Write a file's content to the sink
    pub async fn open<K>(&self, path: &str, sink: &mut K) -> Result<()>
    where
        K: ResponseSink + ?Sized,
    {
        let content = {
            let mut store = self.store.lock().await;
            let entry = store
                .get_mut(path)
                .ok_or_else(|| Error::NotFound(path.to_string()))?;
            entry.touch_accessed();
            Bytes::copy_from_slice(&entry.content)
        };

        debug!("Opened {} ({} bytes)", path, content.len());
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/octet-stream"));
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(content.len()));
        sink.write_headers(StatusCode::OK, headers).await?;
        sink.write_body_and_complete(content).await
    }

    /// List the direct children of `path`. Never fails for a missing path.
    pub async fn list_status<K>(&self, path: &str, sink: &mut K) -> Result<()>
    where
        K: ResponseSink + ?Sized,
    {
        let children: Vec<Entry> = {
            let store = self.store.lock().await;
            store.list_children(path).into_iter().cloned().collect()
        };

        debug!("Listed {} ({} entries)", path, children.len());
        let response = FileStatusesResponse {
            file_statuses: FileStatuses { file_status: children },
        };
        write_json(sink, &response).await
    }

    /// Describe a single entry
    pub async fn get_file_status<K>(&self, path: &str, sink: &mut K) -> Result<()>
    where
        K: ResponseSink + ?Sized,
    {
        let entry = {
            let store = self.store.lock().await;
            store
                .get(path)
                .cloned()
                .ok_or_else(|| Error::NotFound(path.to_string()))?
        };

        debug!("Status of {}", path);
        write_json(sink, &FileStatusResponse { file_status: entry }).await
    }

    /// Move an entry to `destination`
    pub async fn rename(&self, path: &str, params: &Params) -> Result<()> {
        let mut store = self.store.lock().await;
        let destination = check_link_target(&store, path, params)?;

        store.rename(path, destination);
        // A shared entry keeps its suffix so the other aliases are unaffected
        if store.link_count(destination) == 1 {
            if let Some(entry) = store.get_mut(destination) {
                entry.path_suffix = base_name(destination).to_string();
            }
        }

        info!("Renamed {} to {}", path, destination);
        Ok(())
    }

    /// Bind `destination` to the same entry as `path`
    pub async fn create_symlink(&self, path: &str, params: &Params) -> Result<()> {
        let mut store = self.store.lock().await;
        let destination = check_link_target(&store, path, params)?;

        store.alias(path, destination);
        info!("Linked {} to {}", destination, path);
        Ok(())
    }

    /// Set the permission string
    pub async fn set_permission(&self, path: &str, params: &Params) -> Result<()> {
        let mut store = self.store.lock().await;
        let entry = store
            .get_mut(path)
            .ok_or_else(|| Error::NotFound(path.to_string()))?;

        if let Some(permission) = params.get("permission") {
            entry.permission = permission.to_string();
        }
        entry.touch_modified();

        info!("Set permission of {} to {}", path, entry.permission);
        Ok(())
    }

    /// Set owner and group
    pub async fn set_owner(&self, path: &str, params: &Params) -> Result<()> {
        let mut store = self.store.lock().await;
        let entry = store
            .get_mut(path)
            .ok_or_else(|| Error::NotFound(path.to_string()))?;

        if let Some(owner) = params.get("owner") {
            entry.owner = owner.to_string();
        }
        if let Some(group) = params.get("group") {
            entry.group = group.to_string();
        }
        entry.touch_modified();

        info!("Set owner of {} to {}:{}", path, entry.owner, entry.group);
        Ok(())
    }

    /// Delete an entry.
    ///
    /// Recursive deletes remove every entry whose parent is `path` and fail
    /// only when nothing was removed and `path` itself is absent. A
    /// non-recursive delete of an absent path succeeds.
    pub async fn delete(&self, path: &str, params: &Params) -> Result<()> {
        let mut store = self.store.lock().await;

        if params.flag("recursive").unwrap_or(false) {
            let removed = store.remove_children(path);
            if removed == 0 && !store.contains(path) {
                return Err(Error::NotFound(path.to_string()));
            }
            info!("Deleted {} entries under {}", removed, path);
        } else if store.remove(path) {
            info!("Deleted {}", path);
        } else {
            debug!("Delete of absent {} ignored", path);
        }

        Ok(())
    }
}

/// Shared precondition for `rename` and `createsymlink`: the source exists,
/// a destination is given and is not already bound.
fn check_link_target<'a>(store: &PathStore, path: &str, params: &'a Params) -> Result<&'a str> {
    if !store.contains(path) {
        return Err(Error::NotFound(path.to_string()));
    }

    let destination = params
        .destination()
        .ok_or_else(|| Error::InvalidArgument("destination parameter is required".into()))?;

    if store.contains(destination) {
        return Err(Error::DestinationExists(destination.to_string()));
    }

    Ok(destination)
}

async fn write_json<K, T>(sink: &mut K, value: &T) -> Result<()>
where
    K: ResponseSink + ?Sized,
    T: Serialize,
{
    let body = Bytes::from(serde_json::to_vec(value)?);

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));
    sink.write_headers(StatusCode::OK, headers).await?;
    sink.write_body_and_complete(body).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> Params {
        Params::new().with("user.name", "webuser")
    }

    async fn run(handler: &MemoryHandler, op: Operation, path: &str, params: Params) -> Result<()> {
        let mut sink = BufferedSink::new();
        handler
            .handle(Ok(OpRequest::new(op, path, params)), empty_payload(), &mut sink)
            .await
    }

    async fn write(handler: &MemoryHandler, op: Operation, path: &str, params: Params, data: &'static str) -> Result<()> {
        let mut sink = BufferedSink::new();
        handler
            .handle(Ok(OpRequest::new(op, path, params)), payload_from([data]), &mut sink)
            .await
    }

    async fn read(handler: &MemoryHandler, path: &str) -> Result<Vec<u8>> {
        let mut sink = BufferedSink::new();
        handler
            .handle(Ok(OpRequest::new(Operation::Open, path, user())), empty_payload(), &mut sink)
            .await?;
        Ok(sink.body().map(|b| b.to_vec()).unwrap_or_default())
    }

    async fn status(handler: &MemoryHandler, path: &str) -> Result<serde_json::Value> {
        let mut sink = BufferedSink::new();
        handler.get_file_status(path, &mut sink).await?;
        Ok(serde_json::from_slice(sink.body().unwrap()).unwrap())
    }

    async fn listing(handler: &MemoryHandler, path: &str) -> Vec<Entry> {
        let mut sink = BufferedSink::new();
        handler.list_status(path, &mut sink).await.unwrap();
        let response: FileStatusesResponse = serde_json::from_slice(sink.body().unwrap()).unwrap();
        response.file_statuses.file_status
    }

    #[tokio::test]
    async fn test_missing_paths_not_found() {
        let handler = MemoryHandler::default();
        assert!(status(&handler, "/nope").await.unwrap_err().is_not_found());
        assert!(read(&handler, "/nope").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_passthrough_error_forwarded_untouched() {
        let handler = MemoryHandler::default();
        let mut sink = BufferedSink::new();
        let err = handler
            .handle(Err(Error::Passthrough("bad request".into())), empty_payload(), &mut sink)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Passthrough(ref m) if m == "bad request"));
        assert!(sink.status().is_none());
        assert!(handler.store().lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_mkdirs_twice_fails() {
        let handler = MemoryHandler::default();
        run(&handler, Operation::Mkdirs, "/x", user()).await.unwrap();
        let err = run(&handler, Operation::Mkdirs, "/x", Params::new().with("user.name", "other"))
            .await
            .unwrap_err();

        assert!(err.is_already_exists());
        let store = handler.store();
        let store = store.lock().await;
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("/x").unwrap().owner, "webuser");
    }

    #[tokio::test]
    async fn test_hello_world_scenario() {
        let handler = MemoryHandler::default();
        run(&handler, Operation::Mkdirs, "/x", user()).await.unwrap();
        let dir_before = handler.store().lock().await.get("/x").cloned().unwrap();

        write(&handler, Operation::Create, "/x/f", user(), "hello").await.unwrap();
        assert_eq!(handler.store().lock().await.get("/x").cloned().unwrap(), dir_before);
        assert_eq!(read(&handler, "/x/f").await.unwrap(), b"hello");

        write(&handler, Operation::Append, "/x/f", user(), " world").await.unwrap();
        assert_eq!(read(&handler, "/x/f").await.unwrap(), b"hello world");

        let status = status(&handler, "/x/f").await.unwrap();
        assert_eq!(status["FileStatus"]["length"], 11);
        assert_eq!(status["FileStatus"]["pathSuffix"], "f");
        assert_eq!(status["FileStatus"]["type"], "FILE");
    }

    #[tokio::test]
    async fn test_open_headers() {
        let handler = MemoryHandler::default();
        write(&handler, Operation::Create, "/f", user(), "random data").await.unwrap();

        let mut sink = BufferedSink::new();
        handler.open("/f", &mut sink).await.unwrap();
        assert_eq!(sink.status(), Some(StatusCode::OK));
        assert_eq!(sink.headers()[header::CONTENT_TYPE], "application/octet-stream");
        assert_eq!(sink.headers()[header::CONTENT_LENGTH], "11");
    }

    #[tokio::test]
    async fn test_create_materializes_parent() {
        let handler = MemoryHandler::default();
        write(&handler, Operation::Create, "/files/file-1", user(), "data").await.unwrap();

        let parent = status(&handler, "/files").await.unwrap();
        assert_eq!(parent["FileStatus"]["type"], "DIRECTORY");
        assert_eq!(parent["FileStatus"]["pathSuffix"], "files");
        assert_eq!(parent["FileStatus"]["owner"], "webuser");
    }

    #[tokio::test]
    async fn test_append_creates_missing_file() {
        let handler = MemoryHandler::default();
        write(&handler, Operation::Append, "/logs/today", user(), "line").await.unwrap();

        assert_eq!(read(&handler, "/logs/today").await.unwrap(), b"line");
        assert!(handler.store().lock().await.get("/logs").unwrap().is_dir());
    }

    #[tokio::test]
    async fn test_create_without_overwrite_keeps_content() {
        let handler = MemoryHandler::default();
        write(&handler, Operation::Create, "/f", user(), "original").await.unwrap();

        let err = write(&handler, Operation::Create, "/f", user().with("overwrite", "false"), "new")
            .await
            .unwrap_err();
        assert!(err.is_already_exists());
        assert_eq!(read(&handler, "/f").await.unwrap(), b"original");
    }

    #[tokio::test]
    async fn test_overwrite_flag_ignored_for_append() {
        let handler = MemoryHandler::default();
        write(&handler, Operation::Create, "/f", user(), "a").await.unwrap();
        write(&handler, Operation::Append, "/f", user().with("overwrite", "false"), "b")
            .await
            .unwrap();
        assert_eq!(read(&handler, "/f").await.unwrap(), b"ab");
    }

    #[tokio::test]
    async fn test_create_on_nonempty_file_concatenates() {
        let handler = MemoryHandler::default();
        write(&handler, Operation::Create, "/f", user(), "one").await.unwrap();
        write(&handler, Operation::Create, "/f", user(), "two").await.unwrap();
        assert_eq!(read(&handler, "/f").await.unwrap(), b"onetwo");
    }

    #[tokio::test]
    async fn test_multi_chunk_create() {
        let handler = MemoryHandler::default();
        let mut sink = BufferedSink::new();
        handler
            .handle(
                Ok(OpRequest::new(Operation::Create, "/big", user())),
                payload_from(["chunk-1,", "chunk-2,", "chunk-3"]),
                &mut sink,
            )
            .await
            .unwrap();

        assert!(sink.status().is_none());
        assert_eq!(read(&handler, "/big").await.unwrap(), b"chunk-1,chunk-2,chunk-3");
    }

    #[tokio::test]
    async fn test_liststatus_lists_direct_children() {
        let handler = MemoryHandler::default();
        run(&handler, Operation::Mkdirs, "/dir", user()).await.unwrap();
        write(&handler, Operation::Create, "/dir/a", user(), "1").await.unwrap();
        write(&handler, Operation::Create, "/dir/b", user(), "2").await.unwrap();
        write(&handler, Operation::Create, "/dir/b2/deep", user(), "3").await.unwrap();

        let mut names: Vec<String> = listing(&handler, "/dir")
            .await
            .into_iter()
            .filter(|e| !e.is_dir())
            .map(|e| e.path_suffix)
            .collect();
        names.sort();
        assert_eq!(names, vec!["a", "b"]);

        assert!(listing(&handler, "/dir/none").await.is_empty());
    }

    #[tokio::test]
    async fn test_rename() {
        let handler = MemoryHandler::default();
        write(&handler, Operation::Create, "/d/p", user(), "p").await.unwrap();
        write(&handler, Operation::Create, "/d/q", user(), "q").await.unwrap();

        let err = run(&handler, Operation::Rename, "/d/p", user().with("destination", "/d/q"))
            .await
            .unwrap_err();
        assert!(err.is_already_exists());
        assert_eq!(read(&handler, "/d/p").await.unwrap(), b"p");
        assert_eq!(read(&handler, "/d/q").await.unwrap(), b"q");

        run(&handler, Operation::Rename, "/d/p", user().with("destination", "/d/r"))
            .await
            .unwrap();
        assert!(status(&handler, "/d/p").await.unwrap_err().is_not_found());
        let moved = status(&handler, "/d/r").await.unwrap();
        assert_eq!(moved["FileStatus"]["pathSuffix"], "r");
        assert_eq!(read(&handler, "/d/r").await.unwrap(), b"p");
    }

    #[tokio::test]
    async fn test_rename_failures() {
        let handler = MemoryHandler::default();
        let err = run(&handler, Operation::Rename, "/missing", user().with("destination", "/x"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        write(&handler, Operation::Create, "/f", user(), "x").await.unwrap();
        let err = run(&handler, Operation::Rename, "/f", user()).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(handler.store().lock().await.contains("/f"));
    }

    #[tokio::test]
    async fn test_symlink_shares_entry() {
        let handler = MemoryHandler::default();
        write(&handler, Operation::Create, "/p", user(), "data").await.unwrap();
        run(&handler, Operation::CreateSymlink, "/p", user().with("destination", "/q"))
            .await
            .unwrap();

        run(&handler, Operation::SetOwner, "/q", Params::new().with("owner", "O").with("group", "G"))
            .await
            .unwrap();
        let original = status(&handler, "/p").await.unwrap();
        assert_eq!(original["FileStatus"]["owner"], "O");
        assert_eq!(original["FileStatus"]["group"], "G");

        // Deleting one alias leaves the other live
        run(&handler, Operation::Delete, "/p", Params::new()).await.unwrap();
        assert_eq!(read(&handler, "/q").await.unwrap(), b"data");
    }

    #[tokio::test]
    async fn test_rename_of_alias_keeps_shared_suffix() {
        let handler = MemoryHandler::default();
        write(&handler, Operation::Create, "/p", user(), "data").await.unwrap();
        run(&handler, Operation::CreateSymlink, "/p", user().with("destination", "/q"))
            .await
            .unwrap();

        run(&handler, Operation::Rename, "/q", user().with("destination", "/r"))
            .await
            .unwrap();
        let original = status(&handler, "/p").await.unwrap();
        assert_eq!(original["FileStatus"]["pathSuffix"], "p");
        assert_eq!(read(&handler, "/r").await.unwrap(), b"data");
    }

    #[tokio::test]
    async fn test_failed_payload_keeps_length_consistent() {
        let handler = MemoryHandler::default();
        let payload = futures::stream::iter(vec![
            Ok(Bytes::from_static(b"kept")),
            Err(Error::Payload("connection reset".into())),
        ]);

        let mut sink = BufferedSink::new();
        let err = handler
            .handle(Ok(OpRequest::new(Operation::Create, "/f", user())), payload, &mut sink)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Payload(_)));

        let body = read(&handler, "/f").await.unwrap();
        let reported = status(&handler, "/f").await.unwrap();
        assert_eq!(body, b"kept");
        assert_eq!(reported["FileStatus"]["length"], body.len() as u64);
    }

    #[tokio::test]
    async fn test_symlink_failures() {
        let handler = MemoryHandler::default();
        let err = run(&handler, Operation::CreateSymlink, "/nope", user().with("destination", "/q"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        write(&handler, Operation::Create, "/a", user(), "a").await.unwrap();
        write(&handler, Operation::Create, "/b", user(), "b").await.unwrap();
        let err = run(&handler, Operation::CreateSymlink, "/a", user().with("destination", "/b"))
            .await
            .unwrap_err();
        assert!(err.is_already_exists());
        assert!(!handler.store().lock().await.same_entry("/a", "/b"));
    }

    #[tokio::test]
    async fn test_set_permission_and_owner() {
        let handler = MemoryHandler::default();
        run(&handler, Operation::Mkdirs, "/d", user()).await.unwrap();

        run(&handler, Operation::SetPermission, "/d", Params::new().with("permission", "0777"))
            .await
            .unwrap();
        run(&handler, Operation::SetOwner, "/d", Params::new().with("owner", "alice"))
            .await
            .unwrap();

        let s = status(&handler, "/d").await.unwrap();
        assert_eq!(s["FileStatus"]["permission"], "0777");
        assert_eq!(s["FileStatus"]["owner"], "alice");
        assert_eq!(s["FileStatus"]["group"], "supergroup");

        let err = run(&handler, Operation::SetPermission, "/d/file-4", Params::new().with("permission", "0777"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        let err = run(&handler, Operation::SetOwner, "/d/file-4", Params::new().with("owner", "x"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete() {
        let handler = MemoryHandler::default();
        write(&handler, Operation::Create, "/dir/a", user(), "1").await.unwrap();
        write(&handler, Operation::Create, "/dir/b", user(), "2").await.unwrap();

        // Non-recursive delete of an absent path succeeds
        run(&handler, Operation::Delete, "/dir/c", Params::new()).await.unwrap();

        run(&handler, Operation::Delete, "/dir/a", Params::new()).await.unwrap();
        assert!(status(&handler, "/dir/a").await.unwrap_err().is_not_found());

        run(&handler, Operation::Delete, "/dir", Params::new().with("recursive", "true"))
            .await
            .unwrap();
        assert!(listing(&handler, "/dir").await.is_empty());
        // The directory itself survives a recursive delete of its children
        assert!(status(&handler, "/dir").await.is_ok());

        // Nothing left to remove but the path exists: still succeeds
        run(&handler, Operation::Delete, "/dir", Params::new().with("recursive", "true"))
            .await
            .unwrap();

        let err = run(&handler, Operation::Delete, "/ghost", Params::new().with("recursive", "true"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_unknown_operation_is_noop() {
        let handler = MemoryHandler::default();
        let mut sink = BufferedSink::new();
        handler
            .handle(
                Ok(OpRequest::new(Operation::parse("GETCONTENTSUMMARY"), "/x", Params::new())),
                empty_payload(),
                &mut sink,
            )
            .await
            .unwrap();

        assert!(sink.status().is_none());
        assert!(handler.store().lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_independent_instances() {
        let a = MemoryHandler::default();
        let b = MemoryHandler::default();
        run(&a, Operation::Mkdirs, "/only-a", user()).await.unwrap();
        assert!(status(&b, "/only-a").await.unwrap_err().is_not_found());

        let shared = a.clone();
        assert!(status(&shared, "/only-a").await.is_ok());
    }
}
