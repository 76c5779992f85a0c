//! Streaming ingestion for `create` and `append`
//!
//! Chunks are applied one at a time in arrival order, each under the store
//! lock, so a slow payload never holds the store between chunks. The write
//! completes only after the source reports end-of-stream.

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::store::{base_name, PathStore};

/// Consume `payload` into the entry at `path`; returns the final length
pub async fn ingest<S>(store: &Mutex<PathStore>, path: &str, mut payload: S) -> Result<u64>
where
    S: Stream<Item = Result<Bytes>> + Unpin,
{
    let mut chunks = 0usize;

    while let Some(chunk) = payload.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                // Chunks already applied are kept; length must describe them
                let mut store = store.lock().await;
                if let Some(entry) = store.get_mut(path) {
                    entry.length = entry.content.len() as u64;
                    entry.touch_modified();
                }
                warn!("Payload for {} failed after {} chunks: {}", path, chunks, e);
                return Err(e);
            }
        };
        let mut store = store.lock().await;
        let entry = store
            .get_mut(path)
            .ok_or_else(|| Error::NotFound(path.to_string()))?;
        entry.ingest_chunk(&chunk);
        chunks += 1;
        debug!("Ingested chunk {} ({} bytes) into {}", chunks, chunk.len(), path);
    }

    let mut store = store.lock().await;
    let entry = store
        .get_mut(path)
        .ok_or_else(|| Error::NotFound(path.to_string()))?;
    entry.finish_write(base_name(path));

    debug!("Payload for {} complete: {} chunks, {} bytes", path, chunks, entry.length);
    Ok(entry.length)
}

/// Split every chunk of `payload` into pieces of at most `max` bytes,
/// preserving order
pub fn bounded_chunks<S>(payload: S, max: usize) -> impl Stream<Item = Result<Bytes>>
where
    S: Stream<Item = Result<Bytes>>,
{
    let max = max.max(1);
    payload.flat_map(move |item| {
        let pieces: Vec<Result<Bytes>> = match item {
            Ok(bytes) => split_bytes(bytes, max).into_iter().map(Ok).collect(),
            Err(e) => vec![Err(e)],
        };
        stream::iter(pieces)
    })
}

fn split_bytes(mut bytes: Bytes, max: usize) -> Vec<Bytes> {
    let mut pieces = Vec::with_capacity(bytes.len() / max + 1);
    while bytes.len() > max {
        pieces.push(bytes.split_to(max));
    }
    if !bytes.is_empty() {
        pieces.push(bytes);
    }
    pieces
}

/// Payload source with no chunks
pub fn empty_payload() -> stream::Empty<Result<Bytes>> {
    stream::empty()
}

/// Payload source yielding the given chunks in order
pub fn payload_from<I, B>(chunks: I) -> stream::Iter<std::vec::IntoIter<Result<Bytes>>>
where
    I: IntoIterator<Item = B>,
    B: Into<Bytes>,
{
    let chunks: Vec<Result<Bytes>> = chunks.into_iter().map(|c| Ok(c.into())).collect();
    stream::iter(chunks)
}
