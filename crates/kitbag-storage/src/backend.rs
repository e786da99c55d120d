//! Storage backends

use crate::error::{Result, StorageError};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::stream::{self, BoxStream, StreamExt};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Object body as it arrives from the backend
pub type ByteChunks = BoxStream<'static, Result<Bytes>>;

/// Listing entries in backend order
pub type ItemStream = BoxStream<'static, Result<BucketItem>>;

/// Object metadata returned by a stat call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectStat {
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(rename = "metaData")]
    pub metadata: BTreeMap<String, String>,
}

/// One listing entry: an object, or a common prefix when listing with a
/// delimiter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BucketItem {
    Object {
        name: String,
        size: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        etag: Option<String>,
        #[serde(rename = "lastModified", skip_serializing_if = "Option::is_none")]
        last_modified: Option<DateTime<Utc>>,
    },
    Prefix {
        prefix: String,
    },
}

impl BucketItem {
    /// Object key or prefix
    pub fn name(&self) -> &str {
        match self {
            BucketItem::Object { name, .. } => name,
            BucketItem::Prefix { prefix } => prefix,
        }
    }

    pub fn is_prefix(&self) -> bool {
        matches!(self, BucketItem::Prefix { .. })
    }

    pub fn size(&self) -> u64 {
        match self {
            BucketItem::Object { size, .. } => *size,
            BucketItem::Prefix { .. } => 0,
        }
    }
}

#[async_trait]
pub trait ObjectBackend: Send + Sync {
    /// Open an object for reading
    async fn get(&self, bucket: &str, key: &str) -> Result<ByteChunks>;

    /// Store an object, replacing any existing one
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> Result<()>;

    async fn stat(&self, bucket: &str, key: &str) -> Result<ObjectStat>;

    async fn delete(&self, bucket: &str, key: &str) -> Result<()>;

    /// Objects under `prefix`. Without `recursive`, keys below the next `/`
    /// are folded into prefix entries.
    fn list(&self, bucket: &str, prefix: &str, recursive: bool) -> ItemStream;
}

#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    content_type: Option<String>,
    last_modified: DateTime<Utc>,
    etag: String,
}

/// In-process backend. Reads are delivered in chunks of `chunk_size` bytes.
pub struct MemoryBackend {
    objects: RwLock<BTreeMap<(String, String), StoredObject>>,
    generation: RwLock<u64>,
    chunk_size: usize,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

    pub fn new() -> Self {
        Self::with_chunk_size(Self::DEFAULT_CHUNK_SIZE)
    }

    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            objects: RwLock::new(BTreeMap::new()),
            generation: RwLock::new(0),
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    fn lookup(&self, bucket: &str, key: &str) -> Result<StoredObject> {
        self.objects
            .read()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| StorageError::not_found(bucket, key))
    }
}

#[async_trait]
impl ObjectBackend for MemoryBackend {
    async fn get(&self, bucket: &str, key: &str) -> Result<ByteChunks> {
        let object = self.lookup(bucket, key)?;

        let chunks: Vec<Result<Bytes>> = (0..object.data.len())
            .step_by(self.chunk_size)
            .map(|start| {
                let end = (start + self.chunk_size).min(object.data.len());
                Ok(object.data.slice(start..end))
            })
            .collect();

        Ok(stream::iter(chunks).boxed())
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> Result<()> {
        let etag = {
            let mut generation = self.generation.write();
            *generation += 1;
            format!("\"{:016x}\"", *generation)
        };

        self.objects.write().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                data,
                content_type: content_type.map(str::to_string),
                last_modified: Utc::now(),
                etag,
            },
        );
        Ok(())
    }

    async fn stat(&self, bucket: &str, key: &str) -> Result<ObjectStat> {
        let object = self.lookup(bucket, key)?;
        Ok(ObjectStat {
            size: object.data.len() as u64,
            etag: Some(object.etag),
            last_modified: Some(object.last_modified),
            content_type: object.content_type,
            metadata: BTreeMap::new(),
        })
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<()> {
        self.objects
            .write()
            .remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }

    fn list(&self, bucket: &str, prefix: &str, recursive: bool) -> ItemStream {
        let objects = self.objects.read();
        let mut items = Vec::new();
        let mut prefixes = BTreeSet::new();

        let matching = objects
            .iter()
            .filter(|((b, key), _)| b == bucket && key.starts_with(prefix));

        for ((_, key), object) in matching {
            let rest = &key[prefix.len()..];
            match rest.find('/') {
                Some(idx) if !recursive => {
                    prefixes.insert(format!("{}{}", prefix, &rest[..=idx]));
                }
                _ => items.push(BucketItem::Object {
                    name: key.clone(),
                    size: object.data.len() as u64,
                    etag: Some(object.etag.clone()),
                    last_modified: Some(object.last_modified),
                }),
            }
        }

        items.extend(prefixes.into_iter().map(|prefix| BucketItem::Prefix { prefix }));
        stream::iter(items.into_iter().map(Ok)).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;

    async fn seeded() -> MemoryBackend {
        let backend = MemoryBackend::with_chunk_size(4);
        for key in ["docs/a.json", "docs/b.json", "docs/sub/c.json", "other.txt"] {
            backend
                .put("bucket", key, Bytes::from_static(b"0123456789"), None)
                .await
                .unwrap();
        }
        backend
    }

    #[tokio::test]
    async fn test_get_chunks() {
        let backend = seeded().await;
        let chunks: Vec<Bytes> = backend
            .get("bucket", "other.txt")
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks.concat(), b"0123456789");
    }

    #[tokio::test]
    async fn test_get_missing() {
        let backend = seeded().await;
        let err = backend.get("bucket", "nope").await.err().unwrap();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_stat() {
        let backend = seeded().await;
        backend
            .put("bucket", "data.json", Bytes::from_static(b"{}"), Some("application/json"))
            .await
            .unwrap();

        let stat = backend.stat("bucket", "data.json").await.unwrap();
        assert_eq!(stat.size, 2);
        assert_eq!(stat.content_type.as_deref(), Some("application/json"));
        assert!(stat.etag.is_some());
        assert!(backend.stat("other-bucket", "data.json").await.is_err());
    }

    #[tokio::test]
    async fn test_list_with_delimiter() {
        let backend = seeded().await;
        let items: Vec<BucketItem> = backend.list("bucket", "docs/", false).try_collect().await.unwrap();
        let names: Vec<&str> = items.iter().map(BucketItem::name).collect();

        assert_eq!(names, vec!["docs/a.json", "docs/b.json", "docs/sub/"]);
        assert!(items[2].is_prefix());
        assert_eq!(items[0].size(), 10);
    }

    #[tokio::test]
    async fn test_list_recursive() {
        let backend = seeded().await;
        let items: Vec<BucketItem> = backend.list("bucket", "docs/", true).try_collect().await.unwrap();
        let names: Vec<&str> = items.iter().map(BucketItem::name).collect();

        assert_eq!(names, vec!["docs/a.json", "docs/b.json", "docs/sub/c.json"]);
    }

    #[tokio::test]
    async fn test_delete() {
        let backend = seeded().await;
        assert_eq!(backend.len(), 4);
        backend.delete("bucket", "other.txt").await.unwrap();
        assert_eq!(backend.len(), 3);
    }

    #[test]
    fn test_item_serialization() {
        let item = BucketItem::Object {
            name: "a.json".to_string(),
            size: 3,
            etag: None,
            last_modified: None,
        };
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            serde_json::json!({ "name": "a.json", "size": 3 })
        );

        let prefix = BucketItem::Prefix {
            prefix: "docs/".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&prefix).unwrap(),
            serde_json::json!({ "prefix": "docs/" })
        );
    }
}
