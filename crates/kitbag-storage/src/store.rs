//! Buffered object operations over a backend

use crate::backend::{BucketItem, ByteChunks, ObjectBackend, ObjectStat};
use crate::config::{EnvNames, StorageConfig};
use crate::error::Result;
use crate::s3::S3Backend;
use bytes::{Bytes, BytesMut};
use futures::TryStreamExt;
use kitbag_env::{EnvGuard, EnvSource, Terminator};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetOptions {
    /// Parse the body as UTF-8 JSON
    pub parse_json: bool,
    /// Return fetch failures instead of `Ok(None)`
    pub throw_error: bool,
}

impl Default for GetOptions {
    fn default() -> Self {
        Self {
            parse_json: false,
            throw_error: true,
        }
    }
}

impl GetOptions {
    pub fn json() -> Self {
        Self {
            parse_json: true,
            ..Self::default()
        }
    }

    pub fn throw_error(mut self, throw_error: bool) -> Self {
        self.throw_error = throw_error;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListOptions {
    pub recursive: bool,
}

impl ListOptions {
    pub fn recursive() -> Self {
        Self { recursive: true }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectBody {
    Bytes(Bytes),
    Json(Value),
}

impl ObjectBody {
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            ObjectBody::Bytes(bytes) => Some(bytes),
            ObjectBody::Json(_) => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ObjectBody::Json(value) => Some(value),
            ObjectBody::Bytes(_) => None,
        }
    }
}

/// Upload payload. JSON values are serialized before upload.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadData {
    Bytes(Bytes),
    Text(String),
    Json(Value),
}

impl UploadData {
    fn into_body(self) -> Result<(Bytes, Option<&'static str>)> {
        match self {
            UploadData::Bytes(bytes) => Ok((bytes, None)),
            UploadData::Text(text) => Ok((Bytes::from(text), None)),
            // a bare JSON string is uploaded as its text
            UploadData::Json(Value::String(text)) => Ok((Bytes::from(text), None)),
            UploadData::Json(value @ (Value::Object(_) | Value::Array(_))) => Ok((
                Bytes::from(serde_json::to_vec_pretty(&value)?),
                Some(JSON_CONTENT_TYPE),
            )),
            UploadData::Json(value) => Ok((
                Bytes::from(serde_json::to_vec(&value)?),
                Some(JSON_CONTENT_TYPE),
            )),
        }
    }
}

impl From<Bytes> for UploadData {
    fn from(bytes: Bytes) -> Self {
        UploadData::Bytes(bytes)
    }
}

impl From<Vec<u8>> for UploadData {
    fn from(bytes: Vec<u8>) -> Self {
        UploadData::Bytes(Bytes::from(bytes))
    }
}

impl From<&[u8]> for UploadData {
    fn from(bytes: &[u8]) -> Self {
        UploadData::Bytes(Bytes::copy_from_slice(bytes))
    }
}

impl From<String> for UploadData {
    fn from(text: String) -> Self {
        UploadData::Text(text)
    }
}

impl From<&str> for UploadData {
    fn from(text: &str) -> Self {
        UploadData::Text(text.to_string())
    }
}

impl From<Value> for UploadData {
    fn from(value: Value) -> Self {
        UploadData::Json(value)
    }
}

async fn concat_chunks(mut chunks: ByteChunks) -> Result<Bytes> {
    let mut buffer = BytesMut::new();
    while let Some(chunk) = chunks.try_next().await? {
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer.freeze())
}

/// Object store handle. Cheap to clone; all clones share one backend.
#[derive(Clone)]
pub struct ObjectStore {
    backend: Arc<dyn ObjectBackend>,
}

impl ObjectStore {
    pub fn new(backend: impl ObjectBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub fn from_backend(backend: Arc<dyn ObjectBackend>) -> Self {
        Self { backend }
    }

    pub fn connect(config: &StorageConfig) -> Result<Self> {
        Ok(Self::new(S3Backend::connect(config)?))
    }

    /// Build an S3 store from the environment variables named in `names`.
    pub fn from_env<S: EnvSource, T: Terminator>(
        guard: &EnvGuard<S, T>,
        names: &EnvNames,
    ) -> Result<Self> {
        Self::connect(&StorageConfig::from_env(guard, names)?)
    }

    pub fn backend(&self) -> &Arc<dyn ObjectBackend> {
        &self.backend
    }

    /// Fetch a whole object. Failures opening the object give `Ok(None)`
    /// when `throw_error` is off; a broken stream or invalid JSON is always
    /// an error.
    pub async fn get_object(
        &self,
        bucket: &str,
        path: &str,
        options: GetOptions,
    ) -> Result<Option<ObjectBody>> {
        debug!("Fetching s3://{}/{}", bucket, path);

        let chunks = match self.backend.get(bucket, path).await {
            Ok(chunks) => chunks,
            Err(err) if !options.throw_error => {
                debug!("Fetch of s3://{}/{} failed: {}", bucket, path, err);
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        let bytes = concat_chunks(chunks).await?;
        if options.parse_json {
            Ok(Some(ObjectBody::Json(serde_json::from_slice(&bytes)?)))
        } else {
            Ok(Some(ObjectBody::Bytes(bytes)))
        }
    }

    /// Fetch and deserialize a JSON object.
    pub async fn get_json<T: DeserializeOwned>(&self, bucket: &str, path: &str) -> Result<T> {
        let bytes = concat_chunks(self.backend.get(bucket, path).await?).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Upload `data`. JSON objects and arrays are stored pretty-printed with
    /// a two-space indent.
    pub async fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        data: impl Into<UploadData>,
    ) -> Result<()> {
        let (body, content_type) = data.into().into_body()?;
        debug!("Uploading s3://{}/{} ({} bytes)", bucket, path, body.len());
        self.backend.put(bucket, path, body, content_type).await
    }

    /// Object metadata, or `None` when the stat call fails for any reason.
    pub async fn object_exists(&self, bucket: &str, path: &str) -> Option<ObjectStat> {
        match self.backend.stat(bucket, path).await {
            Ok(stat) => Some(stat),
            Err(err) => {
                debug!("Stat of s3://{}/{} failed: {}", bucket, path, err);
                None
            }
        }
    }

    /// Drain the listing under `prefix`, keeping backend order.
    pub async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        options: ListOptions,
    ) -> Result<Vec<BucketItem>> {
        self.backend
            .list(bucket, prefix, options.recursive)
            .try_collect()
            .await
    }

    pub async fn remove_object(&self, bucket: &str, path: &str) -> Result<()> {
        debug!("Removing s3://{}/{}", bucket, path);
        self.backend.delete(bucket, path).await
    }
}

impl std::fmt::Debug for ObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStore").finish_non_exhaustive()
    }
}
