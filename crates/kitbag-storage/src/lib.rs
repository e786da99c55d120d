//! Object storage helpers for Kitbag
//!
//! [`ObjectStore`] wraps an [`ObjectBackend`] with buffered reads, JSON
//! uploads, existence checks and drained listings. [`S3Backend`] talks to any
//! S3-compatible service; [`MemoryBackend`] keeps objects in process.

pub mod backend;
pub mod config;
pub mod error;
pub mod s3;
pub mod store;

pub use backend::{BucketItem, ByteChunks, ItemStream, MemoryBackend, ObjectBackend, ObjectStat};
pub use config::{EnvNames, StorageConfig};
pub use error::{Result, StorageError};
pub use s3::S3Backend;
pub use store::{GetOptions, ListOptions, ObjectBody, ObjectStore, UploadData};
