//! `s3://bucket/key` arguments

use anyhow::{bail, Context, Result};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectPath {
    pub bucket: String,
    /// Key or prefix, empty for the bucket root
    pub key: String,
}

impl ObjectPath {
    pub fn parse(uri: &str) -> Result<Self> {
        let path = uri
            .strip_prefix("s3://")
            .with_context(|| format!("Invalid S3 URI: {}. Must start with s3://", uri))?;

        let (bucket, key) = path.split_once('/').unwrap_or((path, ""));
        if bucket.is_empty() {
            bail!("Invalid S3 URI: bucket name cannot be empty");
        }

        Ok(Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    /// Like [`parse`](Self::parse) but rejects bucket-only paths.
    pub fn parse_object(uri: &str) -> Result<Self> {
        let path = Self::parse(uri)?;
        if path.key.is_empty() || path.key.ends_with('/') {
            bail!("Object key required: {}", uri);
        }
        Ok(path)
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let path = ObjectPath::parse("s3://mybucket").unwrap();
        assert_eq!(path.bucket, "mybucket");
        assert_eq!(path.key, "");

        let path = ObjectPath::parse("s3://mybucket/path/to/key.json").unwrap();
        assert_eq!(path.bucket, "mybucket");
        assert_eq!(path.key, "path/to/key.json");
        assert_eq!(path.to_string(), "s3://mybucket/path/to/key.json");

        let path = ObjectPath::parse("s3://mybucket/logs/").unwrap();
        assert_eq!(path.key, "logs/");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(ObjectPath::parse("mybucket/key").is_err());
        assert!(ObjectPath::parse("s3://").is_err());
        assert!(ObjectPath::parse("s3:///key").is_err());
    }

    #[test]
    fn test_parse_object() {
        assert!(ObjectPath::parse_object("s3://bucket/key").is_ok());
        assert!(ObjectPath::parse_object("s3://bucket").is_err());
        assert!(ObjectPath::parse_object("s3://bucket/dir/").is_err());
    }
}
