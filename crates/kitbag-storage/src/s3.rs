//! S3-compatible backend

use crate::backend::{BucketItem, ByteChunks, ItemStream, ObjectBackend, ObjectStat};
use crate::config::StorageConfig;
use crate::error::{Result, StorageError};
use async_trait::async_trait;
use aws_config::Region;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Builder as S3ConfigBuilder;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::{ByteStream, DateTime as AwsDateTime};
use aws_sdk_s3::Client;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::BTreeMap;
use tracing::debug;

pub struct S3Backend {
    client: Client,
}

impl S3Backend {
    pub fn connect(config: &StorageConfig) -> Result<Self> {
        config.validate()?;

        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "kitbag-storage",
        );

        let s3_config = S3ConfigBuilder::new()
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(config.endpoint_url())
            .force_path_style(config.path_style)
            .build();

        debug!("S3 client configured for {}", config.endpoint_url());
        Ok(Self::from_client(Client::from_conf(s3_config)))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// The underlying SDK client, for calls not covered by the store.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

fn backend_error(err: impl std::error::Error) -> StorageError {
    StorageError::Backend(DisplayErrorContext(err).to_string())
}

fn to_chrono(date: &AwsDateTime) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(date.secs(), date.subsec_nanos())
}

#[async_trait]
impl ObjectBackend for S3Backend {
    async fn get(&self, bucket: &str, key: &str) -> Result<ByteChunks> {
        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| match err.as_service_error() {
                Some(e) if e.is_no_such_key() => StorageError::not_found(bucket, key),
                _ => backend_error(err),
            })?;

        let chunks = stream::unfold(resp.body, |mut body: ByteStream| async move {
            match body.next().await {
                Some(Ok(chunk)) => Some((Ok(chunk), body)),
                Some(Err(err)) => Some((Err(StorageError::Stream(err.to_string())), body)),
                None => None,
            }
        });

        Ok(chunks.boxed())
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> Result<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data))
            .set_content_type(content_type.map(str::to_string))
            .send()
            .await
            .map_err(backend_error)?;

        Ok(())
    }

    async fn stat(&self, bucket: &str, key: &str) -> Result<ObjectStat> {
        let resp = self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| match err.as_service_error() {
                Some(e) if e.is_not_found() => StorageError::not_found(bucket, key),
                _ => backend_error(err),
            })?;

        let metadata: BTreeMap<String, String> = resp
            .metadata()
            .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();

        Ok(ObjectStat {
            size: resp.content_length().unwrap_or(0).max(0) as u64,
            etag: resp.e_tag().map(str::to_string),
            last_modified: resp.last_modified().and_then(to_chrono),
            content_type: resp.content_type().map(str::to_string),
            metadata,
        })
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(backend_error)?;

        Ok(())
    }

    fn list(&self, bucket: &str, prefix: &str, recursive: bool) -> ItemStream {
        let client = self.client.clone();
        let bucket = bucket.to_string();
        let prefix = prefix.to_string();
        let delimiter = if recursive { None } else { Some("/".to_string()) };

        // Outer None: done. Inner None: first page.
        let pages = stream::try_unfold(Some(None::<String>), move |state| {
            let client = client.clone();
            let bucket = bucket.clone();
            let prefix = prefix.clone();
            let delimiter = delimiter.clone();

            async move {
                let Some(continuation_token) = state else {
                    return Ok::<_, StorageError>(None);
                };

                debug!("Listing s3://{}/{}", bucket, prefix);
                let resp = client
                    .list_objects_v2()
                    .bucket(&bucket)
                    .prefix(&prefix)
                    .set_delimiter(delimiter)
                    .set_continuation_token(continuation_token)
                    .send()
                    .await
                    .map_err(backend_error)?;

                let mut items: Vec<Result<BucketItem>> = resp
                    .contents()
                    .iter()
                    .map(|obj| {
                        Ok(BucketItem::Object {
                            name: obj.key().unwrap_or_default().to_string(),
                            size: obj.size().unwrap_or(0).max(0) as u64,
                            etag: obj.e_tag().map(str::to_string),
                            last_modified: obj.last_modified().and_then(to_chrono),
                        })
                    })
                    .collect();

                items.extend(resp.common_prefixes().iter().filter_map(|p| {
                    p.prefix().map(|prefix| {
                        Ok(BucketItem::Prefix {
                            prefix: prefix.to_string(),
                        })
                    })
                }));

                let next = if resp.is_truncated().unwrap_or(false) {
                    resp.next_continuation_token().map(|t| Some(t.to_string()))
                } else {
                    None
                };

                Ok(Some((stream::iter(items), next)))
            }
        });

        pages.try_flatten().boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_validates() {
        let config = StorageConfig::new("", "a", "b");
        assert!(matches!(
            S3Backend::connect(&config),
            Err(StorageError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_connect() {
        let config = StorageConfig::new("localhost:9000", "a", "b").use_ssl(false);
        assert!(S3Backend::connect(&config).is_ok());
    }

    #[test]
    fn test_to_chrono() {
        let date = AwsDateTime::from_secs(1_710_504_000);
        assert_eq!(
            to_chrono(&date).unwrap().to_rfc3339(),
            "2024-03-15T12:00:00+00:00"
        );
    }
}
