//! Amazon S3 source.
//!
//! Bucket is the URL host, key is the URL path without its leading `/`.
//! Credentials, region and endpoint come from the standard AWS environment
//! (`AWS_REGION`, `AWS_ENDPOINT_URL`, profiles, instance roles, ...).

use aws_config::timeout::TimeoutConfig;
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::Client;
use bytes::Bytes;
use url::Url;

use super::{decoded_path, ConfigSource, FetchError, SourceError, SourceOptions};

const DEFAULT_REGION: &str = "us-east-1";

/// Fetches one object with GetObject on every fetch.
#[derive(Debug, Clone)]
pub struct S3Source {
    bucket: String,
    key: String,
    client: Client,
}

impl S3Source {
    /// Build the client once from the ambient AWS configuration.
    ///
    /// With `disable_tls` the client talks plain HTTP to the endpoint.
    pub async fn from_url(
        url: &Url,
        disable_tls: bool,
        options: &SourceOptions,
    ) -> Result<Self, SourceError> {
        let (bucket, key) = bucket_and_key(url)?;

        let shared = aws_config::defaults(BehaviorVersion::latest())
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(options.fetch_timeout)
                    .build(),
            )
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if disable_tls {
            let region = shared
                .region()
                .map(|r| r.as_ref().to_string())
                .unwrap_or_else(|| DEFAULT_REGION.to_string());
            builder = builder.endpoint_url(plaintext_endpoint(shared.endpoint_url(), &region));
        }

        Ok(Self {
            bucket,
            key,
            client: Client::from_conf(builder.build()),
        })
    }
}

impl ConfigSource for S3Source {
    async fn fetch(&self) -> Result<Bytes, FetchError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&self.key)
            .send()
            .await
            .map_err(|e| {
                tracing::debug!(
                    bucket = %self.bucket,
                    key = %self.key,
                    error = %DisplayErrorContext(&e),
                    "GetObject failed"
                );
                FetchError::S3(Box::new(e))
            })?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| FetchError::S3(Box::new(e)))?;

        Ok(body.into_bytes())
    }

    fn describe(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }
}

fn bucket_and_key(url: &Url) -> Result<(String, String), SourceError> {
    let bucket = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| SourceError::MissingBucket(url.to_string()))?;
    let path = decoded_path(url)?;
    let key = path.trim_start_matches('/');
    Ok((bucket.to_string(), key.to_string()))
}

/// Endpoint with its scheme forced to `http`.
fn plaintext_endpoint(configured: Option<&str>, region: &str) -> String {
    match configured {
        Some(endpoint) => match endpoint.strip_prefix("https://") {
            Some(rest) => format!("http://{rest}"),
            None => endpoint.to_string(),
        },
        None => format!("http://s3.{region}.amazonaws.com"),
    }
}
