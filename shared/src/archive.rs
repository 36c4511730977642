//! Raw request/response archival in S3.
//!
//! Every inbound payload and the response it produced are stored as JSON so
//! interactions can be replayed later. Archival is best-effort: callers log
//! a failure and continue.

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Timestamp-plus-short-uuid stamp shared by a request/response pair.
pub fn request_stamp() -> String {
    let short_id: String = Uuid::new_v4().to_string().chars().take(8).collect();
    format!("{}_{}", Utc::now().format("%Y-%m-%d_%H-%M-%S"), short_id)
}

/// Writes request/response records to the event bucket.
pub struct RequestArchive {
    s3: S3Client,
    bucket: String,
}

impl RequestArchive {
    pub fn new(s3: S3Client, bucket: impl Into<String>) -> Self {
        Self {
            s3,
            bucket: bucket.into(),
        }
    }

    /// Store the raw inbound request; returns the object key.
    pub async fn store_request(&self, stamp: &str, payload: &Value) -> Result<String> {
        self.store(format!("requests/request_{}.json", stamp), payload)
            .await
    }

    /// Store the outbound response under the same stamp as its request.
    pub async fn store_response(&self, stamp: &str, payload: &Value) -> Result<String> {
        self.store(format!("responses/response_{}.json", stamp), payload)
            .await
    }

    async fn store(&self, key: String, payload: &Value) -> Result<String> {
        let body = serde_json::to_vec_pretty(payload)?;
        self.s3
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type("application/json")
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| Error::Aws(format!("Failed to archive {}: {}", key, e)))?;
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamp_pairs_timestamp_with_short_id() {
        let stamp = request_stamp();
        let (timestamp, id) = stamp.rsplit_once('_').expect("has separator");
        assert_eq!(id.len(), 8);
        assert!(timestamp.contains('-'));
    }
}
