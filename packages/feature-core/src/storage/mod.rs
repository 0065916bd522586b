use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::StorageError;
use crate::types::SignedAccessUrl;

pub mod client;

pub use client::StorageClient;

/// 画像を保持するオブジェクトストア
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// `path` のオブジェクトに対する期限付き読み取り URL を発行する
    async fn create_signed_url(
        &self,
        path: &str,
        ttl: Duration,
    ) -> Result<SignedAccessUrl, StorageError>;

    /// `path` にオブジェクトを書き込む
    async fn upload(&self, path: &str, data: Bytes, content_type: &str) -> Result<(), StorageError>;
}
