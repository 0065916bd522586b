use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use serde_json::json;

use crate::backend::{Backend, encode_path, error_message};
use crate::errors::StorageError;
use crate::storage::ObjectStore;
use crate::types::SignedAccessUrl;

/// Supabase Storage クライアント
///
/// 1 つのバケットに対して署名付き URL の発行とアップロードを行う
#[derive(Debug, Clone)]
pub struct StorageClient {
    backend: Backend,
    bucket: String,
}

#[derive(Debug, Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

impl StorageClient {
    pub fn new(backend: Backend, bucket: impl Into<String>) -> Self {
        Self {
            backend,
            bucket: bucket.into(),
        }
    }

    fn object_url(&self, prefix: &str, path: &str) -> String {
        self.backend.url(&format!(
            "/storage/v1/object/{prefix}{}/{}",
            urlencoding::encode(&self.bucket),
            encode_path(path)
        ))
    }

    /// 失敗レスポンスを StorageError に変換する
    async fn rejection(response: reqwest::Response) -> StorageError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        StorageError::Rejected {
            status: status.as_u16(),
            message: error_message(status, &body),
        }
    }
}

#[async_trait]
impl ObjectStore for StorageClient {
    async fn create_signed_url(
        &self,
        path: &str,
        ttl: Duration,
    ) -> Result<SignedAccessUrl, StorageError> {
        let url = self.object_url("sign/", path);

        let response = self
            .backend
            .authorized(self.backend.client().post(&url))
            .json(&json!({ "expiresIn": ttl.as_secs() }))
            .send()
            .await
            .map_err(|e| StorageError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let err = Self::rejection(response).await;
            tracing::warn!(path = %path, error = %err, "signed URL request rejected");
            return Err(err);
        }

        let body: SignResponse = response
            .json()
            .await
            .map_err(|e| StorageError::InvalidResponse(e.to_string()))?;

        Ok(SignedAccessUrl {
            url: format!("{}/storage/v1{}", self.backend.base_url(), body.signed_url),
            expires_in: ttl,
        })
    }

    async fn upload(
        &self,
        path: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let url = self.object_url("", path);
        let size = data.len();

        let response = self
            .backend
            .authorized(self.backend.client().post(&url))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(data)
            .send()
            .await
            .map_err(|e| StorageError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let err = Self::rejection(response).await;
            tracing::error!(path = %path, error = %err, "upload rejected");
            return Err(err);
        }

        tracing::debug!(path = %path, size, "object uploaded");
        Ok(())
    }
}
