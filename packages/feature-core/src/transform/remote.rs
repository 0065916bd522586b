use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use image::ImageFormat;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::backend::error_message;
use crate::constants::MAX_OUTPUT_SIZE;
use crate::errors::TransformError;
use crate::storage::ObjectStore;
use crate::transform::TransformationService;
use crate::types::{SignedAccessUrl, TransformationRequest, TransformationResult};

/// 外部の画像処理 API を呼び出す変換サービス
///
/// 1. 署名付き URL と feature を API に POST する
/// 2. レスポンスの `output_url` から生成画像をダウンロードする
/// 3. 入力と同じディレクトリの `<feature>/<uuid>.<ext>` にアップロードし、そのパスを返す
pub struct RemoteTransformer {
    client: Client,
    endpoint: String,
    api_key: String,
    store: Arc<dyn ObjectStore>,
    max_output_size: u64,
}

#[derive(Debug, Serialize)]
struct ProcessRequest<'a> {
    image_url: &'a str,
    feature: &'a str,
}

#[derive(Debug, Deserialize)]
struct ProcessResponse {
    output_url: String,
}

impl RemoteTransformer {
    pub fn new(
        client: Client,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            store,
            max_output_size: MAX_OUTPUT_SIZE,
        }
    }

    /// ダウンロードする出力画像の上限サイズを変更する
    pub fn with_max_output_size(mut self, max: u64) -> Self {
        self.max_output_size = max;
        self
    }

    async fn request_processing(
        &self,
        source: &SignedAccessUrl,
        feature_type: &str,
    ) -> Result<ProcessResponse, TransformError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&ProcessRequest {
                image_url: &source.url,
                feature: feature_type,
            })
            .send()
            .await
            .map_err(|e| TransformError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransformError::Api {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        response
            .json()
            .await
            .map_err(|e| TransformError::InvalidResponse(e.to_string()))
    }

    async fn download(&self, url: &str) -> Result<Bytes, TransformError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransformError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransformError::Api {
                status: status.as_u16(),
                message: format!("failed to download output image: {status}"),
            });
        }

        // Content-Length で事前にサイズを確認
        if let Some(size) = response.content_length()
            && size > self.max_output_size
        {
            tracing::warn!(size, max = self.max_output_size, "output image too large");
            return Err(TransformError::TooLarge {
                size,
                max: self.max_output_size,
            });
        }

        // Content-Length がない・偽っている場合に備え、読み込み中にも確認
        let mut data = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| TransformError::Transport(e.to_string()))?
        {
            let size = (data.len() + chunk.len()) as u64;
            if size > self.max_output_size {
                tracing::warn!(size, max = self.max_output_size, "output image too large");
                return Err(TransformError::TooLarge {
                    size,
                    max: self.max_output_size,
                });
            }
            data.extend_from_slice(&chunk);
        }

        Ok(Bytes::from(data))
    }
}

#[async_trait]
impl TransformationService for RemoteTransformer {
    async fn transform(
        &self,
        request: &TransformationRequest,
        source: &SignedAccessUrl,
    ) -> Result<TransformationResult, TransformError> {
        tracing::info!(
            image_path = %request.image_path,
            feature_type = %request.feature_type,
            "requesting transformation"
        );
        let processed = self.request_processing(source, &request.feature_type).await?;

        let data = self.download(&processed.output_url).await?;
        let format = detect_format(&data)?;

        let output_path = output_path(
            &request.image_path,
            &request.feature_type,
            extension(format),
        );
        tracing::info!(
            output_path = %output_path,
            size = data.len(),
            format = ?format,
            "storing transformed image"
        );

        self.store
            .upload(&output_path, data, format.to_mime_type())
            .await
            .map_err(TransformError::Upload)?;

        Ok(TransformationResult {
            output_image_path: output_path,
        })
    }
}

/// マジックナンバーから画像フォーマットを推測する
fn detect_format(data: &[u8]) -> Result<ImageFormat, TransformError> {
    if data.is_empty() {
        return Err(TransformError::InvalidResponse(
            "output image is empty".to_string(),
        ));
    }

    image::guess_format(data).map_err(|e| {
        TransformError::InvalidResponse(format!("unrecognized output image format: {e}"))
    })
}

fn extension(format: ImageFormat) -> &'static str {
    format.extensions_str().first().copied().unwrap_or("bin")
}

/// 入力と同じディレクトリの下に feature ごとの出力パスを作る
fn output_path(input_path: &str, feature_type: &str, extension: &str) -> String {
    let id = uuid::Uuid::new_v4();
    let feature = path_segment(feature_type);
    match input_path.rsplit_once('/') {
        Some((dir, _)) => format!("{dir}/{feature}/{id}.{extension}"),
        None => format!("{feature}/{id}.{extension}"),
    }
}

/// feature_type をパスの 1 セグメントとして使える形にする
/// 英数字・ハイフン・アンダースコア以外は `_` に置き換える
fn path_segment(feature_type: &str) -> String {
    feature_type
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
