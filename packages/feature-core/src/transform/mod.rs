//! 変換サービス
//!
//! 実際の画像変換は外部 API が行う。ここでは呼び出し口だけを定義し、
//! 設定に応じて [`PassthroughTransformer`] か [`RemoteTransformer`] を使う。

use async_trait::async_trait;

use crate::errors::TransformError;
use crate::types::{SignedAccessUrl, TransformationRequest, TransformationResult};

pub mod passthrough;
pub mod remote;

pub use passthrough::PassthroughTransformer;
pub use remote::RemoteTransformer;

#[async_trait]
pub trait TransformationService: Send + Sync {
    /// `source` で読める入力画像に `request.feature_type` を適用し、出力先のパスを返す
    async fn transform(
        &self,
        request: &TransformationRequest,
        source: &SignedAccessUrl,
    ) -> Result<TransformationResult, TransformError>;
}
