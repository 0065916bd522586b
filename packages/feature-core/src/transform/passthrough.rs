use async_trait::async_trait;

use crate::errors::TransformError;
use crate::transform::TransformationService;
use crate::types::{SignedAccessUrl, TransformationRequest, TransformationResult};

/// 入力パスをそのまま出力として返す変換サービス
///
/// 外部 API の認証情報が設定されていない環境や、テストで使う。ネットワークには出ない。
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughTransformer;

#[async_trait]
impl TransformationService for PassthroughTransformer {
    async fn transform(
        &self,
        request: &TransformationRequest,
        _source: &SignedAccessUrl,
    ) -> Result<TransformationResult, TransformError> {
        tracing::debug!(
            image_path = %request.image_path,
            feature_type = %request.feature_type,
            "passthrough transformation"
        );

        Ok(TransformationResult {
            output_image_path: request.image_path.clone(),
        })
    }
}
