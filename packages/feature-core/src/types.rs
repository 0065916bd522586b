use std::time::Duration;

use serde::{Deserialize, Serialize};

/// 画像機能リクエスト
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransformationRequest {
    pub image_path: String,
    pub feature_type: String,
}

/// 期限付きの読み取り用 URL。永続化しない。
#[derive(Clone, PartialEq, Eq)]
pub struct SignedAccessUrl {
    pub url: String,
    pub expires_in: Duration,
}

// URL 自体がアクセス権を持つため Debug には出さない
impl std::fmt::Debug for SignedAccessUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedAccessUrl")
            .field("url", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Bearer トークンから解決されたユーザー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformationResult {
    pub output_image_path: String,
}

/// 利用ログの 1 行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageLogEntry {
    pub user_id: String,
    pub feature_type: String,
    pub input_image_path: String,
    pub output_image_path: String,
}

impl UsageLogEntry {
    pub fn new(
        identity: &Identity,
        request: &TransformationRequest,
        result: &TransformationResult,
    ) -> Self {
        Self {
            user_id: identity.user_id.clone(),
            feature_type: request.feature_type.clone(),
            input_image_path: request.image_path.clone(),
            output_image_path: result.output_image_path.clone(),
        }
    }
}
