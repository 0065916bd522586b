use thiserror::Error;

/// 画像機能リクエスト処理の統合エラー型
///
/// 外部には常に 400 + メッセージとして返すが、ログのために種類を区別して保持する。
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// ストレージアクセスエラー
///
/// `Rejected` はストアが返したメッセージをそのまま保持する。
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("storage request failed: {0}")]
    Transport(String),

    #[error("unexpected storage response: {0}")]
    InvalidResponse(String),
}

/// 認証情報の取り出し・解決エラー
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing authorization header")]
    MissingHeader,

    #[error("malformed authorization header")]
    MalformedHeader,

    #[error("identity provider request failed: {0}")]
    Provider(String),
}

/// 変換サービスのエラー
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("transformation service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("transformation request failed: {0}")]
    Transport(String),

    #[error("invalid transformation response: {0}")]
    InvalidResponse(String),

    #[error("output image is too large: {size} bytes (max {max})")]
    TooLarge { size: u64, max: u64 },

    #[error("failed to store transformed image: {0}")]
    Upload(#[source] StorageError),
}

/// 利用ログ書き込みエラー
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("ledger request failed: {0}")]
    Transport(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_rejection_message_is_verbatim() {
        let err: FeatureError = StorageError::Rejected {
            status: 400,
            message: "Object not found".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Object not found");
    }

    #[test]
    fn test_upload_error_keeps_source() {
        let err = TransformError::Upload(StorageError::Transport("connection reset".to_string()));
        assert_eq!(
            err.to_string(),
            "failed to store transformed image: storage request failed: connection reset"
        );
    }
}
