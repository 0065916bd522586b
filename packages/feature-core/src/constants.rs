/// 署名付き URL の有効期限（秒）
pub const SIGNED_URL_TTL_SECS: u64 = 60;

/// 画像パスの最大長（バイト）
pub const MAX_PATH_LEN: usize = 1024;

/// feature_type の最大長（バイト）
pub const MAX_FEATURE_LEN: usize = 256;

/// デフォルトのストレージバケット
pub const DEFAULT_BUCKET: &str = "images";

/// 利用ログを記録するテーブル
pub const USAGE_LOG_TABLE: &str = "usage_logs";

/// 変換結果としてダウンロードする画像の最大サイズ（50MB）
pub const MAX_OUTPUT_SIZE: u64 = 50 * 1024 * 1024;
