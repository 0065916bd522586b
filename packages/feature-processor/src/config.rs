use std::net::SocketAddr;
use std::time::Duration;

use feature_core::DEFAULT_BUCKET;
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// 変換サービスの選択
#[derive(Clone, PartialEq, Eq)]
pub enum TransformationConfig {
    /// 入力パスをそのまま返す
    Passthrough,
    /// 外部 API を呼び出す
    Remote { endpoint: String, api_key: String },
}

/// 起動時に一度だけ読み込む設定
#[derive(Clone)]
pub struct Config {
    pub supabase_url: String,
    pub service_role_key: String,
    pub bucket: String,
    pub transformation: TransformationConfig,
    pub bind_addr: SocketAddr,
    pub http_timeout: Duration,
}

impl Config {
    /// 環境変数から Config を作成する。
    ///
    /// 必須の環境変数:
    /// - SUPABASE_URL
    /// - SUPABASE_SERVICE_ROLE_KEY
    ///
    /// TRANSFORMATION_API_KEY を設定した場合は TRANSFORMATION_API_URL も必須。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // 空文字は未設定として扱う
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let supabase_url = require("SUPABASE_URL")?;
        if !supabase_url.starts_with("http://") && !supabase_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                name: "SUPABASE_URL",
                reason: "must be an http(s) URL".to_string(),
            });
        }
        let service_role_key = require("SUPABASE_SERVICE_ROLE_KEY")?;

        let bucket = get("STORAGE_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string());

        let transformation = match get("TRANSFORMATION_API_KEY") {
            Some(api_key) => TransformationConfig::Remote {
                endpoint: require("TRANSFORMATION_API_URL")?,
                api_key,
            },
            None => TransformationConfig::Passthrough,
        };

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                name: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        let http_timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| ConfigError::Invalid {
                    name: "HTTP_TIMEOUT_SECS",
                    reason: format!("expected a positive number of seconds, got {raw:?}"),
                })?,
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(Self {
            supabase_url,
            service_role_key,
            bucket,
            transformation,
            bind_addr,
            http_timeout,
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let transformation = match &self.transformation {
            TransformationConfig::Passthrough => "passthrough".to_string(),
            TransformationConfig::Remote { endpoint, .. } => format!("remote ({endpoint})"),
        };
        f.debug_struct("Config")
            .field("supabase_url", &self.supabase_url)
            .field("bucket", &self.bucket)
            .field("transformation", &transformation)
            .field("bind_addr", &self.bind_addr)
            .field("http_timeout", &self.http_timeout)
            .finish_non_exhaustive()
    }
}
