//! Supabase 互換バックエンド（storage / auth / rest）への共通接続情報

use reqwest::{Client, RequestBuilder};

/// バックエンドのエンドポイントと service role キー
///
/// `reqwest::Client` は接続プールを持つため、起動時に 1 つ作って使い回す。
#[derive(Clone)]
pub struct Backend {
    client: Client,
    base_url: String,
    service_key: String,
}

impl Backend {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        service_key: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// service role キーで認証したリクエスト
    pub(crate) fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    /// ユーザーのトークンで認証したリクエスト（apikey は service role）
    pub(crate) fn as_user(&self, builder: RequestBuilder, token: &str) -> RequestBuilder {
        builder.header("apikey", &self.service_key).bearer_auth(token)
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// パスの各セグメントをパーセントエンコードする
pub(crate) fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// エラーレスポンス本文からメッセージを取り出す
///
/// `message` / `error_description` / `error` / `msg` の順で探し、
/// どれもなければ本文そのもの、本文が空ならステータスを返す。
pub(crate) fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for field in ["message", "error_description", "error", "msg"] {
            if let Some(msg) = value.get(field).and_then(|v| v.as_str())
                && !msg.is_empty()
            {
                return msg.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("unexpected status: {status}")
    } else {
        trimmed.to_string()
    }
}
