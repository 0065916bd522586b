use std::time::Duration;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::AppState;
use crate::auth::bearer_token;
use feature_core::{
    AuthError, FeatureError, LedgerError, SIGNED_URL_TTL_SECS, StorageError, TransformError,
    TransformationRequest, UsageLogEntry, validate_feature_type, validate_image_path,
};

const ALLOW_ORIGIN: &str = "*";
const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// すべてのレスポンスに付与する CORS ヘッダー
fn cors_headers() -> [(HeaderName, &'static str); 2] {
    [
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN),
        (header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS),
    ]
}

#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub output_path: String,
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// CORS プリフライト。本文は読まず、協調オブジェクトにも触れない。
pub async fn preflight() -> impl IntoResponse {
    (StatusCode::OK, cors_headers())
}

pub async fn process_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let request = parse_request(&body)?;

    tracing::info!(
        image_path = %request.image_path,
        feature_type = %request.feature_type,
        "issuing signed URL"
    );
    let signed = state
        .store
        .create_signed_url(&request.image_path, Duration::from_secs(SIGNED_URL_TTL_SECS))
        .await?;

    let result = state.transformer.transform(&request, &signed).await?;

    let token = bearer_token(&headers)?;
    let identity = match state.identity.get_user(token).await {
        Ok(identity) => identity,
        Err(err) => {
            // 利用ログが残らないだけなので、リクエスト自体は失敗させない
            tracing::warn!(error = %err, "identity lookup failed, skipping usage log");
            None
        }
    };

    match identity {
        Some(identity) => {
            let entry = UsageLogEntry::new(&identity, &request, &result);
            state.ledger.insert(&entry).await?;
            tracing::info!(
                user_id = %entry.user_id,
                feature_type = %entry.feature_type,
                output_path = %entry.output_image_path,
                "usage recorded"
            );
        }
        None => {
            tracing::info!(
                output_path = %result.output_image_path,
                "anonymous request, usage not recorded"
            );
        }
    }

    Ok((
        StatusCode::OK,
        cors_headers(),
        Json(ProcessResponse {
            output_path: result.output_image_path,
        }),
    )
        .into_response())
}

/// JSON 本文を解析し、入力値を検証する
fn parse_request(body: &[u8]) -> Result<TransformationRequest, FeatureError> {
    let request: TransformationRequest = serde_json::from_slice(body)
        .map_err(|e| FeatureError::Validation(format!("invalid request body: {e}")))?;

    validate_image_path(&request.image_path)?;
    validate_feature_type(&request.feature_type)?;

    Ok(request)
}

/// 外部には常に 400 + メッセージで返す。内部ではエラーの種類ごとにログを分ける。
#[derive(Debug)]
pub struct AppError(FeatureError);

impl From<FeatureError> for AppError {
    fn from(err: FeatureError) -> Self {
        Self(err)
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        Self(err.into())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        Self(err.into())
    }
}

impl From<TransformError> for AppError {
    fn from(err: TransformError) -> Self {
        Self(err.into())
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self.0 {
            FeatureError::Validation(msg) => {
                tracing::warn!(error = %msg, "malformed request");
            }
            FeatureError::Storage(StorageError::Rejected { status, message }) => {
                tracing::warn!(
                    status = %status,
                    error = %message,
                    "storage rejected signed URL request"
                );
            }
            FeatureError::Storage(err) => {
                tracing::error!(error = %err, "storage unavailable");
            }
            FeatureError::Auth(err) => {
                tracing::warn!(error = %err, "authorization header rejected");
            }
            FeatureError::Transform(err) => {
                tracing::error!(error = %err, "transformation failed");
            }
            FeatureError::Ledger(err) => {
                tracing::error!(error = %err, "usage log write failed");
            }
        }

        let body = serde_json::json!({ "error": self.0.to_string() });
        (StatusCode::BAD_REQUEST, cors_headers(), Json(body)).into_response()
    }
}
