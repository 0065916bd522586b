use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::backend::{Backend, error_message};
use crate::errors::AuthError;
use crate::identity::IdentityProvider;
use crate::types::Identity;

/// Supabase Auth クライアント
#[derive(Debug, Clone)]
pub struct AuthClient {
    backend: Backend,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: String,
}

impl AuthClient {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl IdentityProvider for AuthClient {
    async fn get_user(&self, token: &str) -> Result<Option<Identity>, AuthError> {
        let url = self.backend.url("/auth/v1/user");

        let response = self
            .backend
            .as_user(self.backend.client().get(&url), token)
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                tracing::debug!(status = %response.status(), "token did not resolve to a user");
                return Ok(None);
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                return Err(AuthError::Provider(error_message(status, &body)));
            }
        }

        let user: UserResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Provider(format!("invalid user response: {e}")))?;

        Ok(Some(Identity { user_id: user.id }))
    }
}
