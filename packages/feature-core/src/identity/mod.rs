use async_trait::async_trait;

use crate::errors::AuthError;
use crate::types::Identity;

pub mod client;

pub use client::AuthClient;

/// Bearer トークンをユーザーに解決する
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// トークンが有効でなければ `Ok(None)` を返す
    async fn get_user(&self, token: &str) -> Result<Option<Identity>, AuthError>;
}
