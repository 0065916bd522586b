use async_trait::async_trait;

use crate::errors::LedgerError;
use crate::types::UsageLogEntry;

pub mod client;

pub use client::RestLedger;

/// 追記専用の利用ログ
#[async_trait]
pub trait UsageLedger: Send + Sync {
    async fn insert(&self, entry: &UsageLogEntry) -> Result<(), LedgerError>;
}
