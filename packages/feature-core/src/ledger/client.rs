use async_trait::async_trait;

use crate::backend::{Backend, error_message};
use crate::errors::LedgerError;
use crate::ledger::UsageLedger;
use crate::types::UsageLogEntry;

/// PostgREST 経由でテーブルに 1 行ずつ追記する
#[derive(Debug, Clone)]
pub struct RestLedger {
    backend: Backend,
    table: String,
}

impl RestLedger {
    pub fn new(backend: Backend, table: impl Into<String>) -> Self {
        Self {
            backend,
            table: table.into(),
        }
    }
}

#[async_trait]
impl UsageLedger for RestLedger {
    async fn insert(&self, entry: &UsageLogEntry) -> Result<(), LedgerError> {
        let url = self
            .backend
            .url(&format!("/rest/v1/{}", urlencoding::encode(&self.table)));

        let response = self
            .backend
            .authorized(self.backend.client().post(&url))
            .header("Prefer", "return=minimal")
            .json(entry)
            .send()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LedgerError::Rejected {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        Ok(())
    }
}
