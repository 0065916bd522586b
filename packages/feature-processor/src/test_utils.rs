//! ハンドラーのテスト用に呼び出しを記録する協調オブジェクト

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use feature_core::{
    AuthError, Identity, IdentityProvider, LedgerError, ObjectStore, PassthroughTransformer,
    SignedAccessUrl, StorageError, TransformError, TransformationRequest, TransformationResult,
    TransformationService, UsageLedger, UsageLogEntry,
};

use crate::AppState;

#[derive(Default)]
pub struct FakeStore {
    signed: Mutex<Vec<(String, Duration)>>,
    reject_with: Option<String>,
}

impl FakeStore {
    pub fn rejecting(message: &str) -> Self {
        Self {
            reject_with: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn signed_paths(&self) -> Vec<String> {
        self.signed
            .lock()
            .unwrap()
            .iter()
            .map(|(path, _)| path.clone())
            .collect()
    }

    pub fn last_ttl(&self) -> Option<Duration> {
        self.signed.lock().unwrap().last().map(|(_, ttl)| *ttl)
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn create_signed_url(
        &self,
        path: &str,
        ttl: Duration,
    ) -> Result<SignedAccessUrl, StorageError> {
        self.signed.lock().unwrap().push((path.to_string(), ttl));

        if let Some(message) = &self.reject_with {
            return Err(StorageError::Rejected {
                status: 400,
                message: message.clone(),
            });
        }

        Ok(SignedAccessUrl {
            url: format!("https://store.test/object/sign/images/{path}?token=signed"),
            expires_in: ttl,
        })
    }

    async fn upload(
        &self,
        _path: &str,
        _data: Bytes,
        _content_type: &str,
    ) -> Result<(), StorageError> {
        Ok(())
    }
}

/// `token-<user>` 形式のトークンだけを解決する
#[derive(Default)]
pub struct FakeIdentity {
    calls: Mutex<usize>,
    unavailable: bool,
}

impl FakeIdentity {
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn get_user(&self, token: &str) -> Result<Option<Identity>, AuthError> {
        *self.calls.lock().unwrap() += 1;

        if self.unavailable {
            return Err(AuthError::Provider("connection refused".to_string()));
        }

        Ok(token.strip_prefix("token-").map(|user_id| Identity {
            user_id: user_id.to_string(),
        }))
    }
}

#[derive(Default)]
pub struct FakeLedger {
    entries: Mutex<Vec<UsageLogEntry>>,
    reject_with: Option<String>,
}

impl FakeLedger {
    pub fn rejecting(message: &str) -> Self {
        Self {
            reject_with: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn entries(&self) -> Vec<UsageLogEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl UsageLedger for FakeLedger {
    async fn insert(&self, entry: &UsageLogEntry) -> Result<(), LedgerError> {
        if let Some(message) = &self.reject_with {
            return Err(LedgerError::Rejected {
                status: 403,
                message: message.clone(),
            });
        }
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

pub struct FailingTransformer;

#[async_trait]
impl TransformationService for FailingTransformer {
    async fn transform(
        &self,
        _request: &TransformationRequest,
        _source: &SignedAccessUrl,
    ) -> Result<TransformationResult, TransformError> {
        Err(TransformError::Api {
            status: 503,
            message: "model overloaded".to_string(),
        })
    }
}

pub struct TestApp {
    pub store: Arc<FakeStore>,
    pub identity: Arc<FakeIdentity>,
    pub ledger: Arc<FakeLedger>,
    transformer: Arc<dyn TransformationService>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(FakeStore::default(), FakeIdentity::default(), FakeLedger::default())
    }

    pub fn with_store(store: FakeStore) -> Self {
        Self::build(store, FakeIdentity::default(), FakeLedger::default())
    }

    pub fn with_identity(identity: FakeIdentity) -> Self {
        Self::build(FakeStore::default(), identity, FakeLedger::default())
    }

    pub fn with_ledger(ledger: FakeLedger) -> Self {
        Self::build(FakeStore::default(), FakeIdentity::default(), ledger)
    }

    pub fn with_transformer(mut self, transformer: Arc<dyn TransformationService>) -> Self {
        self.transformer = transformer;
        self
    }

    fn build(store: FakeStore, identity: FakeIdentity, ledger: FakeLedger) -> Self {
        Self {
            store: Arc::new(store),
            identity: Arc::new(identity),
            ledger: Arc::new(ledger),
            transformer: Arc::new(PassthroughTransformer),
        }
    }

    pub fn state(&self) -> AppState {
        AppState {
            store: self.store.clone(),
            identity: self.identity.clone(),
            ledger: self.ledger.clone(),
            transformer: self.transformer.clone(),
        }
    }
}
