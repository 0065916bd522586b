mod types;

pub use types::{AuthError, FeatureError, LedgerError, StorageError, TransformError};
