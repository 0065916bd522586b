pub mod backend;
pub mod constants;
pub mod errors;
pub mod identity;
pub mod ledger;
pub mod storage;
pub mod transform;
pub mod types;
pub mod validation;

// 公開API
pub use backend::Backend;
pub use constants::{
    DEFAULT_BUCKET, MAX_FEATURE_LEN, MAX_OUTPUT_SIZE, MAX_PATH_LEN, SIGNED_URL_TTL_SECS,
    USAGE_LOG_TABLE,
};
pub use errors::{AuthError, FeatureError, LedgerError, StorageError, TransformError};
pub use identity::{AuthClient, IdentityProvider};
pub use ledger::{RestLedger, UsageLedger};
pub use storage::{ObjectStore, StorageClient};
pub use transform::{PassthroughTransformer, RemoteTransformer, TransformationService};
pub use types::{
    Identity, SignedAccessUrl, TransformationRequest, TransformationResult, UsageLogEntry,
};
pub use validation::{validate_feature_type, validate_image_path};
