use crate::constants::MAX_FEATURE_LEN;
use crate::errors::FeatureError;

/// feature_type を検証する
///
/// 値の意味は変換サービスに委ねるため、空文字と長さだけを確認する。
pub fn validate_feature_type(feature_type: &str) -> Result<(), FeatureError> {
    if feature_type.trim().is_empty() {
        return Err(FeatureError::Validation("feature_type is empty".to_string()));
    }

    if feature_type.len() > MAX_FEATURE_LEN {
        return Err(FeatureError::Validation(format!(
            "feature_type is too long (max {MAX_FEATURE_LEN})"
        )));
    }

    Ok(())
}
