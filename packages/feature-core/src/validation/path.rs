use crate::constants::MAX_PATH_LEN;
use crate::errors::FeatureError;

/// ストレージ上の画像パスを検証する
/// パストラバーサルと制御文字を拒否する
pub fn validate_image_path(path: &str) -> Result<(), FeatureError> {
    if path.is_empty() {
        return Err(FeatureError::Validation("image_path is empty".to_string()));
    }

    if path.len() > MAX_PATH_LEN {
        return Err(FeatureError::Validation(format!(
            "image_path is too long (max {MAX_PATH_LEN})"
        )));
    }

    if path.starts_with('/')
        || path.contains("//")
        || path.contains('\\')
        || path.split('/').any(|segment| segment == "..")
    {
        return Err(FeatureError::Validation(
            "path traversal detected in image_path".to_string(),
        ));
    }

    if path.chars().any(char::is_control) {
        return Err(FeatureError::Validation(
            "invalid characters in image_path".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_paths() {
        assert!(validate_image_path("photo.png").is_ok());
        assert!(validate_image_path("u1/photo.png").is_ok());
        assert!(validate_image_path("u1/2024 trip/IMG 0001.jpeg").is_ok());
        assert!(validate_image_path("u1/..hidden.png").is_ok());
    }

    #[test]
    fn test_empty_path() {
        assert!(validate_image_path("").is_err());
    }

    #[test]
    fn test_path_traversal() {
        assert!(validate_image_path("../etc/passwd").is_err());
        assert!(validate_image_path("u1/../u2/photo.png").is_err());
        assert!(validate_image_path("/u1/photo.png").is_err());
        assert!(validate_image_path("u1//photo.png").is_err());
        assert!(validate_image_path("u1\\photo.png").is_err());
    }

    #[test]
    fn test_too_long() {
        let path = "a".repeat(MAX_PATH_LEN + 1);
        assert!(validate_image_path(&path).is_err());
    }

    #[test]
    fn test_control_characters() {
        assert!(validate_image_path("u1/photo\n.png").is_err());
    }
}
