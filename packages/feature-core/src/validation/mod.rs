pub mod feature;
pub mod path;

pub use feature::validate_feature_type;
pub use path::validate_image_path;
