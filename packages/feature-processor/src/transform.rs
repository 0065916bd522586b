use std::sync::Arc;

use feature_core::{ObjectStore, PassthroughTransformer, RemoteTransformer, TransformationService};
use reqwest::Client;

use crate::config::TransformationConfig;

/// 設定に応じて変換サービスを選ぶ
pub fn build_transformer(
    config: &TransformationConfig,
    client: Client,
    store: Arc<dyn ObjectStore>,
) -> Arc<dyn TransformationService> {
    match config {
        TransformationConfig::Passthrough => {
            tracing::warn!("TRANSFORMATION_API_KEY is not set, using passthrough transformation");
            Arc::new(PassthroughTransformer)
        }
        TransformationConfig::Remote { endpoint, api_key } => {
            tracing::info!(endpoint = %endpoint, "using remote transformation service");
            Arc::new(RemoteTransformer::new(
                client,
                endpoint.clone(),
                api_key.clone(),
                store,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeStore;
    use feature_core::{SignedAccessUrl, TransformationRequest};
    use std::time::Duration;

    #[tokio::test]
    async fn test_passthrough_selected_without_api_key() {
        let transformer = build_transformer(
            &TransformationConfig::Passthrough,
            Client::new(),
            Arc::new(FakeStore::default()),
        );

        let request = TransformationRequest {
            image_path: "u1/photo.png".to_string(),
            feature_type: "enhance".to_string(),
        };
        let source = SignedAccessUrl {
            url: "https://store.test/object/sign/images/u1/photo.png".to_string(),
            expires_in: Duration::from_secs(60),
        };

        let result = transformer.transform(&request, &source).await.unwrap();
        assert_eq!(result.output_image_path, "u1/photo.png");
    }
}
