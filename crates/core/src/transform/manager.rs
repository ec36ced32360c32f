//! Transformer manager for provider lookup and fallback.
//!
//! The `TransformerManager` is responsible for:
//! - Registering transformer providers by name
//! - Looking up providers for a refinement run
//! - Providing fallback logic when a provider is unavailable

use crate::transform::base::{TransformError, TransformRequest, Transformer};
use std::collections::HashMap;
use std::sync::Arc;

/// Manages all registered transformer providers.
///
/// The manager maintains a registry of providers and executes requests
/// with automatic fallback support when the requested provider reports
/// itself unavailable.
#[derive(Default)]
pub struct TransformerManager {
    providers: HashMap<String, Arc<dyn Transformer>>,
    fallback_provider_name: Option<String>,
}

impl TransformerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under the given name, replacing any existing
    /// registration.
    pub fn register(mut self, name: &str, provider: Arc<dyn Transformer>) -> Self {
        self.providers.insert(name.to_string(), provider);
        self
    }

    /// Set the fallback provider tried when the requested one is
    /// unavailable.
    pub fn with_fallback(mut self, provider_name: String) -> Self {
        self.fallback_provider_name = Some(provider_name);
        self
    }

    /// Get a provider by name.
    pub fn get_provider(&self, name: &str) -> Option<Arc<dyn Transformer>> {
        self.providers.get(name).cloned()
    }

    /// List all registered provider names.
    pub fn list_providers(&self) -> Vec<String> {
        self.providers.keys().cloned().collect()
    }

    /// Check if a provider with the given name is registered.
    pub fn has_provider(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Execute a transform request with the specified provider.
    ///
    /// # Behavior
    ///
    /// 1. Look up the requested provider
    /// 2. Check if it is available
    /// 3. If unavailable and a fallback is configured, try the fallback
    /// 4. Execute with the selected provider
    pub async fn transform(
        &self,
        provider_name: &str,
        request: &TransformRequest,
    ) -> Result<String, TransformError> {
        if let Some(provider) = self.get_provider(provider_name) {
            if provider.check_availability().await {
                return provider.transform(request).await;
            }

            // Provider exists but is not available - try fallback
            if let Some(ref fallback_name) = self.fallback_provider_name {
                if fallback_name != provider_name {
                    if let Some(fallback) = self.get_provider(fallback_name) {
                        if fallback.check_availability().await {
                            return fallback.transform(request).await;
                        }
                    }
                }
            }

            return Err(TransformError::NotAvailable(format!(
                "Provider '{}' is not available and no fallback succeeded",
                provider_name
            )));
        }

        Err(TransformError::NotAvailable(format!(
            "Provider '{}' not found in registry",
            provider_name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::adapters::MockTransformer;
    use rd_protocol::stage_models::Stage;

    fn test_request() -> TransformRequest {
        TransformRequest::new(
            "rewrite: the draft".to_string(),
            Stage::RemoveAiFlavor,
            "ch1".to_string(),
        )
    }

    #[test]
    fn test_manager_registration() {
        let manager = TransformerManager::new()
            .register("primary", Arc::new(MockTransformer::success()))
            .register("backup", Arc::new(MockTransformer::success()));

        assert!(manager.has_provider("primary"));
        assert!(manager.has_provider("backup"));
        assert!(!manager.has_provider("missing"));
        assert_eq!(manager.list_providers().len(), 2);
    }

    #[tokio::test]
    async fn test_manager_transform_success() {
        let manager =
            TransformerManager::new().register("mock", Arc::new(MockTransformer::success()));

        let result = manager.transform("mock", &test_request()).await.unwrap();
        assert!(!result.is_empty());
    }

    #[tokio::test]
    async fn test_manager_transform_not_found() {
        let manager = TransformerManager::new();

        let result = manager.transform("missing", &test_request()).await;
        assert!(matches!(result, Err(TransformError::NotAvailable(_))));
    }

    #[tokio::test]
    async fn test_manager_falls_back_when_primary_unavailable() {
        let manager = TransformerManager::new()
            .register("primary", Arc::new(MockTransformer::unavailable()))
            .register("backup", Arc::new(MockTransformer::success()))
            .with_fallback("backup".to_string());

        let result = manager.transform("primary", &test_request()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_manager_unavailable_without_fallback() {
        let manager =
            TransformerManager::new().register("primary", Arc::new(MockTransformer::unavailable()));

        let result = manager.transform("primary", &test_request()).await;
        assert!(matches!(result, Err(TransformError::NotAvailable(_))));
    }

    #[tokio::test]
    async fn test_manager_unavailable_fallback_does_not_loop() {
        // Fallback pointing at the unavailable provider itself must not
        // retry it.
        let manager = TransformerManager::new()
            .register("primary", Arc::new(MockTransformer::unavailable()))
            .with_fallback("primary".to_string());

        let result = manager.transform("primary", &test_request()).await;
        assert!(matches!(result, Err(TransformError::NotAvailable(_))));
    }
}
