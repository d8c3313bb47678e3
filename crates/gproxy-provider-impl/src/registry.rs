use std::sync::Arc;

use gproxy_provider_core::ProviderRegistry;

use crate::providers::{
    AIStudioProvider, AzureOpenAIProvider, BedrockProvider, ClaudeProvider, CohereProvider,
    CustomProvider, MistralProvider, OpenAIProvider, VertexExpressProvider, VertexProvider,
};

/// Registers every built-in dialect/vendor implementation into `registry`.
///
/// Nothing here decides which ones are reachable from the HTTP surface,
/// that is a routing concern.
pub fn register_builtin_providers(registry: &mut ProviderRegistry) {
    registry.register(Arc::new(OpenAIProvider::new()));
    registry.register(Arc::new(ClaudeProvider::new()));
    registry.register(Arc::new(AIStudioProvider::new()));
    registry.register(Arc::new(VertexExpressProvider::new()));
    registry.register(Arc::new(VertexProvider::new()));
    registry.register(Arc::new(BedrockProvider::new()));
    registry.register(Arc::new(CohereProvider::new()));
    registry.register(Arc::new(MistralProvider::new()));
    registry.register(Arc::new(AzureOpenAIProvider::new()));
    registry.register(Arc::new(CustomProvider::new()));
}
