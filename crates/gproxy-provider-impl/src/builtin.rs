//! Default provider rows seeded into storage on first boot.
//!
//! Every built-in dialect gets a disabled row with a default config so it
//! shows up in the admin UI immediately; operators flip `enabled` once
//! they've attached a credential.

use gproxy_provider_core::config::{
    AIStudioConfig, AzureOpenAIConfig, BedrockConfig, ClaudeConfig, CohereConfig, MistralConfig,
    OpenAIConfig, ProviderConfig, VertexConfig, VertexExpressConfig,
};

pub struct BuiltinProviderSeed {
    pub name: &'static str,
    pub config_json: serde_json::Value,
    pub enabled: bool,
}

fn seed(name: &'static str, config: ProviderConfig) -> BuiltinProviderSeed {
    BuiltinProviderSeed {
        name,
        config_json: serde_json::to_value(config).expect("provider config serializes"),
        enabled: false,
    }
}

pub fn builtin_provider_seeds() -> Vec<BuiltinProviderSeed> {
    vec![
        seed("openai", ProviderConfig::OpenAI(OpenAIConfig::default())),
        seed("claude", ProviderConfig::Claude(ClaudeConfig::default())),
        seed(
            "aistudio",
            ProviderConfig::AIStudio(AIStudioConfig::default()),
        ),
        seed(
            "vertexexpress",
            ProviderConfig::VertexExpress(VertexExpressConfig::default()),
        ),
        seed("vertex", ProviderConfig::Vertex(VertexConfig::default())),
        seed(
            "bedrock",
            ProviderConfig::Bedrock(BedrockConfig::default()),
        ),
        seed("cohere", ProviderConfig::Cohere(CohereConfig::default())),
        seed(
            "mistral",
            ProviderConfig::Mistral(MistralConfig::default()),
        ),
        seed(
            "azure_openai",
            ProviderConfig::AzureOpenAI(AzureOpenAIConfig::default()),
        ),
    ]
}
