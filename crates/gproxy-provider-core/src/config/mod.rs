mod dispatch;
mod model_table;
mod provider_config;

pub use dispatch::{DispatchRule, DispatchTable, OperationKind};
pub use model_table::{ModelRecord, ModelTable};
pub use provider_config::{
    AIStudioConfig, AzureOpenAIConfig, BedrockConfig, ClaudeConfig, CohereConfig, CountTokensMode,
    CustomProviderConfig, MistralConfig, OpenAIConfig, ProviderConfig, VertexConfig,
    VertexExpressConfig,
};
