pub type GetModelResponse = super::types::ModelInfo;
