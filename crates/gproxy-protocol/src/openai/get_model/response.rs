pub type GetModelResponse = super::types::Model;
