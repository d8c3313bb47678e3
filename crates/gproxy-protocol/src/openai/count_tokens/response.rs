pub type InputTokenCountResponse = super::types::InputTokenCount;
