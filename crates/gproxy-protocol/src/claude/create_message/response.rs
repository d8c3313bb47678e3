pub type CreateMessageResponse = super::types::BetaMessage;
