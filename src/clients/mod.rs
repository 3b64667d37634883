pub mod anthropic_client;
pub mod batch_api;
pub mod jsonl;

pub use anthropic_client::AnthropicClient;
pub use batch_api::{BatchApi, BetaFeature, ResultStream};
