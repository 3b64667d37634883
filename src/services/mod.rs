pub mod batch_poller;
pub mod batch_submitter;
pub mod cache_warmer;
pub mod digest;
pub mod request_builder;
pub mod result_sink;

pub use batch_poller::{BatchPoller, PollOutcome};
pub use batch_submitter::BatchSubmitter;
pub use cache_warmer::CacheWarmer;
pub use digest::content_digest;
pub use request_builder::RequestBuilder;
pub use result_sink::{ResultSink, SinkReport};
