pub mod batch;
pub mod input;
pub mod loaders;
pub mod request;

pub use batch::{
    BatchJob, Message, ProcessingStatus, RequestCounts, ResultOutcome, ResultRecord, Usage,
};
pub use input::{Question, SharedContext};
pub use loaders::{load_questions, load_shared_context};
pub use request::{CacheControl, ContentBlock, InputMessage, MessageParams, Metadata, Role, SubRequest};
