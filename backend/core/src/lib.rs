pub mod error;
pub mod feed;
pub mod message;
pub mod record;
pub mod traits;

pub use error::{FetchError, SinkError};
pub use feed::{FeedLog, FeedSubscription};
pub use message::{Attachment, IntakeRequest};
pub use record::ContactRecord;
pub use traits::{LlmProvider, LlmRequest, LlmResponse, MediaFetcher, RecordSink};
