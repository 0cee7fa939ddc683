//! Feed snapshot store plus the adapter contract feeds are fetched
//! through.

pub mod adapter;
pub mod asof;
pub mod envelope;
pub mod store;

pub use adapter::{FeedAdapter, HttpFeedAdapter, StaticFeedAdapter};
pub use asof::resolve_as_of;
pub use envelope::FeedEnvelope;
pub use store::SnapshotStore;
