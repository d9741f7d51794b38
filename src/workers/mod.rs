pub mod completion;
pub mod eviction;
pub mod poller;
