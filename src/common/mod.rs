pub mod backoff;
pub mod response;
pub mod retry;
