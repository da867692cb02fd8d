pub mod client;
pub mod retry;

pub use client::HttpClient;
pub use retry::{fetch_with_retry, RetryPolicy};
