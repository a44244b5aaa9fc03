//! Outbound HTTP plumbing shared by the release client and asset fetches.

mod client;

pub use client::{HttpClient, default_client};
