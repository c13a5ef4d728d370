//! Technical plumbing shared by providers

pub mod http;

pub use http::HttpClientBase;
