// Remote module - control plane API client
pub mod http;

pub use http::HttpClient;
