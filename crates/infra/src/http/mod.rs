//! Single-attempt HTTP client shared by the REST adapters

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
