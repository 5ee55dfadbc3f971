pub mod client;
pub mod wire;

pub use client::{DEFAULT_API_BASE, OpenAiClientConfig, OpenAiVectorStoreClient};
