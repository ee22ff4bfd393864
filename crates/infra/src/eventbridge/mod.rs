//! EventBridge transport adapter

mod client;
mod factory;

pub use client::HttpEventBusClient;
pub use factory::HttpClientFactory;
