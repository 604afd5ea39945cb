//! Messaging-service client implementations

mod common;
pub mod memory;
pub mod rest;

pub use common::create_http_client;
pub use memory::InMemoryPubSub;
pub use rest::{Endpoint, RestPubSub};
