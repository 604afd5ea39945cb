pub mod activity;
pub mod publisher;
pub mod subscriber;
pub mod subscriptions;
pub mod topics;
