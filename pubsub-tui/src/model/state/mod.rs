//! Region states

mod activity;
mod input;
mod list;
mod publisher;
mod subscriber;
mod subscriptions;
mod topics;

pub use activity::{ActivityLog, LogEntry, LogLevel, MAX_LOG_ENTRIES};
pub use input::TextInput;
pub use list::{ListMode, RegionStatus};
pub use publisher::{LoadedTemplate, PublisherState};
pub use subscriber::{SubscriberState, MAX_RETAINED_MESSAGES};
pub use subscriptions::SubscriptionsState;
pub use topics::TopicsState;
