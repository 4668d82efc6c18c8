pub mod messages;
pub mod snapshot;
