//! Read-side assembly for the consuming shell. Services never mutate the
//! store; they re-derive health from the task list on every call.

pub mod dashboard;
pub mod goals;
