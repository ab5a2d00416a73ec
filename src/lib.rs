//! Portfolio health for the PMO: initiatives, tasks, company goals, and
//! meeting notes, with derived traffic-light status.
//!
//! The derivation core (`health`, `rollup`, `dependencies`) is pure; the
//! `store` routes all mutation through a single command path and persists
//! each touched collection as a whole-file JSON snapshot. `services`
//! assembles the read-side views the shell renders.

pub mod dependencies;
pub mod error;
pub mod export;
pub mod health;
pub mod rollup;
pub mod seed;
pub mod services;
pub mod state;
pub mod store;
pub mod types;
pub mod util;

pub use error::StoreError;
pub use health::{calculate_progress, derive_status, derive_status_at};
pub use rollup::goal_progress;
pub use store::persist::Workspace;
pub use store::{Applied, Command, PmoStore};
