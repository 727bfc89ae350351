//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - swgt Sync: Refreshes trending defenses and announces the result

mod sync;

pub use sync::{run_sync, spawn_sync_task};
