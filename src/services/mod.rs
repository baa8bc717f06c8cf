pub mod sync_service;

pub use sync_service::{branch_name, SyncOptions, SyncReport, SyncService, SyncState};
