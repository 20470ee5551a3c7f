// Collection sync engine and sweep orchestration

pub mod coordinator;
pub mod engine;
pub mod summary;

pub use coordinator::SweepCoordinator;
pub use engine::{page_count, CollectionSyncReport, SyncEngine, SyncOptions, MAX_CONCURRENCY};
pub use summary::{CollectionFailure, SweepSummary};
