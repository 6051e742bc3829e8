//! Persisted-task lifecycle: per-type generators and the coordinator that
//! keeps a unit's active tasks in step with its level.

pub mod coordinator;
pub mod generators;

pub use coordinator::TaskCoordinator;
pub use generators::TaskGenerator;
