//! Practice-scheduling core for language learning: FSRS-backed level
//! tracking, level-driven exercise generation and lesson assembly over a
//! sled-persisted content store.

pub mod config;
pub mod constants;
pub mod contracts;
pub mod engine;
pub mod error;
pub mod exercises;
pub mod lesson;
pub mod logging;
pub mod proposers;
pub mod rng;
pub mod scheduler;
pub mod store;
pub mod tasks;
pub mod types;

pub use config::Config;
pub use engine::PracticeEngine;
pub use error::CoreError;
pub use lesson::SessionContext;
pub use scheduler::ReviewOptions;
pub use store::Store;
pub use types::Rating;
