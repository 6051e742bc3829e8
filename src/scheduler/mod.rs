pub mod level_model;
pub mod srs;

pub use level_model::{LevelModel, ReviewOptions};
pub use srs::Srs;
