pub mod examples;
pub mod progress;
pub mod resources;
pub mod tasks;
pub mod translations;
pub mod units;
