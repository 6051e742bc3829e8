//! Exercise generation: level-dependent dispatch, multiple-choice assembly,
//! cloze blanking and distractor selection.

pub mod choice;
pub mod cloze;
pub mod distractors;
pub mod factory;
pub mod text;

pub use factory::ExerciseFactory;
