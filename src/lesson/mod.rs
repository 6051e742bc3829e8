//! Lesson assembly: one anchor sentence, word exercises around it, packed
//! into a 5–20 exercise session.

pub mod assembler;
pub mod session;

pub use assembler::LessonAssembler;
pub use session::{AssemblyPhase, SessionContext};
