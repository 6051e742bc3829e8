use crate::rng::PracticeRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyPhase {
    PickingAnchor,
    FillingWords,
    Assembled,
}

/// Per-session state: the RNG and the assembly phase live here and nowhere
/// else, so concurrent sessions cannot bleed into each other.
pub struct SessionContext {
    pub rng: PracticeRng,
    pub phase: AssemblyPhase,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            rng: PracticeRng::from_entropy(),
            phase: AssemblyPhase::PickingAnchor,
        }
    }

    /// Deterministic session for tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: PracticeRng::seeded(seed),
            phase: AssemblyPhase::PickingAnchor,
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}
