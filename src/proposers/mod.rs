//! Candidate proposers: independent heuristics for "what should the learner
//! work on next", composed into an ordered chain.

pub mod by_examples;
pub mod by_immersion;
pub mod by_resource_recency;
pub mod by_seen_due;

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::CoreError;
use crate::rng::PracticeRng;
use crate::types::{PracticeUnit, UnitKey};

pub use by_examples::ProposerByExamples;
pub use by_immersion::ProposerByImmersion;
pub use by_resource_recency::ProposerByResourceRecency;
pub use by_seen_due::ProposerBySeenDue;

#[async_trait]
pub trait Proposer: Send + Sync {
    /// Stable name, used as the component field in failure logs.
    fn name(&self) -> &'static str;

    async fn propose(
        &self,
        target: usize,
        rng: &mut PracticeRng,
    ) -> Result<Vec<PracticeUnit>, CoreError>;
}

/// Runs proposers in order and merges their contributions. A failing proposer
/// is logged and treated as empty; it never aborts the chain.
pub struct ProposerChain {
    proposers: Vec<Box<dyn Proposer>>,
}

impl ProposerChain {
    pub fn new(proposers: Vec<Box<dyn Proposer>>) -> Self {
        Self { proposers }
    }

    pub async fn propose(&self, target: usize, rng: &mut PracticeRng) -> Vec<PracticeUnit> {
        let mut merged: Vec<PracticeUnit> = Vec::new();
        for proposer in &self.proposers {
            match proposer.propose(target, rng).await {
                Ok(proposals) => {
                    tracing::debug!(
                        proposer = proposer.name(),
                        count = proposals.len(),
                        "Collected proposals"
                    );
                    merged.extend(proposals);
                }
                Err(error) => {
                    tracing::warn!(
                        proposer = proposer.name(),
                        %error,
                        "Proposer failed, treating as empty"
                    );
                }
            }
        }

        let mut seen: HashSet<UnitKey> = HashSet::new();
        let mut unique: Vec<PracticeUnit> = merged
            .into_iter()
            .filter(|unit| seen.insert(unit.key()))
            .collect();
        rng.shuffle(&mut unique);
        unique.truncate(target);
        unique
    }
}
