use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::config::ProposerConfig;
use crate::contracts::{ProgressRepo, ResourceRepo, UnitRepo};
use crate::error::CoreError;
use crate::proposers::Proposer;
use crate::rng::PracticeRng;
use crate::scheduler::level_model;
use crate::types::PracticeUnit;

/// Vocabulary from one due immersion resource, biased toward reinforcing
/// seen-and-due units over introducing brand-new ones.
pub struct ProposerByImmersion {
    resources: Arc<dyn ResourceRepo>,
    units: Arc<dyn UnitRepo>,
    progress: Arc<dyn ProgressRepo>,
    config: ProposerConfig,
    languages: Vec<String>,
}

impl ProposerByImmersion {
    pub fn new(
        resources: Arc<dyn ResourceRepo>,
        units: Arc<dyn UnitRepo>,
        progress: Arc<dyn ProgressRepo>,
        config: ProposerConfig,
        languages: Vec<String>,
    ) -> Self {
        Self {
            resources,
            units,
            progress,
            config,
            languages,
        }
    }
}

#[async_trait]
impl Proposer for ProposerByImmersion {
    fn name(&self) -> &'static str {
        "by-immersion"
    }

    async fn propose(
        &self,
        target: usize,
        rng: &mut PracticeRng,
    ) -> Result<Vec<PracticeUnit>, CoreError> {
        let Some(resource) = self.resources.get_random_due(&self.languages).await? else {
            return Ok(Vec::new());
        };
        tracing::debug!(resource = %resource.title, "Drawing vocabulary from resource");

        let now = Utc::now();
        let mut seen_due = Vec::new();
        let mut brand_new = Vec::new();
        for unit in self.units.get_by_uids(&resource.associated_units).await? {
            if unit.do_not_practice {
                continue;
            }
            let records = self.progress.get_all_for_unit(&unit.uid).await?;
            if level_model::is_seen_and_due(&records, now) {
                seen_due.push(unit);
            } else if !level_model::is_seen(&records) {
                brand_new.push(unit);
            }
            // Seen but not due: fresh in memory, nothing to gain.
        }
        rng.shuffle(&mut seen_due);
        rng.shuffle(&mut brand_new);

        let mut proposals = Vec::new();
        while proposals.len() < target && (!seen_due.is_empty() || !brand_new.is_empty()) {
            let prefer_seen = rng.chance(self.config.seen_over_new_bias);
            let pool = if prefer_seen && !seen_due.is_empty() {
                &mut seen_due
            } else if !brand_new.is_empty() {
                &mut brand_new
            } else {
                &mut seen_due
            };
            if let Some(unit) = pool.pop() {
                proposals.push(unit);
            }
        }
        Ok(proposals)
    }
}
