use std::collections::HashSet;
use std::sync::Arc;

use crate::contracts::{ProgressRepo, TaskRepo, TranslationRepo, UnitRepo};
use crate::error::CoreError;
use crate::scheduler::level_model;
use crate::tasks::generators::{self, TaskGenerator};
use crate::types::TaskType;

/// Keeps a unit's persisted active tasks equal to what its current level
/// makes applicable, with zero writes when the two already agree.
pub struct TaskCoordinator {
    units: Arc<dyn UnitRepo>,
    translations: Arc<dyn TranslationRepo>,
    progress: Arc<dyn ProgressRepo>,
    tasks: Arc<dyn TaskRepo>,
    generators: Vec<Box<dyn TaskGenerator>>,
}

impl TaskCoordinator {
    pub fn new(
        units: Arc<dyn UnitRepo>,
        translations: Arc<dyn TranslationRepo>,
        progress: Arc<dyn ProgressRepo>,
        tasks: Arc<dyn TaskRepo>,
    ) -> Self {
        Self {
            units,
            translations,
            progress,
            tasks,
            generators: generators::registry(),
        }
    }

    /// Reconciles one unit. Deactivations run before creations so the unit
    /// never carries two conflicting active tasks in between. A type that
    /// already has a record, even an inactive one, is never created again.
    pub async fn reconcile(&self, unit_uid: &str) -> Result<(), CoreError> {
        let Some(mut unit) = self.units.get_by_uid(unit_uid).await? else {
            return Err(CoreError::UnitVanished(unit_uid.to_string()));
        };
        let translations = self.translations.get_by_ids(&unit.translations).await?;
        let records = self.progress.get_all_for_unit(&unit.uid).await?;
        let level = level_model::resolve_level(&records);

        let applicable: HashSet<TaskType> = self
            .generators
            .iter()
            .filter(|generator| generator.is_applicable(&unit, &translations, level))
            .map(|generator| generator.task_type())
            .collect();

        let persisted = self.tasks.get_by_associated_unit(&unit.uid).await?;
        let active: HashSet<TaskType> = persisted
            .iter()
            .filter(|task| task.is_active)
            .map(|task| task.task_type)
            .collect();

        if applicable == active {
            return Ok(());
        }

        for task in &persisted {
            if task.is_active && !applicable.contains(&task.task_type) {
                let mut updated = task.clone();
                updated.is_active = false;
                self.tasks.save(&updated).await?;
                tracing::debug!(
                    unit_uid = %unit.uid,
                    task_type = task.task_type.as_str(),
                    "Deactivated task"
                );
            }
        }

        let existing: HashSet<TaskType> = persisted.iter().map(|task| task.task_type).collect();
        let mut created_uids = Vec::new();
        for generator in &self.generators {
            let task_type = generator.task_type();
            if !applicable.contains(&task_type) || existing.contains(&task_type) {
                continue;
            }
            let task = generator.build(&unit, &translations);
            self.tasks.save(&task).await?;
            tracing::debug!(
                unit_uid = %unit.uid,
                task_type = task_type.as_str(),
                "Created task"
            );
            created_uids.push(task.uid);
        }

        if !created_uids.is_empty() {
            unit.tasks.extend(created_uids);
            self.units.save(&unit).await?;
        }

        Ok(())
    }
}
