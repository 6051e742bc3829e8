use std::sync::Arc;

use tempfile::TempDir;

use practice_core::config::Config;
use practice_core::engine::PracticeEngine;
use practice_core::store::Store;
use practice_core::types::{PracticeUnit, Resource, Translation, UnitKind};

pub struct TestCore {
    pub engine: PracticeEngine,
    pub store: Arc<Store>,
    _temp_dir: TempDir,
}

/// Engine over a throwaway sled database. The config is built directly
/// instead of going through the environment so parallel tests cannot race on
/// `set_var`.
pub fn spawn_test_core() -> TestCore {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let sled_path = temp_dir.path().join("practice-test.sled");

    let config = Config {
        log_level: "info".to_string(),
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        sled_path: sled_path.to_str().expect("utf8 path").to_string(),
        engine: Default::default(),
    };

    let store = Arc::new(Store::open(&config.sled_path).expect("open store"));
    let engine = PracticeEngine::with_store(Arc::clone(&store), config).expect("build engine");

    TestCore {
        engine,
        store,
        _temp_dir: temp_dir,
    }
}

pub fn seed_unit(
    store: &Store,
    language: &str,
    content: &str,
    kind: UnitKind,
    translations: &[&str],
) -> PracticeUnit {
    let mut unit = PracticeUnit::new(language, content, kind);
    for text in translations {
        let translation = Translation::new("en", *text);
        store
            .save_translation(&translation)
            .expect("save seed translation");
        unit.translations.push(translation.uid);
    }
    store.save_unit(&unit).expect("save seed unit");
    unit
}

pub fn seed_word(store: &Store, content: &str, translations: &[&str]) -> PracticeUnit {
    seed_unit(store, "es", content, UnitKind::Word, translations)
}

pub fn seed_sentence(store: &Store, content: &str, translations: &[&str]) -> PracticeUnit {
    seed_unit(store, "es", content, UnitKind::Sentence, translations)
}

/// Filler vocabulary so lesson assembly has enough material to hit its size
/// band.
pub fn seed_filler_words(store: &Store, count: usize) -> Vec<PracticeUnit> {
    (0..count)
        .map(|idx| {
            seed_word(
                store,
                &format!("palabra-{idx}"),
                &[&format!("filler-{idx}")],
            )
        })
        .collect()
}

pub fn seed_resource(store: &Store, title: &str, unit_uids: &[String]) -> Resource {
    let mut resource = Resource::new("es", title);
    resource.associated_units = unit_uids.to_vec();
    store.save_resource(&resource).expect("save seed resource");
    resource
}
