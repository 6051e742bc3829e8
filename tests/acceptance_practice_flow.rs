mod common;

use common::fixtures::{seed_filler_words, seed_sentence, seed_word, spawn_test_core};
use practice_core::lesson::SessionContext;
use practice_core::scheduler::ReviewOptions;
use practice_core::types::{ExerciseKind, Rating};

#[tokio::test]
async fn at_practice_flow_smoke() {
    let core = spawn_test_core();
    let sentence = seed_sentence(
        &core.store,
        "el perro bebe agua",
        &["the dog drinks water"],
    );
    let perro = seed_word(&core.store, "perro", &["dog"]);
    seed_word(&core.store, "agua", &["water"]);
    seed_filler_words(&core.store, 24);

    let mut session = SessionContext::seeded(7);

    // Brand-new vocabulary starts with free recall.
    let first = core
        .engine
        .generate_exercise(&perro, &mut session)
        .await
        .expect("generate exercise")
        .expect("unseen word has an exercise");
    assert_eq!(first.kind, ExerciseKind::TryToRemember);

    // Two passing reviews climb one level and leave persisted tasks behind.
    core.engine
        .record_review(&perro.uid, -1, Rating::Good, ReviewOptions::default())
        .await
        .expect("first review");
    assert_eq!(core.engine.resolve_level(&perro.uid).await.expect("level"), 0);

    core.engine
        .record_review(&perro.uid, 0, Rating::Good, ReviewOptions::default())
        .await
        .expect("second review");
    assert_eq!(core.engine.resolve_level(&perro.uid).await.expect("level"), 1);

    let linked = core
        .store
        .get_unit(&perro.uid)
        .expect("reload unit")
        .expect("unit exists");
    assert!(!linked.tasks.is_empty());
    let tasks = core.store.get_tasks_by_unit(&perro.uid).expect("unit tasks");
    assert!(tasks.iter().any(|task| task.is_active));

    // A full lesson stays inside the size band and closes with the sentence.
    let lesson = core
        .engine
        .build_lesson(&["es".to_string()], &mut session)
        .await
        .expect("build lesson");
    assert!(lesson.exercises.len() >= 5);
    assert!(lesson.exercises.len() <= 20);

    let anchor = lesson.exercises.last().expect("non-empty lesson");
    assert_eq!(anchor.unit.content, sentence.content);
    assert_eq!(anchor.kind, ExerciseKind::GuessSentenceMeaning);
}
