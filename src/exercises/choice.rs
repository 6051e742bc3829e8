use crate::rng::PracticeRng;
use crate::types::AnswerOption;

/// Final option list for a choice exercise: the correct answer plus the
/// supplied wrong ones, shuffled. When the corpus could not produce enough
/// distractors the shortfall is padded with extra copies of the correct
/// answer, still marked correct, so every button stays honest.
pub fn build_options(
    correct: &str,
    wrong: Vec<String>,
    option_count: usize,
    rng: &mut PracticeRng,
) -> Vec<AnswerOption> {
    let mut options = Vec::with_capacity(option_count);
    options.push(AnswerOption {
        content: correct.to_string(),
        is_correct: true,
    });
    for content in wrong.into_iter().take(option_count.saturating_sub(1)) {
        options.push(AnswerOption {
            content,
            is_correct: false,
        });
    }
    while options.len() < option_count {
        options.push(AnswerOption {
            content: correct.to_string(),
            is_correct: true,
        });
    }
    rng.shuffle(&mut options);
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_distractor_set_leaves_one_correct() {
        let mut rng = PracticeRng::seeded(5);
        let options = build_options(
            "dog",
            vec!["cat".into(), "duck".into(), "horse".into()],
            4,
            &mut rng,
        );

        assert_eq!(options.len(), 4);
        assert_eq!(options.iter().filter(|option| option.is_correct).count(), 1);
        let correct = options.iter().find(|option| option.is_correct).unwrap();
        assert_eq!(correct.content, "dog");
    }

    #[test]
    fn shortfall_pads_with_the_correct_answer_marked_correct() {
        let mut rng = PracticeRng::seeded(5);
        let options = build_options("dog", vec!["cat".into()], 4, &mut rng);

        assert_eq!(options.len(), 4);
        assert_eq!(options.iter().filter(|option| option.is_correct).count(), 3);
        assert!(options
            .iter()
            .filter(|option| option.is_correct)
            .all(|option| option.content == "dog"));
    }

    #[test]
    fn extra_distractors_are_dropped() {
        let mut rng = PracticeRng::seeded(5);
        let wrong: Vec<String> = (0..5).map(|i| format!("wrong-{i}")).collect();
        let options = build_options("dog", wrong, 2, &mut rng);

        assert_eq!(options.len(), 2);
        assert_eq!(options.iter().filter(|option| option.is_correct).count(), 1);
    }
}
