use crate::exercises::text;
use crate::rng::PracticeRng;

/// One blanked sentence: the rebuilt prompt with a placeholder where the
/// chosen token was, and the token itself as the expected answer.
#[derive(Debug, Clone, PartialEq)]
pub struct ClozeParts {
    pub prompt: String,
    pub answer: String,
}

/// Replaces one random word token with a direction-aware placeholder.
/// Needs at least two word tokens so the remainder still gives context.
/// Tokens at or above `min_token_chars` are preferred; shorter ones are only
/// blanked when nothing longer exists.
pub fn blank_random_token(
    sentence: &str,
    min_token_chars: usize,
    rng: &mut PracticeRng,
) -> Option<ClozeParts> {
    let tokens = text::tokenize(sentence);
    let word_indexes: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| text::is_word_token(token))
        .map(|(index, _)| index)
        .collect();
    if word_indexes.len() < 2 {
        return None;
    }

    let preferred: Vec<usize> = word_indexes
        .iter()
        .copied()
        .filter(|&index| tokens[index].chars().count() >= min_token_chars)
        .collect();
    let pool = if preferred.is_empty() {
        &word_indexes
    } else {
        &preferred
    };
    let blanked = *rng.pick(pool)?;

    let mut prompt = String::with_capacity(sentence.len());
    for (index, token) in tokens.iter().enumerate() {
        if index == blanked {
            prompt.push_str(text::cloze_placeholder(token));
        } else {
            prompt.push_str(token);
        }
    }

    Some(ClozeParts {
        prompt,
        answer: tokens[blanked].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blanks_exactly_one_word() {
        let mut rng = PracticeRng::seeded(11);
        let parts = blank_random_token("el perro bebe agua", 3, &mut rng).unwrap();

        assert!(parts.prompt.contains("???"));
        assert_ne!(parts.prompt, "el perro bebe agua");
        assert!(["perro", "bebe", "agua"].contains(&parts.answer.as_str()));
        assert_eq!(
            parts.prompt,
            "el perro bebe agua".replace(&parts.answer, "???")
        );
    }

    #[test]
    fn short_tokens_are_skipped_when_longer_ones_exist() {
        for seed in 0..20 {
            let mut rng = PracticeRng::seeded(seed);
            let parts = blank_random_token("el perro bebe", 3, &mut rng).unwrap();
            assert_ne!(parts.answer, "el");
        }
    }

    #[test]
    fn all_short_tokens_still_blank_something() {
        let mut rng = PracticeRng::seeded(2);
        let parts = blank_random_token("yo no", 3, &mut rng).unwrap();
        assert!(["yo", "no"].contains(&parts.answer.as_str()));
    }

    #[test]
    fn single_word_sentences_cannot_blank() {
        let mut rng = PracticeRng::seeded(2);
        assert!(blank_random_token("perro", 3, &mut rng).is_none());
        assert!(blank_random_token("", 3, &mut rng).is_none());
        assert!(blank_random_token("¡...!", 3, &mut rng).is_none());
    }

    #[test]
    fn rtl_sentences_get_the_rtl_placeholder() {
        let mut rng = PracticeRng::seeded(4);
        let parts = blank_random_token("الولد يشرب الماء", 3, &mut rng).unwrap();
        assert!(parts.prompt.contains("؟؟؟"));
        assert!(!parts.prompt.contains("???"));
    }
}
