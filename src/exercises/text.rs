//! Unicode-aware text helpers shared by the exercise generators: sentence
//! tokenization, script-direction detection and the string metrics behind
//! distractor picking.

use regex::Regex;
use std::sync::OnceLock;

use crate::constants::{CLOZE_PLACEHOLDER_LTR, CLOZE_PLACEHOLDER_RTL};

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Words (letters, then letters/digits with internal apostrophes and
        // hyphens), punctuation runs, whitespace runs.
        Regex::new(r"\p{L}+[\p{N}\p{L}'’-]*|[.,!?;:،؟…-]+|\s+").unwrap()
    })
}

fn word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[\p{L}\p{N}]").unwrap())
}

/// Word tokens, punctuation runs and whitespace runs in order of appearance.
/// Characters outside those classes are dropped.
pub fn tokenize(sentence: &str) -> Vec<&str> {
    token_pattern()
        .find_iter(sentence)
        .map(|found| found.as_str())
        .collect()
}

/// A token counts as a word when it carries at least one letter or digit.
pub fn is_word_token(token: &str) -> bool {
    word_pattern().is_match(token)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

const RTL_RANGES: [(u32, u32); 6] = [
    (0x0590, 0x05FF), // Hebrew
    (0x0600, 0x06FF), // Arabic
    (0x0750, 0x077F), // Arabic Supplement
    (0x08A0, 0x08FF), // Arabic Extended-A
    (0xFB50, 0xFDFF), // Arabic Presentation Forms-A
    (0xFE70, 0xFEFF), // Arabic Presentation Forms-B
];

const LTR_RANGES: [(u32, u32); 5] = [
    (0x00C0, 0x024F), // Latin-1 Supplement + Latin Extended
    (0x0370, 0x03FF), // Greek
    (0x0400, 0x04FF), // Cyrillic
    (0x3040, 0x30FF), // Hiragana + Katakana
    (0x4E00, 0x9FFF), // CJK Unified Ideographs
];

fn in_ranges(code: u32, ranges: &[(u32, u32)]) -> bool {
    ranges.iter().any(|&(lo, hi)| (lo..=hi).contains(&code))
}

/// Majority vote over the directional characters; ties count as LTR.
pub fn detect_direction(text: &str) -> TextDirection {
    let mut rtl = 0usize;
    let mut ltr = 0usize;
    for ch in text.chars() {
        let code = ch as u32;
        if in_ranges(code, &RTL_RANGES) {
            rtl += 1;
        } else if ch.is_ascii_alphabetic() || in_ranges(code, &LTR_RANGES) {
            ltr += 1;
        }
    }
    if rtl > ltr {
        TextDirection::Rtl
    } else {
        TextDirection::Ltr
    }
}

/// Placeholder glyphs matching the blanked token's script direction.
pub fn cloze_placeholder(token: &str) -> &'static str {
    match detect_direction(token) {
        TextDirection::Rtl => CLOZE_PLACEHOLDER_RTL,
        TextDirection::Ltr => CLOZE_PLACEHOLDER_LTR,
    }
}

/// Classic two-row edit distance over characters.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];
    for (i, char_a) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, char_b) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(char_a != char_b);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

/// Character-count window used when picking lookalike distractors.
pub fn is_length_within(candidate: &str, target_len: usize, tolerance: usize) -> bool {
    let len = candidate.chars().count();
    len >= target_len.saturating_sub(tolerance) && len <= target_len + tolerance
}

/// Case-insensitive whole-token containment; substrings do not count.
pub fn contains_word_ci(sentence: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    let needle = word.to_lowercase();
    tokenize(sentence)
        .into_iter()
        .filter(|token| is_word_token(token))
        .any(|token| token.to_lowercase() == needle)
}
