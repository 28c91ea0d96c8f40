//! Korean-input heuristic.
//!
//! A character-range check over the Hangul syllable block (U+AC00–U+D7A3),
//! matching the `[가-힣]` test in the source deployment.  Deliberately
//! narrow: Hangul Jamo and compatibility blocks are not considered, so short
//! or ambiguous text can produce false negatives.  This is a routing
//! heuristic, not a language-ID model.

/// Returns `true` iff any character of `text` is a Hangul syllable.
pub fn is_korean(text: &str) -> bool {
    text.chars().any(|c| ('가'..='힣').contains(&c))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn korean_text_is_detected() {
        assert!(is_korean("안녕"));
        assert!(is_korean("안녕하세요"));
        assert!(is_korean("감사합니다"));
    }

    #[test]
    fn single_hangul_syllable_among_ascii_is_detected() {
        assert!(is_korean("hello 한 world"));
    }

    #[test]
    fn ascii_text_is_not_korean() {
        assert!(!is_korean("hello there"));
        assert!(!is_korean("What is up?"));
    }

    #[test]
    fn thai_text_is_not_korean() {
        assert!(!is_korean("สวัสดีครับ"));
        assert!(!is_korean("ขอบคุณครับ/ค่ะ"));
    }

    #[test]
    fn empty_text_is_not_korean() {
        assert!(!is_korean(""));
    }

    #[test]
    fn block_boundaries_are_inclusive() {
        // First and last code points of the Hangul syllable block.
        assert!(is_korean("\u{AC00}"));
        assert!(is_korean("\u{D7A3}"));
        // Just outside the block (Hangul Jamo) is intentionally not matched.
        assert!(!is_korean("\u{1100}"));
    }
}
