use folio_core::text::{decode_entities, strip_tags};

pub const WORDS_PER_MINUTE: usize = 200;

/// Words of visible text in an HTML fragment
pub fn word_count(html: &str) -> usize {
    decode_entities(&strip_tags(html)).split_whitespace().count()
}

/// Estimated minutes to read: `ceil(words / 200)`
pub fn reading_time_minutes(html: &str) -> u32 {
    minutes_for_words(word_count(html))
}

pub fn minutes_for_words(words: usize) -> u32 {
    u32::try_from(words.div_ceil(WORDS_PER_MINUTE)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count_ignores_markup() {
        assert_eq!(word_count("<p>one <strong>two</strong></p><p>three</p>"), 3);
        assert_eq!(word_count("<img src=\"a.jpg\" alt=\"many words here\">"), 0);
        assert_eq!(word_count("a&nbsp;b"), 2);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn test_reading_time_rounds_up() {
        assert_eq!(minutes_for_words(0), 0);
        assert_eq!(minutes_for_words(1), 1);
        assert_eq!(minutes_for_words(200), 1);
        assert_eq!(minutes_for_words(201), 2);
        assert_eq!(minutes_for_words(1000), 5);
    }

    #[test]
    fn test_reading_time_from_html() {
        let html = format!("<p>{}</p>", "word ".repeat(450));
        assert_eq!(reading_time_minutes(&html), 3);
    }
}
