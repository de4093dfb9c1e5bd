/// Final letter forms and the regular forms they fold into, so that a word ending in a final form
/// can still cross a word that has the same letter in the middle.
const FINAL_FORMS: [(char, char); 5] = [
    ('ך', 'כ'),
    ('ם', 'מ'),
    ('ן', 'נ'),
    ('ף', 'פ'),
    ('ץ', 'צ'),
];

/// Lower-case a word and fold any final letter forms.
pub fn normalize_word(word: &str) -> String {
    word.trim()
        .to_lowercase()
        .chars()
        .map(|c| {
            FINAL_FORMS.iter()
                .find(|&&(final_form, _)| final_form == c)
                .map(|&(_, regular)| regular)
                .unwrap_or(c)
        })
        .collect()
}

/// Parse a word list that's either a JSON array of strings or plain text with one word per line.
/// Words are normalized and blank entries dropped; order is preserved.
pub fn parse_word_list(text: &str) -> Result<Vec<String>, serde_json::Error> {
    let raw: Vec<String> = if text.trim_start().starts_with('[') {
        serde_json::from_str(text)?
    } else {
        text.lines().map(|line| line.to_string()).collect()
    };

    Ok(raw.iter()
        .map(|word| normalize_word(word))
        .filter(|word| !word.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use crate::wordlist::{normalize_word, parse_word_list};

    #[test]
    fn test_normalize_word() {
        assert_eq!(normalize_word("  Apple "), "apple");
        assert_eq!(normalize_word("שלום"), "שלומ");
        assert_eq!(normalize_word("ארץ"), "ארצ");
        assert_eq!(normalize_word("כלך"), "כלכ");
    }

    #[test]
    fn test_parse_json_list() {
        let words = parse_word_list(r#"["Cat", "", "DOG", "עץ"]"#).unwrap();

        assert_eq!(words, vec!["cat", "dog", "עצ"]);
    }

    #[test]
    fn test_parse_line_list() {
        let words = parse_word_list("cat\n\n  Bird\r\nfish\n").unwrap();

        assert_eq!(words, vec!["cat", "bird", "fish"]);
    }

    #[test]
    fn test_parse_bad_json() {
        assert!(parse_word_list("[\"cat\", 3]").is_err());
    }
}
