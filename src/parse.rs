use std::collections::HashSet;
use std::sync::OnceLock;

/// Common English function words: articles, pronouns, auxiliaries, prepositions, conjunctions
const STOP_WORDS: &[&str] = &[
    "a", "an", "the",
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those",
    "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "having",
    "do", "does", "did", "doing", "will", "would", "shall", "should", "can", "could", "may",
    "might", "must",
    "of", "at", "by", "for", "with", "in", "into", "on", "to", "from", "as",
    "and", "but", "or", "nor", "if", "because", "while", "than", "so", "whether",
    "not", "there", "then", "until",
];

/// Accented Latin letters kept as word characters
const ACCENTED: &[char] = &[
    'á', 'à', 'â', 'ã', 'é', 'è', 'ê', 'í', 'ï', 'ó', 'ô', 'õ', 'ö', 'ú', 'ç', 'ñ',
];

fn stop_words() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOP_WORDS.iter().copied().collect())
}

/// Whether `word` is in the stopword set
pub fn is_stop_word(word: &str) -> bool {
    stop_words().contains(word)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_lowercase() || ACCENTED.contains(&c)
}

/// Tokenize text into terms (lowercase, keep Latin letters, drop short words and stopwords)
///
/// Terms come out in input order; snippets rely on that, scoring does not.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();

    // Everything that is not a letter or whitespace becomes a separator
    let cleaned: String = lowered
        .chars()
        .map(|c| {
            if is_word_char(c) || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|s| s.chars().count() >= 2 && !is_stop_word(s))
        .map(|s| s.to_string())
        .collect()
}
