//! Body excerpts around the first query match.
//!
//! Positions and window sizes count characters, not bytes, so multi-byte
//! text never splits inside a code point.

use crate::config::EngineConfig;

const ELLIPSIS: &str = "...";

/// Lowercase char by char, keeping one char per input char so indices line up
fn fold_case(chars: &[char]) -> Vec<char> {
    chars
        .iter()
        .map(|c| c.to_lowercase().next().unwrap_or(*c))
        .collect()
}

/// Lowest char index where `needle` occurs in `haystack`
fn find_chars(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Earliest case-insensitive match of any query term: (char index, term length)
fn first_match(folded: &[char], query_terms: &[String]) -> Option<(usize, usize)> {
    query_terms
        .iter()
        .filter_map(|term| {
            let needle = fold_case(&term.chars().collect::<Vec<_>>());
            find_chars(folded, &needle).map(|pos| (pos, needle.len()))
        })
        .min_by_key(|&(pos, _)| pos)
}

/// Build a snippet of `content` around the first query term it contains.
/// Without any match, the start of the body is returned instead.
pub fn make_snippet(content: &str, query_terms: &[String], config: &EngineConfig) -> String {
    let chars: Vec<char> = content.chars().collect();
    let folded = fold_case(&chars);
    let len = chars.len();

    let Some((pos, term_len)) = first_match(&folded, query_terms) else {
        let head: String = chars.iter().take(config.snippet_fallback).collect();
        return if len > config.snippet_fallback {
            format!("{}{}", head, ELLIPSIS)
        } else {
            head
        };
    };

    let start = pos.saturating_sub(config.snippet_before);
    let end = (pos + term_len + config.snippet_after).min(len);

    let mut snippet = String::new();
    if start > 0 {
        snippet.push_str(ELLIPSIS);
    }
    snippet.extend(&chars[start..end]);
    if end < len {
        snippet.push_str(ELLIPSIS);
    }
    snippet
}
