use std::collections::HashSet;
use wasm_bindgen::prelude::*;

pub mod build;
pub mod config;
pub mod parse;
pub mod perf;
pub mod rank;
pub mod snippet;
pub mod types;

pub use crate::config::EngineConfig;
use crate::types::{CorpusStatistics, DocumentRecord, Field, Index, MatchType};
pub use crate::types::{SearchResult, SourceDocument};

#[cfg(feature = "native")]
use rayon::prelude::*;

/// Search engine handle: owns one index and the config used to query it
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    index: Index,
    config: EngineConfig,
}

impl SearchEngine {
    pub fn new(config: EngineConfig) -> Self {
        SearchEngine {
            index: Index::default(),
            config,
        }
    }

    /// Create an engine from a config JSON string (blank means defaults).
    /// Out-of-range parameters are rejected.
    pub fn from_config_json(config_json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(EngineConfig::from_json(config_json)?))
    }

    /// Replace the whole index with one built from `docs`.
    /// The new index is built to completion before it is swapped in.
    pub fn build_index(&mut self, docs: &[SourceDocument]) {
        let start = perf::now_ms();
        let index = build::build_index(docs);

        perf::log(&format!(
            "[perf] build docs={} stored={} terms={} | total={:.1}ms",
            docs.len(),
            index.stats.document_count,
            index.inverted.len(),
            perf::now_ms() - start
        ));

        self.index = index;
    }

    /// Rebuild from a JSON array of `{id, name, content}` documents.
    /// On a parse error the current index is left untouched.
    pub fn build_index_json(&mut self, docs_json: &str) -> Result<(), serde_json::Error> {
        let docs: Vec<SourceDocument> = serde_json::from_str(docs_json)?;
        self.build_index(&docs);
        Ok(())
    }

    /// Search with the configured default result limit
    pub fn search_default(&self, query: &str) -> Vec<SearchResult> {
        self.search(query, self.config.max_results)
    }

    /// Rank documents against `query`, best first, at most `max_results` of them
    pub fn search(&self, query: &str, max_results: usize) -> Vec<SearchResult> {
        let start_total = perf::now_ms();

        let query_terms = parse::tokenize(query);
        if query_terms.is_empty() || self.index.is_empty() || max_results == 0 {
            return Vec::new();
        }

        let start_scoring = perf::now_ms();
        let candidates = self.candidates(&query_terms);
        let candidate_count = candidates.len();
        let scored = self.score_candidates(candidates, &query_terms);
        let scoring_time = perf::now_ms() - start_scoring;

        let start_ranking = perf::now_ms();
        let mut results = rank::top_n(scored, max_results);
        let ranking_time = perf::now_ms() - start_ranking;

        let start_snippets = perf::now_ms();
        for result in &mut results {
            if result.match_type != MatchType::Content {
                continue;
            }
            let content = &self.index.records[&result.id].raw_content;
            if !content.is_empty() {
                result.snippet = Some(snippet::make_snippet(content, &query_terms, &self.config));
            }
        }
        let snippet_time = perf::now_ms() - start_snippets;

        perf::log(&format!(
            "[perf] query='{}' terms={} candidates={} results={} | score={:.1}ms rank={:.1}ms snippet={:.1}ms | total={:.1}ms",
            query, query_terms.len(), candidate_count, results.len(),
            scoring_time, ranking_time, snippet_time, perf::now_ms() - start_total
        ));

        results
    }

    /// Search and serialize results to JSON.
    /// `None` uses the configured default limit; non-positive limits yield `[]`.
    pub fn search_json(&self, query: &str, max_results: Option<i32>) -> String {
        let limit = match max_results {
            None => self.config.max_results,
            Some(n) if n <= 0 => 0,
            Some(n) => n as usize,
        };
        let results = self.search(query, limit);
        serde_json::to_string(&results).unwrap_or_else(|_| "[]".to_string())
    }

    /// Inverse document frequency of a term over the current corpus
    pub fn idf(&self, term: &str) -> f32 {
        self.index.idf(term)
    }

    pub fn stats(&self) -> CorpusStatistics {
        self.index.stats
    }

    pub fn doc_count(&self) -> usize {
        self.index.stats.document_count
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Documents containing at least one query term, in either field
    fn candidates(&self, query_terms: &[String]) -> Vec<&DocumentRecord> {
        let ids: HashSet<&String> = query_terms
            .iter()
            .filter_map(|term| self.index.inverted.get(term))
            .flatten()
            .collect();

        ids.into_iter()
            .filter_map(|id| self.index.records.get(id))
            .collect()
    }

    #[cfg(feature = "native")]
    fn score_candidates(
        &self,
        candidates: Vec<&DocumentRecord>,
        query_terms: &[String],
    ) -> Vec<SearchResult> {
        candidates
            .into_par_iter()
            .filter_map(|record| self.score_document(record, query_terms))
            .collect()
    }

    #[cfg(not(feature = "native"))]
    fn score_candidates(
        &self,
        candidates: Vec<&DocumentRecord>,
        query_terms: &[String],
    ) -> Vec<SearchResult> {
        candidates
            .into_iter()
            .filter_map(|record| self.score_document(record, query_terms))
            .collect()
    }

    /// Combine both field scores; `None` when no query term matched
    fn score_document(
        &self,
        record: &DocumentRecord,
        query_terms: &[String],
    ) -> Option<SearchResult> {
        let name_score = self
            .index
            .score_field(record, query_terms, Field::Name, &self.config);
        let content_score = self
            .index
            .score_field(record, query_terms, Field::Content, &self.config);

        let boosted_name_score = name_score * self.config.name_boost;
        let score = boosted_name_score + content_score;
        // Also drops NaN from degenerate parameters
        if !(score > 0.0) {
            return None;
        }

        let match_type = if boosted_name_score > content_score {
            MatchType::Name
        } else {
            MatchType::Content
        };

        Some(SearchResult {
            id: record.id.clone(),
            name: record.name.clone(),
            score,
            match_type,
            snippet: None,
        })
    }
}

/// Search index handle exposed to JavaScript.
/// Each instance owns an independent index.
#[wasm_bindgen]
pub struct NoteSearch {
    engine: SearchEngine,
}

#[wasm_bindgen]
impl NoteSearch {
    /// config_json: JSON string of EngineConfig ("" or "{}" for defaults)
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<NoteSearch, JsError> {
        let engine = SearchEngine::from_config_json(config_json)
            .map_err(|e| JsError::new(&format!("Failed to parse config: {}", e)))?;
        Ok(NoteSearch { engine })
    }

    /// Rebuild the index from the full corpus
    /// docs_json: JSON array of {id, name, content}
    #[wasm_bindgen(js_name = buildIndex)]
    pub fn build_index(&mut self, docs_json: &str) -> Result<(), JsError> {
        self.engine
            .build_index_json(docs_json)
            .map_err(|e| JsError::new(&format!("Failed to parse documents: {}", e)))
    }

    /// Search and return JSON results
    pub fn search(&self, query: &str, max_results: Option<i32>) -> String {
        self.engine.search_json(query, max_results)
    }

    /// Get total number of indexed documents
    #[wasm_bindgen(js_name = docCount)]
    pub fn doc_count(&self) -> usize {
        self.engine.doc_count()
    }

    /// Corpus statistics as JSON
    #[wasm_bindgen(js_name = statsJson)]
    pub fn stats_json(&self) -> String {
        serde_json::to_string(&self.engine.stats()).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn doc(id: &str, name: &str, content: &str) -> SourceDocument {
        SourceDocument {
            id: id.to_string(),
            name: name.to_string(),
            content: content.to_string(),
        }
    }

    fn setup_test_engine() -> SearchEngine {
        let mut engine = SearchEngine::default();
        engine.build_index(&[
            doc("n1", "Baker Hall", "A building on campus with lecture rooms"),
            doc("n2", "Gates Center", "Computer science building near the garage"),
            doc("n3", "Programming 101", "Introduction to programming in Rust"),
            doc("n4", "Shopping", "eggs milk bread coffee"),
        ]);
        engine
    }

    fn ids(results: &[SearchResult]) -> Vec<&str> {
        results.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_search_docs() {
        let engine = setup_test_engine();
        let results = engine.search("baker hall", 5);

        assert_eq!(ids(&results), vec!["n1"]);
        assert_eq!(results[0].match_type, MatchType::Name);
        assert!(results[0].snippet.is_none());
        assert!(results.iter().all(|r| r.score > 0.0));
    }

    #[test]
    fn test_content_match_has_snippet() {
        let engine = setup_test_engine();
        let results = engine.search("coffee", 5);

        assert_eq!(ids(&results), vec!["n4"]);
        assert_eq!(results[0].match_type, MatchType::Content);
        assert_eq!(results[0].snippet.as_deref(), Some("eggs milk bread coffee"));
    }

    #[test]
    fn test_matches_from_both_fields() {
        let engine = setup_test_engine();
        let results = engine.search("building programming", 10);

        let mut found = ids(&results);
        found.sort();
        assert_eq!(found, vec!["n1", "n2", "n3"]);
    }

    #[test]
    fn test_empty_corpus() {
        let mut engine = SearchEngine::default();
        engine.build_index(&[]);
        assert!(engine.search("anything", 20).is_empty());
        assert_eq!(engine.doc_count(), 0);
        assert_eq!(engine.stats(), CorpusStatistics::default());
    }

    #[test]
    fn test_empty_and_stopword_queries() {
        let engine = setup_test_engine();
        assert!(engine.search("", 20).is_empty());
        assert!(engine.search("the and of", 20).is_empty());
        assert!(engine.search("?!", 20).is_empty());
    }

    #[test]
    fn test_unmatched_query() {
        let engine = setup_test_engine();
        assert!(engine.search("haskell", 20).is_empty());
    }

    #[test]
    fn test_title_boost() {
        let mut engine = SearchEngine::default();
        engine.build_index(&[
            doc("a", "Rust Programming", ""),
            doc("b", "Notes", "Learn Rust Programming today"),
        ]);

        let results = engine.search("Rust Programming", 20);
        assert_eq!(ids(&results), vec!["a", "b"]);
        assert_eq!(results[0].match_type, MatchType::Name);
        assert_eq!(results[1].match_type, MatchType::Content);
        assert_eq!(
            results[1].snippet.as_deref(),
            Some("Learn Rust Programming today")
        );
    }

    #[test]
    fn test_snippet_windowing() {
        let content = format!("{} needle {}", "x".repeat(100), "y".repeat(100));
        let mut engine = SearchEngine::default();
        engine.build_index(&[doc("a", "Haystack", &content)]);

        let results = engine.search("needle", 20);
        assert_eq!(results.len(), 1);
        let snippet = results[0].snippet.as_deref().unwrap();
        assert!(snippet.contains("needle"));
        assert!(snippet.starts_with("...") && snippet.ends_with("..."));
        assert_eq!(snippet.chars().count(), 20 + 6 + 40 + 6);
    }

    #[test]
    fn test_max_results_truncation() {
        let docs: Vec<SourceDocument> = (0..30)
            .map(|i| {
                // More repetitions of the term means a higher score
                let body = format!("{} filler", "topic ".repeat(i + 1));
                doc(&format!("doc{:02}", i), "Entry", &body)
            })
            .collect();
        let mut engine = SearchEngine::default();
        engine.build_index(&docs);

        let all = engine.search("topic", 100);
        assert_eq!(all.len(), 30);

        let top = engine.search("topic", 5);
        assert_eq!(top.len(), 5);
        assert_eq!(top, all[..5].to_vec());
        assert_eq!(ids(&top), vec!["doc29", "doc28", "doc27", "doc26", "doc25"]);

        assert!(engine.search("topic", 0).is_empty());
        assert_eq!(engine.search_default("topic").len(), 20);
    }

    #[test]
    fn test_equal_scores_ordered_by_id() {
        let mut engine = SearchEngine::default();
        engine.build_index(&[
            doc("c", "Twin", "same words"),
            doc("a", "Twin", "same words"),
            doc("b", "Twin", "same words"),
        ]);
        let results = engine.search("twin", 20);
        assert_eq!(ids(&results), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_idempotent_rebuild() {
        let docs = vec![
            doc("a", "Rust Notes", "ownership borrowing lifetimes"),
            doc("b", "Garden", "tomatoes need sun and water"),
            doc("c", "Rust Tips", "clippy lints and rust analyzer"),
        ];
        let mut once = SearchEngine::default();
        once.build_index(&docs);

        let mut twice = SearchEngine::default();
        twice.build_index(&docs);
        twice.build_index(&docs);

        for query in ["rust", "water sun", "lints ownership"] {
            assert_eq!(once.search(query, 20), twice.search(query, 20));
        }
    }

    #[test]
    fn test_rebuild_replaces_corpus() {
        let mut engine = setup_test_engine();
        engine.build_index(&[doc("z", "Fresh", "entirely different corpus")]);

        assert_eq!(engine.doc_count(), 1);
        assert!(engine.search("baker", 20).is_empty());
        assert_eq!(ids(&engine.search("corpus", 20)), vec!["z"]);
    }

    #[test]
    fn test_unknown_term_does_not_change_score() {
        let engine = setup_test_engine();
        assert_eq!(engine.idf("zyzzyva"), 0.0);
        assert_eq!(engine.search("coffee", 5), engine.search("coffee zyzzyva", 5));
    }

    #[test]
    fn test_json_surface() {
        let mut engine = SearchEngine::from_config_json("").unwrap();
        engine
            .build_index_json(r#"[{"id": "a", "name": "Rust", "content": "borrow checker"}]"#)
            .unwrap();

        let results: Vec<SearchResult> =
            serde_json::from_str(&engine.search_json("borrow", None)).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].match_type, MatchType::Content);

        let raw: serde_json::Value =
            serde_json::from_str(&engine.search_json("rust", Some(5))).unwrap();
        assert_eq!(raw[0]["matchType"], "name");
        assert!(raw[0].get("snippet").is_none());

        assert_eq!(engine.search_json("borrow", Some(0)), "[]");
        assert_eq!(engine.search_json("borrow", Some(-3)), "[]");
    }

    #[test]
    fn test_bad_documents_json_keeps_index() {
        let mut engine = setup_test_engine();
        assert!(engine.build_index_json("{not json").is_err());
        assert!(engine.build_index_json(r#"[{"id": "a"}]"#).is_err());
        assert_eq!(engine.doc_count(), 4);
        assert!(!engine.search("baker", 5).is_empty());
    }

    #[test]
    fn test_config_changes_boost() {
        let docs = [
            doc("a", "Rust Programming", ""),
            doc("b", "Notes", "Learn Rust Programming today"),
        ];
        let mut engine = SearchEngine::from_config_json(r#"{"nameBoost": 0.0}"#).unwrap();
        engine.build_index(&docs);
        assert_eq!(ids(&engine.search("rust programming", 20)), vec!["b"]);
    }

    #[test]
    fn test_ordinary_words_are_searchable() {
        let mut engine = SearchEngine::default();
        engine.build_index(&[doc("a", "Moving down under", "same old story, very few more")]);
        for query in ["down", "under", "same", "very", "few", "more", "over", "again"] {
            let expected = if query == "over" || query == "again" { 0 } else { 1 };
            assert_eq!(engine.search(query, 20).len(), expected, "query {:?}", query);
        }
    }

    #[test]
    fn test_rejected_config_json() {
        assert!(SearchEngine::from_config_json(r#"{"k1": -1.0, "b": 0.0}"#).is_err());
        assert!(SearchEngine::from_config_json(r#"{"b": 2.0}"#).is_err());
    }

    #[test]
    fn test_degenerate_scores_are_skipped() {
        // Bypasses validation: k1 = -1 makes single-occurrence terms score NaN
        let config = EngineConfig {
            k1: -1.0,
            b: 0.0,
            ..EngineConfig::default()
        };
        let docs: Vec<SourceDocument> = (0..40)
            .map(|i| doc(&format!("d{:02}", i), "Entry", &"word ".repeat(i % 3 + 1)))
            .collect();
        let mut engine = SearchEngine::new(config);
        engine.build_index(&docs);

        let results = engine.search("word", 50);
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.score.is_finite() && r.score > 0.0));
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[cfg(feature = "native")]
    #[test]
    fn test_parallel_scoring_matches_sequential() {
        let docs: Vec<SourceDocument> = (0..60)
            .map(|i| {
                let topic = "topic ".repeat(i % 7 + 1);
                let body = format!("{} filler {}", topic, "pad ".repeat(i % 5));
                doc(&format!("doc{:02}", i), "Entry", &body)
            })
            .collect();
        let mut engine = SearchEngine::default();
        engine.build_index(&docs);

        let terms = parse::tokenize("topic filler");
        let mut parallel = engine.score_candidates(engine.candidates(&terms), &terms);
        let mut sequential: Vec<SearchResult> = engine
            .candidates(&terms)
            .into_iter()
            .filter_map(|record| engine.score_document(record, &terms))
            .collect();
        parallel.sort_by(rank::compare_results);
        sequential.sort_by(rank::compare_results);
        assert_eq!(parallel.len(), 60);
        assert_eq!(parallel, sequential);
    }

    proptest! {
        #[test]
        fn prop_search_is_deterministic(
            bodies in proptest::collection::vec("[a-d ]{0,40}", 1..12),
            query in "[a-d ]{0,12}",
        ) {
            let docs: Vec<SourceDocument> = bodies
                .iter()
                .enumerate()
                .map(|(i, body)| doc(&format!("d{}", i), "note", body))
                .collect();
            let mut engine = SearchEngine::default();
            engine.build_index(&docs);

            let first = engine.search(&query, 20);
            let second = engine.search(&query, 20);
            prop_assert_eq!(&first, &second);
            prop_assert!(first.windows(2).all(|w| w[0].score >= w[1].score));
            prop_assert!(first.iter().all(|r| r.score > 0.0));
        }
    }
}
