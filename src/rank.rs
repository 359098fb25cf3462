use crate::config::EngineConfig;
use crate::types::{DocumentRecord, Field, Index, SearchResult};
use std::cmp::Ordering;

/// IDF component: ln((N - df + 0.5) / (df + 0.5) + 1)
///
/// A term no document contains has no weight at all.
pub fn idf(doc_freq: usize, num_docs: usize) -> f32 {
    if doc_freq == 0 {
        return 0.0;
    }
    let df = doc_freq as f32;
    let n = num_docs as f32;
    ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
}

/// Calculate the BM25+ contribution of a single matched term
///
/// Arguments:
/// - term_freq: frequency of term in the field (must be > 0)
/// - doc_len: number of terms in the field
/// - avg_len: average length of the field across the corpus (must be > 0)
/// - idf: inverse document frequency of the term
pub fn bm25_plus_term(
    term_freq: u32,
    doc_len: usize,
    avg_len: f32,
    idf: f32,
    config: &EngineConfig,
) -> f32 {
    let tf = term_freq as f32;
    let dl = doc_len as f32;
    let k1 = config.k1;
    let b = config.b;

    // TF component with length normalization
    let tf_norm = (tf * (k1 + 1.0)) / (tf + k1 * (1.0 - b + b * dl / avg_len));

    idf * tf_norm + config.delta
}

impl Index {
    /// Inverse document frequency of `term` over the current corpus
    pub fn idf(&self, term: &str) -> f32 {
        let doc_freq = self.inverted.get(term).map_or(0, |ids| ids.len());
        idf(doc_freq, self.stats.document_count)
    }

    /// Score one field of a document against the query terms.
    /// Only terms present in the field contribute, each adding at least `delta`.
    pub fn score_field(
        &self,
        record: &DocumentRecord,
        query_terms: &[String],
        field: Field,
        config: &EngineConfig,
    ) -> f32 {
        let avg_len = self.stats.avg_length(field);
        if avg_len == 0.0 {
            return 0.0;
        }
        let doc_len = record.length(field);

        query_terms
            .iter()
            .map(|term| {
                let tf = record.term_frequency(field, term);
                if tf == 0 {
                    0.0
                } else {
                    bm25_plus_term(tf, doc_len, avg_len, self.idf(term), config)
                }
            })
            .sum()
    }
}

/// Order results by score (highest first), ties by id.
/// Total order, so NaN scores cannot break the sort.
pub fn compare_results(a: &SearchResult, b: &SearchResult) -> Ordering {
    b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id))
}

/// Get N highest results from an unranked list
pub fn top_n(mut results: Vec<SearchResult>, n: usize) -> Vec<SearchResult> {
    results.sort_by(compare_results);
    results.truncate(n);
    results
}
