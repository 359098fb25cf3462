use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Document as supplied by the host's document store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub id: String,
    pub name: String,
    pub content: String,
}

/// Term frequency table: term -> occurrences in one field
pub type TermFrequencies = HashMap<String, u32>;

/// Inverted index: term -> ids of documents containing it in name or content
pub type InvertedIndex = HashMap<String, HashSet<String>>;

/// Per-document statistics owned by the engine, rebuilt on every index build
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRecord {
    pub id: String,
    pub name: String,
    pub name_tokens: Vec<String>,
    pub content_tokens: Vec<String>,
    pub name_length: usize,
    pub content_length: usize,
    pub name_term_frequency: TermFrequencies,
    pub content_term_frequency: TermFrequencies,
    pub raw_content: String,
}

impl DocumentRecord {
    /// Token count of a field
    pub fn length(&self, field: Field) -> usize {
        match field {
            Field::Name => self.name_length,
            Field::Content => self.content_length,
        }
    }

    /// Occurrences of `term` in a field (0 when absent)
    pub fn term_frequency(&self, field: Field, term: &str) -> u32 {
        let table = match field {
            Field::Name => &self.name_term_frequency,
            Field::Content => &self.content_term_frequency,
        };
        table.get(term).copied().unwrap_or(0)
    }
}

/// Corpus-wide length statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusStatistics {
    pub document_count: usize,
    pub avg_name_length: f32,
    pub avg_content_length: f32,
}

impl CorpusStatistics {
    /// Average token count of a field across the corpus
    pub fn avg_length(&self, field: Field) -> f32 {
        match field {
            Field::Name => self.avg_name_length,
            Field::Content => self.avg_content_length,
        }
    }
}

/// Complete index state: records, inverted index and statistics
#[derive(Debug, Clone, Default)]
pub struct Index {
    pub records: HashMap<String, DocumentRecord>,
    pub inverted: InvertedIndex,
    pub stats: CorpusStatistics,
}

impl Index {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Scored document field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Content,
}

/// Which field dominated a result's score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Name,
    Content,
}

/// Search result with document info and relevance score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: String,
    pub name: String,
    pub score: f32,
    pub match_type: MatchType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}
