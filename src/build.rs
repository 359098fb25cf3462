use crate::parse::tokenize;
use crate::types::{
    CorpusStatistics, DocumentRecord, Index, InvertedIndex, SourceDocument, TermFrequencies,
};
use std::collections::{HashMap, HashSet};

#[cfg(feature = "native")]
use rayon::prelude::*;

/// Count occurrences of each term
pub fn term_frequencies(tokens: &[String]) -> TermFrequencies {
    let mut freqs: TermFrequencies = HashMap::new();
    for token in tokens {
        *freqs.entry(token.clone()).or_insert(0) += 1;
    }
    freqs
}

/// Tokenize both fields of a document and compute its statistics
pub fn document_record(doc: &SourceDocument) -> DocumentRecord {
    let name_tokens = tokenize(&doc.name);
    let content_tokens = tokenize(&doc.content);

    DocumentRecord {
        id: doc.id.clone(),
        name: doc.name.clone(),
        name_length: name_tokens.len(),
        content_length: content_tokens.len(),
        name_term_frequency: term_frequencies(&name_tokens),
        content_term_frequency: term_frequencies(&content_tokens),
        name_tokens,
        content_tokens,
        raw_content: doc.content.clone(),
    }
}

#[cfg(feature = "native")]
fn document_records(docs: &[SourceDocument]) -> Vec<DocumentRecord> {
    // par_iter().collect() keeps input order, so later duplicates still win below
    docs.par_iter().map(document_record).collect()
}

#[cfg(not(feature = "native"))]
fn document_records(docs: &[SourceDocument]) -> Vec<DocumentRecord> {
    docs.iter().map(document_record).collect()
}

/// Build inverted index from records
/// Maps each term to the ids of documents containing it in either field
pub fn build_inverted_index(records: &HashMap<String, DocumentRecord>) -> InvertedIndex {
    let mut index: InvertedIndex = HashMap::new();

    for (doc_id, record) in records {
        let terms: HashSet<&String> = record
            .name_tokens
            .iter()
            .chain(record.content_tokens.iter())
            .collect();

        for term in terms {
            index
                .entry(term.clone())
                .or_insert_with(HashSet::new)
                .insert(doc_id.clone());
        }
    }

    index
}

/// Average field lengths over the stored records
pub fn corpus_statistics(records: &HashMap<String, DocumentRecord>) -> CorpusStatistics {
    let document_count = records.len();
    if document_count == 0 {
        return CorpusStatistics::default();
    }

    let total_name: usize = records.values().map(|r| r.name_length).sum();
    let total_content: usize = records.values().map(|r| r.content_length).sum();

    CorpusStatistics {
        document_count,
        avg_name_length: total_name as f32 / document_count as f32,
        avg_content_length: total_content as f32 / document_count as f32,
    }
}

/// Build a complete index from the full document list
/// Duplicate ids: the later document replaces the earlier one
pub fn build_index(docs: &[SourceDocument]) -> Index {
    if docs.is_empty() {
        return Index::default();
    }

    let mut records: HashMap<String, DocumentRecord> = HashMap::with_capacity(docs.len());
    for record in document_records(docs) {
        records.insert(record.id.clone(), record);
    }

    let inverted = build_inverted_index(&records);
    let stats = corpus_statistics(&records);

    Index {
        records,
        inverted,
        stats,
    }
}
