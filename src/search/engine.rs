use super::tokenizer::split_phrase;
use super::types::{SearchHit, SearchResults, document_key};
use crate::error::Result;
use crate::storage::repository::IndexStore;
use crate::storage::types::{DocumentId, DocumentPostings, Ordinal, PostingTable};

use std::collections::{HashMap, HashSet};

/// Ranks documents by the summed term frequency of the phrase's terms.
///
/// Terms are looked up literally in the exact table, or in the lowercased table
/// when `case_sensitive` is false. Documents matching no term are absent.
pub fn search(store: &dyn IndexStore, phrase: &str, case_sensitive: bool) -> Result<SearchResults> {
    let terms = split_phrase(phrase);
    let rows = store.get_postings(PostingTable::for_case(case_sensitive), &terms)?;

    let mut hits: HashMap<DocumentId, SearchHit> = HashMap::new();
    for row in rows.iter() {
        for (document_id, ordinals) in row.postings.iter() {
            let hit = hits.entry(*document_id).or_default();
            hit.score += ordinals.len();
            hit.idx
                .push((row.token.clone(), ordinals.iter().copied().collect()));
        }
    }

    let ids: HashSet<DocumentId> = hits.keys().copied().collect();
    let documents = store.get_documents_by_ids(&ids)?;

    let mut results = SearchResults::new();
    for document in documents {
        if let Some(hit) = hits.remove(&document.id) {
            results.insert(document_key(&document.title, &document.author), hit);
        }
    }

    tracing::debug!("search({:?}) matched {} documents", phrase, results.len());
    Ok(results)
}

/// Returns the documents containing the phrase's terms at consecutive ordinals.
///
/// If the store does not return exactly one row per phrase word the result is
/// empty, which also rejects phrases that repeat a word. Results follow the
/// iteration order of the first term's postings.
pub fn exact(store: &dyn IndexStore, phrase: &str) -> Result<Vec<String>> {
    let words = split_phrase(phrase);
    let rows = store.get_postings(PostingTable::Exact, &words)?;

    if words.is_empty() || rows.len() != words.len() {
        tracing::debug!(
            "exact({:?}): {} rows for {} words, no match",
            phrase,
            rows.len(),
            words.len()
        );
        return Ok(Vec::new());
    }

    let by_token: HashMap<&str, &DocumentPostings> = rows
        .iter()
        .map(|row| (row.token.as_str(), &row.postings))
        .collect();

    let chain: Option<Vec<&DocumentPostings>> = words
        .iter()
        .map(|word| by_token.get(word.as_str()).copied())
        .collect();
    let Some(chain) = chain else {
        return Ok(Vec::new());
    };
    let (head, rest) = match chain.split_first() {
        Some(split) => split,
        None => return Ok(Vec::new()),
    };

    let matched: Vec<DocumentId> = head
        .iter()
        .filter(|(document_id, starts)| {
            starts
                .iter()
                .any(|start| chain_matches(document_id, *start, rest))
        })
        .map(|(document_id, _)| *document_id)
        .collect();

    let ids: HashSet<DocumentId> = matched.iter().copied().collect();
    let documents: HashMap<DocumentId, String> = store
        .get_documents_by_ids(&ids)?
        .into_iter()
        .map(|doc| (doc.id, document_key(&doc.title, &doc.author)))
        .collect();

    Ok(matched
        .iter()
        .filter_map(|document_id| documents.get(document_id).cloned())
        .collect())
}

/// Checks that `rest[i]` holds `start + i + 1` for `document_id`, stopping at the
/// first term that breaks the chain.
pub fn chain_matches(document_id: &DocumentId, start: Ordinal, rest: &[&DocumentPostings]) -> bool {
    rest.iter().zip(1..).all(|(postings, offset)| {
        let Some(expected) = start.checked_add(offset) else {
            return false;
        };
        postings
            .get(document_id)
            .is_some_and(|ordinals| ordinals.contains(&expected))
    })
}
