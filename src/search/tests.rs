//! Search Module Tests
//!
//! Validates tokenization, indexing, relevance scoring and exact phrase matching.
//!
//! ## Test Scopes
//! - **Tokenizer**: Ordinals, tag chunks, punctuation, length and stopword filters.
//! - **Indexer**: Posting layout in both tables, idempotent merges, partial failures.
//! - **Relevance**: Term-frequency scores and explanations for the reference fixture.
//! - **Exact**: Adjacency chains, precondition short-circuits, result ordering.
//! - **Handlers**: Missing phrase message and storage failures.

#[cfg(test)]
mod tests {
    use crate::error::{IndexError, MISSING_PHRASE_MESSAGE, Result};
    use crate::search::engine::{chain_matches, exact, search};
    use crate::search::handlers::{
        handle_exact, handle_exact_json, handle_index_document, handle_index_document_json,
        handle_search, handle_search_json,
    };
    use crate::search::indexer::{group_by_token, index_document};
    use crate::search::tokenizer::{Token, split_phrase, strip_punctuation, tokenize};
    use crate::search::types::{
        CaseFlag, ExactParams, IndexDocumentRequest, IndexDocumentResponse, SearchParams,
        SearchResults, document_key,
    };
    use crate::storage::memory::InMemoryStore;
    use crate::storage::repository::IndexStore;
    use crate::storage::types::{
        Document, DocumentId, DocumentPostings, Ordinal, PostingRow, PostingTable,
    };
    use axum::body::to_bytes;
    use axum::extract::Query;
    use axum::http::{StatusCode, Uri};
    use axum::{Extension, Json};
    use std::collections::{BTreeSet, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Store that fails every merge after the first `merges_allowed`.
    struct FlakyStore {
        inner: InMemoryStore,
        merges_allowed: usize,
        merges_done: AtomicUsize,
    }

    impl FlakyStore {
        fn new(merges_allowed: usize) -> Self {
            Self {
                inner: InMemoryStore::initialized(),
                merges_allowed,
                merges_done: AtomicUsize::new(0),
            }
        }
    }

    impl IndexStore for FlakyStore {
        fn init_schema(&self) -> Result<()> {
            self.inner.init_schema()
        }

        fn create_document(&self, title: &str, author: &str) -> Result<DocumentId> {
            self.inner.create_document(title, author)
        }

        fn get_documents_by_ids(&self, ids: &HashSet<DocumentId>) -> Result<Vec<Document>> {
            self.inner.get_documents_by_ids(ids)
        }

        fn merge_postings(
            &self,
            table: PostingTable,
            token: &str,
            document_id: DocumentId,
            ordinals: &BTreeSet<Ordinal>,
        ) -> Result<()> {
            if self.merges_done.fetch_add(1, Ordering::SeqCst) >= self.merges_allowed {
                return Err(IndexError::StorageUnavailable("connection reset".to_string()));
            }
            self.inner.merge_postings(table, token, document_id, ordinals)
        }

        fn get_postings(&self, table: PostingTable, tokens: &[String]) -> Result<Vec<PostingRow>> {
            self.inner.get_postings(table, tokens)
        }
    }

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    fn ordinals(values: &[u32]) -> BTreeSet<u32> {
        values.iter().copied().collect()
    }

    fn terms(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    /// The three-document fixture used throughout.
    fn fixture() -> (InMemoryStore, DocumentId, DocumentId, DocumentId) {
        let store = InMemoryStore::initialized();
        let tables_alon = index_document(&store, "tables", "Alon", "test1 test2").unwrap();
        let chairs_alon =
            index_document(&store, "chairs", "Alon", "test4 test5 test4, test9").unwrap();
        let tables_dani =
            index_document(&store, "tables", "Dani", "test3 test2 test3 test4").unwrap();
        (store, tables_alon, chairs_alon, tables_dani)
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    // ============================================================
    // TOKENIZER TESTS
    // ============================================================

    #[test]
    fn test_tokenize_assigns_chunk_ordinals() {
        let tokens = tokenize("test1 test2");

        assert_eq!(
            tokens,
            vec![
                Token { text: "test1".to_string(), ordinal: 0 },
                Token { text: "test2".to_string(), ordinal: 1 },
            ]
        );
    }

    #[test]
    fn test_tokenize_tag_chunk_consumes_ordinal() {
        let tokens = tokenize("alpha <b>bold</b> omega");

        assert_eq!(texts(&tokens), vec!["alpha", "omega"]);
        assert_eq!(tokens[1].ordinal, 2, "Tag chunk still advances the counter");
    }

    #[test]
    fn test_tokenize_filtered_chunks_keep_later_ordinals() {
        // "a" (too short) and "the" (stopword) are dropped but counted
        let tokens = tokenize("a house the garden");

        assert_eq!(texts(&tokens), vec!["house", "garden"]);
        assert_eq!(tokens[0].ordinal, 1);
        assert_eq!(tokens[1].ordinal, 3);
    }

    #[test]
    fn test_tokenize_strips_punctuation() {
        let tokens = tokenize("(hello), world. {braces}: ok:");

        assert_eq!(texts(&tokens), vec!["hello", "world", "braces"]);
    }

    #[test]
    fn test_tokenize_short_after_stripping_is_dropped() {
        // "ab," strips to "ab" and "(x)" strips to "x"
        let tokens = tokenize("ab, (x) abc");

        assert_eq!(texts(&tokens), vec!["abc"]);
        assert_eq!(tokens[0].ordinal, 2);
    }

    #[test]
    fn test_stopwords_are_case_sensitive() {
        let tokens = tokenize("the The THE with With");

        assert_eq!(texts(&tokens), vec!["The", "THE", "With"]);
    }

    #[test]
    fn test_tokenize_keeps_repeats() {
        let tokens = tokenize("test4 test5 test4, test9");

        assert_eq!(texts(&tokens), vec!["test4", "test5", "test4", "test9"]);
        assert_eq!(tokens[2].ordinal, 2);
    }

    #[test]
    fn test_tokenize_empty_and_whitespace() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t ").is_empty());
    }

    #[test]
    fn test_strip_punctuation() {
        assert_eq!(strip_punctuation("AbCd"), "AbCd");
        assert_eq!(strip_punctuation("A:()bC,..d"), "AbCd");
        assert_eq!(strip_punctuation(""), "");
    }

    #[test]
    fn test_split_phrase_does_not_normalize() {
        assert_eq!(split_phrase("  Test1,  the "), vec!["Test1,", "the"]);
    }

    // ============================================================
    // INDEXER TESTS
    // ============================================================

    #[test]
    fn test_group_by_token_collects_ordinals() {
        let grouped = group_by_token(tokenize("test3 test2 test3 test4"));

        assert_eq!(grouped["test3"], ordinals(&[0, 2]));
        assert_eq!(grouped["test2"], ordinals(&[1]));
        assert_eq!(grouped["test4"], ordinals(&[3]));
    }

    #[test]
    fn test_index_document_writes_postings() {
        let store = InMemoryStore::initialized();
        let id = index_document(&store, "tables", "Alon", "test1 test2").unwrap();

        let rows = store
            .get_postings(PostingTable::Exact, &terms(&["test1", "test2"]))
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].token, "test1");
        assert_eq!(rows[0].postings[&id], ordinals(&[0]));
        assert_eq!(rows[1].token, "test2");
        assert_eq!(rows[1].postings[&id], ordinals(&[1]));
    }

    #[test]
    fn test_index_document_lowercased_table() {
        let store = InMemoryStore::initialized();
        let id = index_document(&store, "tables", "Alon", "Rust rust RUST").unwrap();

        let exact_rows = store
            .get_postings(PostingTable::Exact, &terms(&["Rust", "rust", "RUST"]))
            .unwrap();
        assert_eq!(exact_rows.len(), 3);

        let lower_rows = store
            .get_postings(PostingTable::Lower, &terms(&["rust"]))
            .unwrap();
        assert_eq!(lower_rows.len(), 1);
        assert_eq!(lower_rows[0].postings[&id], ordinals(&[0, 1, 2]));
    }

    #[test]
    fn test_reindexing_same_content_leaves_postings_unchanged() {
        let store = InMemoryStore::initialized();
        let id = index_document(&store, "tables", "Alon", "test1 test2").unwrap();

        let before = store
            .get_postings(PostingTable::Exact, &terms(&["test1", "test2"]))
            .unwrap();

        // Re-apply the same merges for the same document
        for (token, ords) in group_by_token(tokenize("test1 test2")) {
            store.merge_postings(PostingTable::Exact, &token, id, &ords).unwrap();
            store
                .merge_postings(PostingTable::Lower, &token.to_lowercase(), id, &ords)
                .unwrap();
        }

        let after = store
            .get_postings(PostingTable::Exact, &terms(&["test1", "test2"]))
            .unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_indexing_twice_creates_duplicate_document() {
        let store = InMemoryStore::initialized();
        let first = index_document(&store, "tables", "Alon", "test1 test2").unwrap();
        let second = index_document(&store, "tables", "Alon", "test1 test2").unwrap();

        assert_ne!(first, second);
        assert_eq!(store.document_count(), 2);

        let rows = store
            .get_postings(PostingTable::Exact, &terms(&["test1"]))
            .unwrap();
        assert_eq!(rows[0].postings.len(), 2);
        assert_eq!(rows[0].postings[&first], ordinals(&[0]));
        assert_eq!(rows[0].postings[&second], ordinals(&[0]));
    }

    #[test]
    fn test_index_document_without_schema_fails_before_writing() {
        let store = InMemoryStore::new();

        let result = index_document(&store, "tables", "Alon", "test1 test2");
        assert!(matches!(result, Err(IndexError::StorageUnavailable(_))));
    }

    #[test]
    fn test_merge_failure_leaves_document_under_indexed() {
        // ARRANGE: allow only the two merges of the first token
        let store = FlakyStore::new(2);

        // ACT
        let result = index_document(&store, "tables", "Dani", "test3 test2 test3 test4");

        // ASSERT: the failure surfaces to the caller
        assert!(matches!(result, Err(IndexError::StorageUnavailable(_))));

        // The document exists even though indexing failed
        assert_eq!(store.inner.document_count(), 1);

        // Tokens are merged in sorted order, so only "test2" landed
        let rows = store
            .get_postings(PostingTable::Exact, &terms(&["test2", "test3", "test4"]))
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].token, "test2");

        // The document is findable by the indexed token only
        let hits = search(&store, "test2 test3", true).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[&document_key("tables", "Dani")].score, 1);
        assert!(exact(&store, "test2 test3").unwrap().is_empty());
    }

    // ============================================================
    // RELEVANCE SEARCH TESTS
    // ============================================================

    #[test]
    fn test_search_fixture_scores_and_idx() {
        let (store, _, _, _) = fixture();

        let results = search(&store, "test1 test4", false).unwrap();

        assert_eq!(results.len(), 3);

        let tables_alon = &results[&document_key("tables", "Alon")];
        assert_eq!(tables_alon.score, 1);
        assert_eq!(tables_alon.idx, vec![("test1".to_string(), vec![0])]);

        let chairs_alon = &results[&document_key("chairs", "Alon")];
        assert_eq!(chairs_alon.score, 2);
        assert_eq!(chairs_alon.idx, vec![("test4".to_string(), vec![0, 2])]);

        let tables_dani = &results[&document_key("tables", "Dani")];
        assert_eq!(tables_dani.score, 1);
        assert_eq!(tables_dani.idx, vec![("test4".to_string(), vec![3])]);
    }

    #[test]
    fn test_search_score_sums_term_frequencies() {
        let store = InMemoryStore::initialized();
        index_document(&store, "notes", "Mia", "apple pear apple plum apple pear").unwrap();

        let results = search(&store, "apple pear", true).unwrap();
        let hit = &results[&document_key("notes", "Mia")];

        assert_eq!(hit.score, 5);
        assert_eq!(
            hit.idx,
            vec![
                ("apple".to_string(), vec![0, 2, 4]),
                ("pear".to_string(), vec![1, 5]),
            ]
        );
    }

    #[test]
    fn test_search_case_flag_selects_table() {
        let store = InMemoryStore::initialized();
        index_document(&store, "guide", "Lee", "Rust tooling").unwrap();

        // Exact table only knows "Rust"
        assert!(search(&store, "rust", true).unwrap().is_empty());
        assert_eq!(search(&store, "Rust", true).unwrap().len(), 1);

        // Lowercased table only knows "rust"; terms are not lowercased
        assert_eq!(search(&store, "rust", false).unwrap().len(), 1);
        assert!(search(&store, "Rust", false).unwrap().is_empty());
    }

    #[test]
    fn test_search_no_matches_is_empty() {
        let (store, _, _, _) = fixture();

        let results = search(&store, "nothing here", false).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_search_propagates_storage_failure() {
        let store = InMemoryStore::new();

        let result = search(&store, "test1", false);
        assert!(matches!(result, Err(IndexError::StorageUnavailable(_))));
    }

    // ============================================================
    // EXACT SEARCH TESTS
    // ============================================================

    #[test]
    fn test_exact_fixture_chain() {
        let (store, _, _, _) = fixture();

        let results = exact(&store, "test2 test3 test4").unwrap();
        assert_eq!(results, vec!["(tables, Dani)".to_string()]);
    }

    #[test]
    fn test_exact_two_terms_adjacency() {
        let (store, _, _, _) = fixture();

        // test1@0, test2@1 in tables/Alon only
        assert_eq!(exact(&store, "test1 test2").unwrap(), vec!["(tables, Alon)"]);
        // test2 and test1 exist but never in this order
        assert!(exact(&store, "test2 test1").unwrap().is_empty());
    }

    #[test]
    fn test_exact_single_term_matches_any_occurrence() {
        let (store, _, _, _) = fixture();

        let mut results = exact(&store, "test4").unwrap();
        results.sort();
        assert_eq!(results, vec!["(chairs, Alon)", "(tables, Dani)"]);
    }

    #[test]
    fn test_exact_missing_term_is_empty() {
        let (store, _, _, _) = fixture();

        assert!(exact(&store, "test2 test3 missing").unwrap().is_empty());
        assert!(exact(&store, "missing").unwrap().is_empty());
    }

    #[test]
    fn test_exact_repeated_term_fails_precondition() {
        let store = InMemoryStore::initialized();
        index_document(&store, "echo", "Sam", "hello hello").unwrap();

        // One distinct row for two words: short-circuits even though it occurs
        assert!(exact(&store, "hello hello").unwrap().is_empty());
    }

    #[test]
    fn test_exact_uses_true_ordinals_across_tag_chunks() {
        let store = InMemoryStore::initialized();
        index_document(&store, "page", "Ann", "first <br> second").unwrap();

        // The tag sits between the words, so they are not adjacent
        assert!(exact(&store, "first second").unwrap().is_empty());
    }

    #[test]
    fn test_exact_is_case_sensitive() {
        let store = InMemoryStore::initialized();
        index_document(&store, "guide", "Lee", "Rust Tooling").unwrap();

        assert_eq!(exact(&store, "Rust Tooling").unwrap().len(), 1);
        assert!(exact(&store, "rust tooling").unwrap().is_empty());
    }

    #[test]
    fn test_exact_document_listed_once() {
        let store = InMemoryStore::initialized();
        index_document(&store, "song", "Kim", "la1 la2 xx la1 la2").unwrap();

        assert_eq!(exact(&store, "la1 la2").unwrap(), vec!["(song, Kim)"]);
    }

    #[test]
    fn test_exact_empty_phrase_is_empty() {
        let (store, _, _, _) = fixture();
        assert!(exact(&store, "   ").unwrap().is_empty());
    }

    #[test]
    fn test_chain_matches_fails_fast_on_gap() {
        let doc = DocumentId::new();
        let mut second = DocumentPostings::new();
        second.insert(doc, ordinals(&[5]));
        let mut third = DocumentPostings::new();
        third.insert(doc, ordinals(&[7]));

        assert!(chain_matches(&doc, 4, &[&second]));
        assert!(!chain_matches(&doc, 4, &[&second, &third]));
        assert!(chain_matches(&doc, 4, &[]));
        assert!(!chain_matches(&doc, u32::MAX, &[&second]));
    }

    // ============================================================
    // HANDLER TESTS
    // ============================================================

    #[tokio::test]
    async fn test_search_handler_missing_phrase_message() {
        let store: Arc<dyn IndexStore> = Arc::new(InMemoryStore::initialized());

        let response = handle_search(Extension(store), Query(SearchParams::default())).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, MISSING_PHRASE_MESSAGE);
    }

    #[tokio::test]
    async fn test_exact_handler_returns_json_list() {
        let (store, _, _, _) = fixture();
        let store: Arc<dyn IndexStore> = Arc::new(store);

        let params = ExactParams {
            phrase: Some("test2 test3 test4".to_string()),
        };
        let response = handle_exact(Extension(store), Query(params)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Vec<String> = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body, vec!["(tables, Dani)"]);
    }

    #[tokio::test]
    async fn test_search_handler_storage_failure_is_503() {
        let store: Arc<dyn IndexStore> = Arc::new(InMemoryStore::new());

        let params = SearchParams {
            phrase: Some("test1".to_string()),
            case: None,
        };
        let response = handle_search(Extension(store), Query(params)).await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_index_document_handler_makes_content_searchable() {
        let store: Arc<dyn IndexStore> = Arc::new(InMemoryStore::initialized());

        let request = IndexDocumentRequest {
            title: "tables".to_string(),
            author: "Alon".to_string(),
            content: "test1 test2".to_string(),
        };
        let response = handle_index_document(Extension(store.clone()), Query(request)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: IndexDocumentResponse = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body.message, "Document successfully indexed");

        let results = search(store.as_ref(), "test2", true).unwrap();
        assert_eq!(results.len(), 1);
        let documents = store
            .get_documents_by_ids(&HashSet::from([body.document_id]))
            .unwrap();
        assert_eq!(documents[0].title, "tables");
    }

    #[tokio::test]
    async fn test_index_document_json_handler_makes_content_searchable() {
        let store: Arc<dyn IndexStore> = Arc::new(InMemoryStore::initialized());

        let request: IndexDocumentRequest = serde_json::from_str(
            r#"{"title": "tables", "author": "Dani", "content": "test3 test2 test3 test4"}"#,
        )
        .unwrap();
        let response = handle_index_document_json(Extension(store.clone()), Json(request)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: IndexDocumentResponse = serde_json::from_str(&body_text(response).await).unwrap();
        let documents = store
            .get_documents_by_ids(&HashSet::from([body.document_id]))
            .unwrap();
        assert_eq!(documents[0].author, "Dani");
        assert_eq!(
            exact(store.as_ref(), "test2 test3 test4").unwrap(),
            vec!["(tables, Dani)"]
        );
    }

    #[tokio::test]
    async fn test_index_document_handler_without_schema_is_503() {
        let store: Arc<dyn IndexStore> = Arc::new(InMemoryStore::new());

        let request = IndexDocumentRequest {
            title: "tables".to_string(),
            author: "Alon".to_string(),
            content: "test1 test2".to_string(),
        };
        let response = handle_index_document_json(Extension(store), Json(request)).await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_search_json_handler_returns_results() {
        let (store, _, _, _) = fixture();
        let store: Arc<dyn IndexStore> = Arc::new(store);

        let params: SearchParams = serde_json::from_str(r#"{"phrase": "test1 test4"}"#).unwrap();
        let response = handle_search_json(Extension(store), Json(params)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: SearchResults = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body.len(), 3);
        assert_eq!(body[&document_key("chairs", "Alon")].score, 2);
    }

    #[tokio::test]
    async fn test_search_json_handler_accepts_boolean_case() {
        let store = InMemoryStore::initialized();
        index_document(&store, "guide", "Lee", "Rust tooling").unwrap();
        let store: Arc<dyn IndexStore> = Arc::new(store);

        // Exact-case table holds "Rust"; the lowercased one only "rust"
        let sensitive: SearchParams =
            serde_json::from_str(r#"{"phrase": "Rust", "case": true}"#).unwrap();
        let response = handle_search_json(Extension(store.clone()), Json(sensitive)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: SearchResults = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body.len(), 1);

        let insensitive: SearchParams =
            serde_json::from_str(r#"{"phrase": "Rust", "case": false}"#).unwrap();
        let response = handle_search_json(Extension(store), Json(insensitive)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: SearchResults = serde_json::from_str(&body_text(response).await).unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_exact_json_handler_missing_phrase_message() {
        let (store, _, _, _) = fixture();
        let store: Arc<dyn IndexStore> = Arc::new(store);

        let params: ExactParams = serde_json::from_str("{}").unwrap();
        let response = handle_exact_json(Extension(store), Json(params)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, MISSING_PHRASE_MESSAGE);
    }

    #[test]
    fn test_case_flag_parsing() {
        let params = |case: Option<&str>| SearchParams {
            phrase: None,
            case: case.map(|value| CaseFlag::Text(value.to_string())),
        };

        assert!(!params(None).case_sensitive());
        assert!(!params(Some("")).case_sensitive());
        assert!(!params(Some("false")).case_sensitive());
        assert!(!params(Some("0")).case_sensitive());
        assert!(params(Some("true")).case_sensitive());
        assert!(params(Some("1")).case_sensitive());
        assert!(params(Some("yes")).case_sensitive());
    }

    #[test]
    fn test_case_flag_accepts_json_scalars() {
        let parse = |json: &str| serde_json::from_str::<SearchParams>(json).unwrap();

        assert!(parse(r#"{"phrase": "test1", "case": true}"#).case_sensitive());
        assert!(!parse(r#"{"phrase": "test1", "case": false}"#).case_sensitive());
        assert!(parse(r#"{"case": 1}"#).case_sensitive());
        assert!(!parse(r#"{"case": 0}"#).case_sensitive());
        assert!(!parse(r#"{"case": "no"}"#).case_sensitive());
        assert!(!parse(r#"{"case": null}"#).case_sensitive());
    }

    #[test]
    fn test_case_flag_from_query_string() {
        let parse = |query: &str| {
            let uri: Uri = format!("http://localhost/search?{}", query).parse().unwrap();
            Query::<SearchParams>::try_from_uri(&uri).unwrap().0
        };

        assert!(parse("phrase=test1&case=true").case_sensitive());
        assert!(!parse("phrase=test1&case=false").case_sensitive());
        assert!(!parse("phrase=test1").case_sensitive());
    }
}
