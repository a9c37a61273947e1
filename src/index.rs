//! Inverted index mapping name tokens to record identifiers.
//!
//! Built once from a full snapshot of records, then read-only. The serde
//! representation is a plain map from token to an ascending array of
//! integer ids, the interchange form expected at process boundaries.

use crate::tokenizer::tokenize_record;
use crate::types::{Record, RecordId};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Token -> ascending, duplicate-free list of record identifiers.
///
/// The invariant maintained by [`InvertedIndex::build`]: an id appears under
/// token `t` iff `t` is produced by tokenizing at least one of that record's
/// name fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvertedIndex {
    postings: FxHashMap<String, Vec<RecordId>>,
}

impl InvertedIndex {
    /// Build the index from a snapshot of records.
    ///
    /// O(total tokens across all records). Fully determined by the input
    /// set: postings are sorted ascending, and per-record set semantics in
    /// the tokenizer guarantee no duplicate ids even when a token recurs
    /// across a record's name fields.
    pub fn build(records: &[Record]) -> Self {
        let mut postings: FxHashMap<String, Vec<RecordId>> = FxHashMap::default();

        for record in records {
            for token in tokenize_record(record) {
                postings.entry(token).or_default().push(record.id);
            }
        }

        for ids in postings.values_mut() {
            ids.sort_unstable();
            ids.dedup();
        }

        log::debug!(
            "built inverted index: {} tokens over {} records",
            postings.len(),
            records.len()
        );

        Self { postings }
    }

    /// The posting list for a token, if the token is indexed.
    pub fn postings(&self, token: &str) -> Option<&[RecordId]> {
        self.postings.get(token).map(Vec::as_slice)
    }

    /// Ids of records whose token set contains *every* given token.
    ///
    /// Logical AND across tokens: a token absent from the index contributes
    /// an empty set, which short-circuits the whole intersection to empty.
    /// An empty token list also yields an empty result. Output is ascending
    /// by id.
    pub fn matching_ids(&self, tokens: &[&str]) -> Vec<RecordId> {
        if tokens.is_empty() {
            return Vec::new();
        }

        let mut lists: Vec<&[RecordId]> = Vec::with_capacity(tokens.len());
        for token in tokens {
            match self.postings(token) {
                Some(ids) => lists.push(ids),
                None => return Vec::new(),
            }
        }

        // Intersect starting from the shortest posting list; the rest are
        // probed by binary search since postings are sorted.
        lists.sort_by_key(|ids| ids.len());
        let Some((smallest, rest)) = lists.split_first() else {
            return Vec::new();
        };

        smallest
            .iter()
            .copied()
            .filter(|id| rest.iter().all(|ids| ids.binary_search(id).is_ok()))
            .collect()
    }

    /// Serialize to the JSON interchange form: a map from token to an
    /// ascending array of integer ids.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Load from the JSON interchange form.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Number of distinct tokens in the index.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    /// Whether the index holds no tokens at all.
    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize_record;

    fn fixture() -> Vec<Record> {
        vec![
            Record::new(1, "Washington", -77.0369, 38.9072)
                .with_alternate_names(["Washington DC", "The District"]),
            Record::new(2, "Washington", -120.5015, 47.5001),
            Record::new(3, "Paris", 2.3522, 48.8566).with_ascii_name("Paris"),
        ]
    }

    #[test]
    fn test_build_round_trip_completeness() {
        let records = fixture();
        let index = InvertedIndex::build(&records);

        // Every token of every record lists that record's id.
        for record in &records {
            for token in tokenize_record(record) {
                let ids = index.postings(&token).unwrap();
                assert!(
                    ids.contains(&record.id),
                    "token {token:?} missing id {}",
                    record.id
                );
            }
        }

        // Conversely, every listed id derives the token from some name field.
        for (token, ids) in &index.postings {
            for id in ids {
                let record = records.iter().find(|r| r.id == *id).unwrap();
                assert!(tokenize_record(record).contains(token));
            }
        }
    }

    #[test]
    fn test_postings_are_sorted_and_unique() {
        let index = InvertedIndex::build(&fixture());
        let ids = index.postings("washington").unwrap();
        assert_eq!(ids, &[1, 2]);
    }

    #[test]
    fn test_matching_ids_intersection() {
        let index = InvertedIndex::build(&fixture());

        assert_eq!(index.matching_ids(&["washington"]), vec![1, 2]);
        assert_eq!(index.matching_ids(&["washington", "dc"]), vec![1]);
        assert_eq!(index.matching_ids(&["paris"]), vec![3]);
    }

    #[test]
    fn test_matching_ids_absent_token_short_circuits() {
        let index = InvertedIndex::build(&fixture());
        assert!(index.matching_ids(&["washington", "meow"]).is_empty());
        assert!(index.matching_ids(&["meow"]).is_empty());
    }

    #[test]
    fn test_matching_ids_empty_token_list() {
        let index = InvertedIndex::build(&fixture());
        assert!(index.matching_ids(&[]).is_empty());
    }

    #[test]
    fn test_record_with_no_tokens_is_absent() {
        let records = vec![Record::new(7, "", 0.0, 0.0)];
        let index = InvertedIndex::build(&records);
        assert!(index.is_empty());
    }

    #[test]
    fn test_serde_interchange_shape() {
        let index = InvertedIndex::build(&fixture());
        let json = serde_json::to_value(&index).unwrap();

        // Plain map of token -> array of ids.
        assert_eq!(json["paris"], serde_json::json!([3]));
        assert_eq!(json["washington"], serde_json::json!([1, 2]));

        let restored: InvertedIndex = serde_json::from_value(json).unwrap();
        assert_eq!(restored, index);
    }
}
