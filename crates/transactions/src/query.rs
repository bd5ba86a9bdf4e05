//! Type filtering, free-text search and date-label grouping for the operations list.

use crate::models::{TransactionGroup, TransactionRecord, TypeFilter};
use std::collections::HashMap;

pub struct QueryEngine;

impl QueryEngine {
    /// Filters `records` by kind, then by `search_query`, and groups what is left by
    /// `date_label`.
    ///
    /// Groups appear in the order their label is first seen and records keep their
    /// input order. Nothing is sorted: the input is expected newest-first already.
    /// A blank query matches everything.
    pub fn filter_and_group(
        records: &[TransactionRecord],
        filter: TypeFilter,
        search_query: &str,
    ) -> Vec<TransactionGroup> {
        let search = Search::new(search_query);

        let mut groups: Vec<TransactionGroup> = Vec::new();
        let mut group_index: HashMap<&str, usize> = HashMap::new();

        let matching = records
            .iter()
            .filter(|r| filter.admits(r.kind))
            .filter(|r| search.matches(r));

        for record in matching {
            match group_index.get(record.date_label.as_str()).copied() {
                Some(index) => groups[index].transactions.push(record.clone()),
                None => {
                    group_index.insert(record.date_label.as_str(), groups.len());
                    groups.push(TransactionGroup {
                        date_label: record.date_label.clone(),
                        transactions: vec![record.clone()],
                    });
                }
            }
        }

        groups
    }
}

// Case-folded needle; None when the query is blank.
struct Search(Option<String>);

// Folds one char at a time so context rules like the Greek final sigma
// never make the needle and the haystack disagree.
fn fold_case(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}

impl Search {
    fn new(query: &str) -> Self {
        if query.trim().is_empty() {
            Search(None)
        } else {
            Search(Some(fold_case(query)))
        }
    }

    fn matches(&self, record: &TransactionRecord) -> bool {
        match &self.0 {
            None => true,
            Some(needle) => {
                fold_case(&record.title).contains(needle.as_str())
                    || fold_case(&record.description).contains(needle.as_str())
            }
        }
    }
}
