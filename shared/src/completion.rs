//! Per-user completion log
//!
//! Every time a user marks an exercise or meal as done, one key of the form
//! `{YYYY-MM-DD}-{item-identifier}` is appended. The log is a set: recording
//! the same key twice is a no-op and order carries no meaning.

use crate::plan::PlanItem;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// ISO date format used in completion keys
pub const KEY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Build the completion key for an item on a date
pub fn completion_key(date: NaiveDate, item: &PlanItem) -> String {
    identifier_key(date, &item.identifier())
}

/// Build the completion key from a raw item identifier
pub fn identifier_key(date: NaiveDate, identifier: &str) -> String {
    format!("{}-{}", date.format(KEY_DATE_FORMAT), identifier)
}

/// De-duplicated set of completion keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionLog {
    keys: BTreeSet<String>,
}

impl CompletionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completion key; returns false if it was already present
    pub fn record(&mut self, key: impl Into<String>) -> bool {
        self.keys.insert(key.into())
    }

    /// Record an item as completed on a date
    pub fn record_item(&mut self, date: NaiveDate, item: &PlanItem) -> bool {
        self.record(completion_key(date, item))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn is_item_completed(&self, date: NaiveDate, item: &PlanItem) -> bool {
        self.contains(&completion_key(date, item))
    }

    /// Number of `items` marked done on `date`
    pub fn completed_items(&self, date: NaiveDate, items: &[PlanItem]) -> usize {
        items
            .iter()
            .filter(|item| self.is_item_completed(date, item))
            .count()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for CompletionLog {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(Into::into).collect(),
        }
    }
}
