//! Class label tables.

use std::sync::Arc;

/// Ordered class names addressed by class id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LabelTable {
    names: Vec<Arc<str>>,
}

impl LabelTable {
    /// Creates a table from ordered names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names.into_iter().map(|s| Arc::from(s.as_ref())).collect(),
        }
    }

    /// Parses a labels file: one label per whitespace-separated token.
    pub fn parse(text: &str) -> Self {
        Self::new(text.split_whitespace())
    }

    /// Returns the number of labels.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true when the table holds no labels.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the label for `class_id`.
    pub fn get(&self, class_id: usize) -> Option<&str> {
        self.names.get(class_id).map(|s| s.as_ref())
    }

    pub(crate) fn shared(&self, class_id: usize) -> Option<Arc<str>> {
        self.names.get(class_id).cloned()
    }
}
