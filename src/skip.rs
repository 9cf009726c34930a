//! Skip-Set: property keys that merges and promotion never touch.

use hashbrown::HashSet;

use crate::model::schema::{BOOKKEEPING_KEYS, DEFAULT_ELEMENT_ALIASES, IDENTITY_KEYS};

/// Immutable set of keys excluded from every merge and promotion.
///
/// Built once per run and passed by reference into the merge engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipSet {
    keys: HashSet<String>,
    element_aliases: Vec<String>,
}

impl SkipSet {
    /// Identity and bookkeeping keys plus the given child-relation aliases.
    pub fn new<I, S>(element_aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let element_aliases: Vec<String> = element_aliases.into_iter().map(Into::into).collect();
        let keys = IDENTITY_KEYS
            .iter()
            .chain(BOOKKEEPING_KEYS.iter())
            .map(|k| (*k).to_owned())
            .chain(element_aliases.iter().cloned())
            .collect();
        Self { keys, element_aliases }
    }

    /// Exactly the given keys, with no child-relation aliases.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            element_aliases: Vec::new(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Keys that hold child relations, in traversal order.
    pub fn element_aliases(&self) -> &[String] {
        &self.element_aliases
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for SkipSet {
    fn default() -> Self {
        Self::new(DEFAULT_ELEMENT_ALIASES)
    }
}
