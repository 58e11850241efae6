//! Builder pattern for configuring a [`KeywordTree`].
//!
//! The `KeywordTreeBuilder` provides a fluent API for choosing case folding
//! and transition layout before any keyword is inserted.

use super::case_fold::CaseFolding;
use super::KeywordTree;

/// Builder for constructing a [`KeywordTree`] with a fluent API.
///
/// # Example
///
/// ```rust
/// use libahocorasick::automaton::KeywordTreeBuilder;
///
/// let tree = KeywordTreeBuilder::new()
///     .case_insensitive(true)
///     .keywords(["bla", "blue", "blISs"])
///     .build_finalized();
///
/// assert_eq!(tree.search("BLISS").unwrap().map(|m| m.as_tuple()), Some(("blISs", 0)));
/// ```
#[derive(Debug, Clone)]
pub struct KeywordTreeBuilder {
    folding: CaseFolding,
    shortcuts: bool,
    keywords: Vec<String>,
}

impl KeywordTreeBuilder {
    /// Create a new builder: case sensitive, with shortcut transitions.
    pub fn new() -> Self {
        KeywordTreeBuilder {
            folding: CaseFolding::Sensitive,
            shortcuts: true,
            keywords: Vec::new(),
        }
    }

    /// Ignore case in keywords and searched text.
    pub fn case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.folding = CaseFolding::from_case_insensitive(case_insensitive);
        self
    }

    /// Set the case folding policy directly.
    pub fn case_folding(mut self, folding: CaseFolding) -> Self {
        self.folding = folding;
        self
    }

    /// Copy transitions from failure states into each state on finalize.
    ///
    /// Enabled by default. With shortcuts, a search step is a single table
    /// lookup; without, the search walks failure links explicitly and the
    /// tables stay as small as the trie itself. Results are identical.
    pub fn shortcuts(mut self, shortcuts: bool) -> Self {
        self.shortcuts = shortcuts;
        self
    }

    /// Queue keywords to insert when the tree is built.
    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    /// Build an unfinalized tree holding the queued keywords.
    pub fn build(self) -> KeywordTree {
        let mut tree = KeywordTree::with_options(self.folding, self.shortcuts);
        for keyword in &self.keywords {
            tree.insert(keyword);
        }
        tree
    }

    /// Build a tree holding the queued keywords and finalize it.
    pub fn build_finalized(self) -> KeywordTree {
        let mut tree = self.build();
        tree.finalize_links();
        tree
    }
}

impl Default for KeywordTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let tree = KeywordTreeBuilder::new().build();
        assert!(!tree.is_case_insensitive());
        assert!(tree.has_shortcuts());
        assert!(!tree.is_finalized());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_builder_options() {
        let tree = KeywordTreeBuilder::default()
            .case_insensitive(true)
            .shortcuts(false)
            .keywords(vec!["Peter".to_string()])
            .keywords(["horst"])
            .build();
        assert!(tree.is_case_insensitive());
        assert!(!tree.has_shortcuts());
        assert_eq!(tree.keyword_count(), 2);
    }

    #[test]
    fn test_build_finalized() {
        let tree = KeywordTree::builder()
            .case_folding(CaseFolding::Lowercase)
            .keywords(["frodo"])
            .build_finalized();
        assert!(tree.is_finalized());
        assert_eq!(tree.search("FRODO").unwrap().map(|m| m.start()), Some(0));
    }
}
