//! Case folding applied uniformly to keywords and searched text.

/// How characters are normalized before they enter or drive the automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum CaseFolding {
    /// Characters are compared as-is.
    #[default]
    Sensitive,

    /// Characters are mapped to lowercase.
    ///
    /// A character whose lowercase form expands to several characters
    /// (such as `'İ'`) is left unchanged, so folding never changes the
    /// character count of a string and offsets stay valid in the original.
    Lowercase,
}

impl CaseFolding {
    /// Returns the policy for the given case-insensitivity flag.
    pub fn from_case_insensitive(case_insensitive: bool) -> Self {
        if case_insensitive {
            CaseFolding::Lowercase
        } else {
            CaseFolding::Sensitive
        }
    }

    /// Whether this policy ignores case.
    pub fn is_case_insensitive(self) -> bool {
        self == CaseFolding::Lowercase
    }

    /// Folds a single character.
    #[inline]
    pub fn fold_char(self, ch: char) -> char {
        match self {
            CaseFolding::Sensitive => ch,
            CaseFolding::Lowercase => {
                if ch.is_ascii() {
                    return ch.to_ascii_lowercase();
                }
                let mut lower = ch.to_lowercase();
                match (lower.next(), lower.next()) {
                    (Some(folded), None) => folded,
                    _ => ch,
                }
            }
        }
    }

    /// Folds every character of `text`.
    pub fn fold(self, text: &str) -> String {
        text.chars().map(|ch| self.fold_char(ch)).collect()
    }
}
