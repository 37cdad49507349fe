//! Dot-notation key paths
//!
//! Provides [`KeyPath`], a validated borrowed view over a caller-supplied
//! path string, and [`Resolution`], the policy that decides how that string
//! maps onto a document tree.

use crate::error::PathError;
use std::fmt::{self, Display, Formatter};

/// Segment separator for dot-notation paths
pub const SEPARATOR: char = '.';

/// How a path string is matched against a target object
///
/// The same string can address two different locations when the root holds
/// a key that itself contains dots. Each operation picks one policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// Try the whole string as a root-level key, then walk split segments.
    ///
    /// Used by get, exists, remove, list and update.
    LiteralFirstThenSplit,
    /// Always walk split segments.
    ///
    /// Used by add and the destination side of rename.
    SplitOnly,
}

impl Resolution {
    /// Whether the root-level literal match is attempted
    #[inline]
    #[must_use]
    pub fn tries_literal(self) -> bool {
        matches!(self, Self::LiteralFirstThenSplit)
    }
}

/// Validated dot-notation path
///
/// Never pre-split: segments are derived on demand so the literal form stays
/// available for [`Resolution::LiteralFirstThenSplit`].
///
/// # Examples
/// - `dashboard.title` → segments `["dashboard", "title"]`
/// - `api.key.v1` → may also name a single root key `"api.key.v1"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPath<'a> {
    raw: &'a str,
}

impl<'a> KeyPath<'a> {
    /// Validate a raw path string
    ///
    /// # Errors
    /// Returns [`PathError::InvalidPath`] for the empty string.
    pub fn parse(raw: &'a str) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Err(PathError::InvalidPath {
                reason: "key path cannot be empty".to_string(),
            });
        }
        Ok(Self { raw })
    }

    /// Original path string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    /// Split segments, root to leaf
    ///
    /// Empty segments (`a..b`, trailing dot) are kept: `""` is a legal key.
    #[inline]
    pub fn segments(&self) -> impl DoubleEndedIterator<Item = &'a str> + 'a {
        self.raw.split(SEPARATOR)
    }

    /// Number of split segments
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.raw.matches(SEPARATOR).count() + 1
    }

    /// Whether the path has a single segment
    #[inline]
    #[must_use]
    pub fn is_single(&self) -> bool {
        !self.raw.contains(SEPARATOR)
    }

    /// Split into parent segments and the final key
    #[must_use]
    pub fn split_last(&self) -> (Option<&'a str>, &'a str) {
        match self.raw.rsplit_once(SEPARATOR) {
            Some((parent, last)) => (Some(parent), last),
            None => (None, self.raw),
        }
    }

    /// First `n` segments joined back together
    #[must_use]
    pub fn prefix(&self, n: usize) -> &'a str {
        if n == 0 {
            return "";
        }
        match self.raw.match_indices(SEPARATOR).nth(n - 1) {
            Some((idx, _)) => &self.raw[..idx],
            None => self.raw,
        }
    }
}

impl Display for KeyPath<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw)
    }
}

impl AsRef<str> for KeyPath<'_> {
    fn as_ref(&self) -> &str {
        self.raw
    }
}

impl<'a> TryFrom<&'a str> for KeyPath<'a> {
    type Error = PathError;

    fn try_from(raw: &'a str) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}
