//! Domain primitive types used across the elc workspace.

use std::fmt;

/// The active dependency mode used to filter start cascades.
///
/// An empty mode disables the cascade entirely: only explicitly requested
/// services are started.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Mode(Option<String>);

impl Mode {
    /// Creates a mode from a tag; an empty or blank tag yields the unset mode.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if tag.trim().is_empty() {
            Self(None)
        } else {
            Self(Some(tag))
        }
    }

    /// The unset mode.
    #[must_use]
    pub const fn unset() -> Self {
        Self(None)
    }

    /// Returns `true` when a mode tag is set and cascades are enabled.
    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.0.is_some()
    }

    /// Returns the tag, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Returns `true` if an edge tagged with `tags` participates under this mode.
    ///
    /// The unset mode matches nothing, and neither does an empty tag set.
    #[must_use]
    pub fn matches<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        self.0
            .as_deref()
            .is_some_and(|mode| tags.iter().any(|t| t.as_ref() == mode))
    }
}

impl From<&str> for Mode {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<Option<String>> for Mode {
    fn from(tag: Option<String>) -> Self {
        tag.map_or_else(Self::unset, Self::new)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_deref().unwrap_or(""))
    }
}
