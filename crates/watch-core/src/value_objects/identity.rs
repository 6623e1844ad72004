//! Identity value objects - user IDs, page IDs, and page identities
//!
//! A page is addressed two ways: by its stable row ID (`PageId`) and by its
//! `(namespace, title)` pair (`PageIdentity`). Watch records key on the
//! identity, not the ID, so a watch can outlive the page it points at.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(i64);

impl UserId {
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Numeric page identifier (the page table row ID)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PageId(i64);

impl PageId {
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PageId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Page namespace number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Namespace(i32);

impl Namespace {
    /// The main content namespace
    pub const MAIN: Namespace = Namespace(0);

    /// The category namespace
    pub const CATEGORY: Namespace = Namespace(14);

    #[inline]
    pub const fn new(ns: i32) -> Self {
        Self(ns)
    }

    #[inline]
    pub const fn into_inner(self) -> i32 {
        self.0
    }

    /// Check if this is the main content namespace
    #[inline]
    pub const fn is_main(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for Namespace {
    fn from(ns: i32) -> Self {
        Self(ns)
    }
}

/// A page addressed by `(namespace, title)`, with the title in DB-key form
/// (underscores instead of spaces, e.g. `Main_Page`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageIdentity {
    pub namespace: Namespace,
    pub title: String,
}

impl PageIdentity {
    pub fn new(namespace: Namespace, title: impl Into<String>) -> Self {
        Self {
            namespace,
            title: title.into(),
        }
    }

    /// Create an identity in the main namespace
    pub fn main(title: impl Into<String>) -> Self {
        Self::new(Namespace::MAIN, title)
    }
}

impl fmt::Display for PageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_main() {
        assert!(Namespace::MAIN.is_main());
        assert!(!Namespace::CATEGORY.is_main());
        assert_eq!(Namespace::new(0), Namespace::MAIN);
    }

    #[test]
    fn test_page_identity_display() {
        let page = PageIdentity::main("Main_Page");
        assert_eq!(page.to_string(), "0:Main_Page");
    }

    #[test]
    fn test_identity_equality() {
        let a = PageIdentity::new(Namespace::MAIN, "A");
        let b = PageIdentity::new(Namespace::MAIN, "A");
        let c = PageIdentity::new(Namespace::CATEGORY, "A");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
