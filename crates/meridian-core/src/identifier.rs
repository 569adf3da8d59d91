//! Identifier management using string interning for efficient storage and comparison.
//!
//! This module provides the [`Id`] type used to name diagram participants.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for participant identifiers.
///
/// Guarded by a `Mutex` so identifiers can be created from any thread.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

/// Interned identifier for a diagram participant.
///
/// Two `Id`s created from the same string are equal and share storage,
/// making comparison and hashing cheap symbol operations.
///
/// # Examples
///
/// ```
/// use meridian_core::identifier::Id;
///
/// let server = Id::new("server");
/// let also_server = Id::new("server");
/// assert_eq!(server, also_server);
/// assert_eq!(server, "server");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from a string, interning it if necessary.
    pub fn new(name: &str) -> Self {
        let mut interner = INTERNER
            .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
            .lock()
            .expect("Failed to acquire interner lock");
        let symbol = interner.get_or_intern(name);
        Self(symbol)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = INTERNER
            .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
            .lock()
            .expect("Failed to acquire interner lock");
        let str_value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        write!(f, "{}", str_value)
    }
}

impl From<&str> for Id {
    /// Creates an `Id` from a string slice; convenience for [`Id::new`].
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`.
    fn eq(&self, other: &str) -> bool {
        let interner = INTERNER
            .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
            .lock()
            .expect("Failed to acquire interner lock");
        let self_str = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        self_str == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_interns() {
        let id1 = Id::new("user");
        let id2 = Id::new("user");
        let id3 = Id::new("server");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "user");
    }

    #[test]
    fn test_display() {
        let id = Id::new("database");
        assert_eq!(format!("{}", id), "database");
    }

    #[test]
    fn test_from_str_slice() {
        let id: Id = "gateway".into();
        assert_eq!(id, Id::new("gateway"));
    }

    #[test]
    fn test_hash_and_eq() {
        use std::collections::HashMap;

        let id1 = Id::new("key1");
        let id2 = Id::new("key1");
        let id3 = Id::new("key2");

        let mut map = HashMap::new();
        map.insert(id1, "value1");
        map.insert(id3, "value2");

        assert_eq!(map.get(&id2), Some(&"value1"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_copy() {
        let id1 = Id::new("copy_test");
        let id2 = id1;
        assert_eq!(id1, id2);
        assert_eq!(id1, "copy_test");
    }
}
