//! Key/value metadata attached to an image.
//!
//! Values are stored as strings; numeric fields read from files are expected
//! to be printed to text before insertion. Clones and [`Image::cast`](crate::Image::cast)
//! carry the dictionary over; [`Image::copy_information`](crate::Image::copy_information)
//! copies geometry only and leaves it untouched.
//!
//! # Usage
//!
//! ```rust
//! use mdimage_core::MetaDataDictionary;
//!
//! let mut dict = MetaDataDictionary::new();
//! dict.set("0010|0010", "Doe^Jane");
//! assert_eq!(dict.get("0010|0010"), Some("Doe^Jane"));
//! assert!(dict.remove("0010|0010"));
//! assert!(!dict.remove("0010|0010"));
//! ```

use std::collections::BTreeMap;

/// String-keyed, string-valued metadata dictionary.
///
/// Keys are unique. Iteration order is the key order, which keeps
/// [`keys`](Self::keys) deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaDataDictionary {
    entries: BTreeMap<String, String>,
}

impl MetaDataDictionary {
    /// Creates an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// All keys.
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Whether `key` is present.
    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Value for `key`.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Inserts or replaces an entry, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Removes an entry. Returns `true` if the key was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
