//! Opaque entity identifiers
//!
//! A key is an identifier when it has the canonical 36-character UUID text
//! shape: hex digits in 8-4-4-4-12 hyphen-separated groups, any case.

use uuid::Uuid;

/// Length of a hyphenated UUID
pub const IDENTIFIER_LEN: usize = 36;

/// Check whether a map key is an entity identifier
///
/// Braced, URN and unhyphenated UUID forms are rejected.
#[inline]
#[must_use]
pub fn is_identifier(key: &str) -> bool {
    key.len() == IDENTIFIER_LEN && Uuid::try_parse(key).is_ok()
}

/// Check whether every key of a group is an identifier
///
/// An empty group never qualifies.
#[must_use]
pub fn all_identifiers<'a, I>(keys: I) -> bool
where
    I: IntoIterator<Item = &'a String>,
{
    let mut any = false;
    for key in keys {
        if !is_identifier(key) {
            return false;
        }
        any = true;
    }
    any
}
