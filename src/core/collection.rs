//! Bounds-checked mutation over ordered lists and key-based mutation over
//! string-keyed maps.
//!
//! Shared by todo items, plan items and plan narratives. Failing calls leave
//! the collection untouched.

use crate::core::error::VbriefError;
use std::collections::BTreeMap;

pub fn push<T>(items: &mut Vec<T>, item: T) {
    items.push(item);
}

fn check_index(index: usize, len: usize) -> Result<(), VbriefError> {
    if index >= len {
        return Err(VbriefError::InvalidIndex { index, len });
    }
    Ok(())
}

/// Removes the element at `index`, shifting later elements left.
pub fn remove_at<T>(items: &mut Vec<T>, index: usize) -> Result<T, VbriefError> {
    check_index(index, items.len())?;
    Ok(items.remove(index))
}

pub fn update_at<T, F>(items: &mut [T], index: usize, updates: F) -> Result<(), VbriefError>
where
    F: FnOnce(&mut T),
{
    check_index(index, items.len())?;
    updates(&mut items[index]);
    Ok(())
}

pub fn find<T, P>(items: &[T], mut predicate: P) -> Option<&T>
where
    P: FnMut(&T) -> bool,
{
    items.iter().find(|item| predicate(item))
}

pub fn find_mut<T, P>(items: &mut [T], mut predicate: P) -> Option<&mut T>
where
    P: FnMut(&T) -> bool,
{
    items.iter_mut().find(|item| predicate(item))
}

/// Inserts or overwrites; returns the previous value.
pub fn insert_key<V>(map: &mut BTreeMap<String, V>, key: String, value: V) -> Option<V> {
    map.insert(key, value)
}

/// A missing key is not an error.
pub fn remove_key<V>(map: &mut BTreeMap<String, V>, key: &str) -> Option<V> {
    map.remove(key)
}

/// Unlike `remove_key`, a missing key fails with `KeyNotFound`.
pub fn update_key<V, F>(
    map: &mut BTreeMap<String, V>,
    key: &str,
    updates: F,
) -> Result<(), VbriefError>
where
    F: FnOnce(&mut V),
{
    let value = map
        .get_mut(key)
        .ok_or_else(|| VbriefError::KeyNotFound(key.to_string()))?;
    updates(value);
    Ok(())
}
