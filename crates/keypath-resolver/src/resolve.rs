//! Path resolution and structural edits over an in-memory document
//!
//! All functions take the root object of a document and a [`KeyPath`].
//! Lookup-style functions follow [`Resolution::LiteralFirstThenSplit`];
//! creation follows [`Resolution::SplitOnly`]. The literal match is only
//! ever attempted against the root object, never at nested levels.

use crate::error::PathError;
use crate::path::{KeyPath, Resolution, SEPARATOR};
use serde_json::{Map, Value};

/// JSON object as stored in a document
pub type Object = Map<String, Value>;

/// Resolve a path to its value
///
/// # Errors
/// [`PathError::KeyNotFound`] if a segment is missing or a non-object value
/// sits on the way. The error always names the full path.
pub fn resolve<'d>(
    root: &'d Object,
    path: &KeyPath<'_>,
    policy: Resolution,
) -> Result<&'d Value, PathError> {
    if policy.tries_literal() {
        if let Some(value) = root.get(path.as_str()) {
            return Ok(value);
        }
    }
    walk(root, path.segments()).ok_or_else(|| PathError::key_not_found(path.as_str()))
}

/// Resolve a path to a mutable reference
///
/// # Errors
/// Same as [`resolve`].
pub fn resolve_mut<'d>(
    root: &'d mut Object,
    path: &KeyPath<'_>,
    policy: Resolution,
) -> Result<&'d mut Value, PathError> {
    if policy.tries_literal() && root.contains_key(path.as_str()) {
        return root
            .get_mut(path.as_str())
            .ok_or_else(|| PathError::key_not_found(path.as_str()));
    }
    walk_mut(root, path.segments()).ok_or_else(|| PathError::key_not_found(path.as_str()))
}

/// Check whether a path resolves, literal-first
#[must_use]
pub fn exists(root: &Object, path: &KeyPath<'_>) -> bool {
    resolve(root, path, Resolution::LiteralFirstThenSplit).is_ok()
}

/// Immediate child keys of the object at `path`, in document order
///
/// `None` lists the root.
///
/// # Errors
/// [`PathError::KeyNotFound`] if the path does not resolve,
/// [`PathError::NotObject`] if it resolves to an array or scalar.
pub fn list_keys(root: &Object, path: Option<&KeyPath<'_>>) -> Result<Vec<String>, PathError> {
    let Some(path) = path else {
        return Ok(root.keys().cloned().collect());
    };
    let target = resolve(root, path, Resolution::LiteralFirstThenSplit)?;
    target
        .as_object()
        .map(|map| map.keys().cloned().collect())
        .ok_or_else(|| PathError::not_object(Some(path.as_str())))
}

/// Walk to the parent object of `path`, creating missing intermediate objects
///
/// Returns the parent and the final key. Never uses the literal shortcut.
/// The tree is left untouched when a conflict is found.
///
/// # Errors
/// [`PathError::PathConflict`] if an intermediate segment holds a non-object.
pub fn create_parent<'d, 'p>(
    root: &'d mut Object,
    path: &KeyPath<'p>,
) -> Result<(&'d mut Object, &'p str), PathError> {
    let (parent, last) = path.split_last();
    let Some(parent) = parent else {
        return Ok((root, last));
    };

    if let Some(depth) = conflict_depth(root, parent) {
        return Err(PathError::path_conflict(path.as_str(), path.prefix(depth)));
    }

    let mut current = root;
    for (i, segment) in parent.split(SEPARATOR).enumerate() {
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        current = match slot {
            Value::Object(map) => map,
            _ => return Err(PathError::path_conflict(path.as_str(), path.prefix(i + 1))),
        };
    }
    Ok((current, last))
}

/// Insert `value` at `path`, creating intermediate objects
///
/// Returns the value previously stored under the final key, if any.
///
/// # Errors
/// [`PathError::PathConflict`] as in [`create_parent`].
pub fn insert(root: &mut Object, path: &KeyPath<'_>, value: Value) -> Result<Option<Value>, PathError> {
    let (parent, last) = create_parent(root, path)?;
    Ok(parent.insert(last.to_string(), value))
}

/// Overwrite the value at the literal-first resolved location
///
/// Returns the previous value.
///
/// # Errors
/// [`PathError::KeyNotFound`] if the path does not resolve.
pub fn replace(root: &mut Object, path: &KeyPath<'_>, value: Value) -> Result<Value, PathError> {
    let slot = resolve_mut(root, path, Resolution::LiteralFirstThenSplit)?;
    Ok(std::mem::replace(slot, value))
}

/// Remove the entry at `path` and return its value
///
/// Tries the whole string as a root key first, then removes the last segment
/// from its split parent. Ancestors left empty are kept.
///
/// # Errors
/// [`PathError::KeyNotFound`] if nothing is stored at `path`.
pub fn remove(root: &mut Object, path: &KeyPath<'_>) -> Result<Value, PathError> {
    if let Some(value) = root.shift_remove(path.as_str()) {
        return Ok(value);
    }

    let (parent, last) = path.split_last();
    let parent = match parent {
        None => Some(root),
        Some(parent) => walk_mut(root, parent.split(SEPARATOR)).and_then(Value::as_object_mut),
    };
    parent
        .and_then(|map| map.shift_remove(last))
        .ok_or_else(|| PathError::key_not_found(path.as_str()))
}

fn walk<'d, 's>(root: &'d Object, mut segments: impl Iterator<Item = &'s str>) -> Option<&'d Value> {
    let mut current = root.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

fn walk_mut<'d, 's>(
    root: &'d mut Object,
    mut segments: impl Iterator<Item = &'s str>,
) -> Option<&'d mut Value> {
    let mut current = root.get_mut(segments.next()?)?;
    for segment in segments {
        current = current.as_object_mut()?.get_mut(segment)?;
    }
    Some(current)
}

/// Number of leading segments up to the first non-object, if any
fn conflict_depth(root: &Object, parent: &str) -> Option<usize> {
    let mut current = root;
    for (i, segment) in parent.split(SEPARATOR).enumerate() {
        match current.get(segment) {
            None => return None,
            Some(Value::Object(map)) => current = map,
            Some(_) => return Some(i + 1),
        }
    }
    None
}
