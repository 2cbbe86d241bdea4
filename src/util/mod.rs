use std::collections::HashMap;
use std::hash::Hash;

use crate::UnsupportedTypeAction;

pub mod identifier;

/// Parses `key:value` pairs separated by `;`.
///
/// "a:DATE;b:TEXT" -> {"a": "DATE", "b": "TEXT"}
///
/// An entry without a `:` maps to the default value. Pairs are returned in the order
/// they appear, so callers can collect them into an ordered container.
pub fn pairs_from_option_string<K, V>(option_str: &str) -> impl Iterator<Item = (K, V)> + '_
where
    K: for<'a> From<&'a str>,
    V: for<'a> From<&'a str> + Default,
{
    option_str
        .split(';')
        .filter(|entry| !entry.trim().is_empty())
        .map(|entry| match entry.split_once(':') {
            Some((key, value)) => (K::from(key.trim()), V::from(value.trim())),
            None => (K::from(entry.trim()), V::default()),
        })
}

#[must_use]
pub fn hashmap_from_option_string<K, V>(hashmap_option_str: &str) -> HashMap<K, V>
where
    K: for<'a> From<&'a str> + Eq + Hash,
    V: for<'a> From<&'a str> + Default,
{
    pairs_from_option_string(hashmap_option_str).collect()
}

#[must_use]
pub fn remove_prefix_from_hashmap_keys<V>(
    hashmap: HashMap<String, V>,
    prefix: &str,
) -> HashMap<String, V> {
    hashmap
        .into_iter()
        .map(|(key, value)| {
            let new_key = key
                .strip_prefix(prefix)
                .map_or(key.clone(), |s| s.to_string());
            (new_key, value)
        })
        .collect()
}

/// Applies `unsupported_type_action` to an unsupported column.
///
/// Returns the error for [`UnsupportedTypeAction::Error`] and `Ok(())` otherwise, logging a
/// warning first for [`UnsupportedTypeAction::Warn`].
///
/// # Errors
///
/// Returns `error` if the action is [`UnsupportedTypeAction::Error`].
pub fn handle_unsupported_type_error<E>(
    unsupported_type_action: UnsupportedTypeAction,
    error: E,
) -> Result<(), E>
where
    E: std::error::Error,
{
    match unsupported_type_action {
        UnsupportedTypeAction::Error => return Err(error),
        UnsupportedTypeAction::Warn => {
            tracing::warn!("{error}");
        }
        UnsupportedTypeAction::Ignore | UnsupportedTypeAction::String => {}
    }

    Ok(())
}
