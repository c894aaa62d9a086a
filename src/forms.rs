//! Shared helpers for deserializing HTML form data.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Deserializer};

/// Deserialize an optional form field where an empty string means "not set".
///
/// HTML selects and inputs submit empty strings rather than omitting the
/// field, which would otherwise fail to parse as `Option<i64>` and friends.
pub(crate) fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let value = Option::<String>::deserialize(deserializer)?;

    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(text) => text.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}
