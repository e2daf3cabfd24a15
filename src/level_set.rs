use crate::error::{ConfigError, INVALID_LEVEL_SET_MESSAGE};
use serde_json::Value;
use std::collections::HashSet;

/// Set of level names, matched by exact, case-sensitive string equality.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelSet {
    levels: HashSet<String>,
}

impl LevelSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a set from an untyped configuration value.
    ///
    /// `None` and `null` yield an empty set. Anything other than an array
    /// whose every element is a string fails with
    /// [`ConfigError::InvalidLevelSet`], carrying `message` when given and
    /// [`INVALID_LEVEL_SET_MESSAGE`] otherwise.
    pub fn from_value(value: Option<&Value>, message: Option<&str>) -> Result<Self, ConfigError> {
        let err = || ConfigError::InvalidLevelSet(message.unwrap_or(INVALID_LEVEL_SET_MESSAGE).to_string());

        let items = match value {
            None | Some(Value::Null) => return Ok(Self::empty()),
            Some(Value::Array(items)) => items,
            Some(_) => return Err(err()),
        };

        items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(err))
            .collect::<Result<HashSet<_>, _>>()
            .map(|levels| Self { levels })
    }

    pub fn contains(&self, level: &str) -> bool {
        self.levels.contains(level)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for LevelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            levels: iter.into_iter().map(Into::into).collect(),
        }
    }
}
