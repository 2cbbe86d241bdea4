use std::collections::HashMap;
use std::fmt;

use serde::{
    de::{MapAccess, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};
use snafu::prelude::*;

use super::statement::{
    InvalidArgumentTypeSnafu, InvalidOptionsJsonSnafu, InvalidOverrideSnafu, Result,
    UnknownOptionSnafu,
};
use crate::util::{pairs_from_option_string, remove_prefix_from_hashmap_keys};
use crate::UnsupportedTypeAction;

/// Literal SQL types that replace the inferred type of specific columns, keyed by column name.
///
/// Entries keep their insertion order. Inserting a column that is already present replaces
/// its type in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnTypeOverrides {
    overrides: Vec<(String, String)>,
}

impl ColumnTypeOverrides {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, sql_type: impl Into<String>) {
        let column = column.into();
        let sql_type = sql_type.into();
        match self.overrides.iter_mut().find(|(c, _)| *c == column) {
            Some((_, existing)) => *existing = sql_type,
            None => self.overrides.push((column, sql_type)),
        }
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.overrides
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, sql_type)| sql_type.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.overrides
            .iter()
            .map(|(column, sql_type)| (column.as_str(), sql_type.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ColumnTypeOverrides
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut overrides = Self::new();
        for (column, sql_type) in iter {
            overrides.insert(column, sql_type);
        }
        overrides
    }
}

/// Parses overrides from an option string such as `"created_at:TIMESTAMP;id:UUID"`.
impl TryFrom<&str> for ColumnTypeOverrides {
    type Error = super::statement::Error;

    fn try_from(value: &str) -> Result<Self> {
        let mut overrides = Self::new();
        for (column, sql_type) in pairs_from_option_string::<String, String>(value) {
            ensure!(
                !column.is_empty() && !sql_type.is_empty(),
                InvalidOverrideSnafu {
                    entry: format!("{column}:{sql_type}"),
                }
            );
            overrides.insert(column, sql_type);
        }
        Ok(overrides)
    }
}

impl Serialize for ColumnTypeOverrides {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for ColumnTypeOverrides {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct OverridesVisitor;

        impl<'de> Visitor<'de> for OverridesVisitor {
            type Value = ColumnTypeOverrides;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of column names to SQL types")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut overrides = ColumnTypeOverrides::new();
                while let Some((column, sql_type)) = map.next_entry::<String, String>()? {
                    overrides.insert(column, sql_type);
                }
                Ok(overrides)
            }
        }

        deserializer.deserialize_map(OverridesVisitor)
    }
}

/// Options for inferring a `CREATE TABLE` script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateTableOptions {
    /// Name of the created table, `no_name` when not set.
    pub table_name: Option<String>,
    /// Column to declare as the primary key. It must not contain missing values.
    pub primary_key: Option<String>,
    /// Declare every text column as `TEXT` instead of `VARCHAR(n)`.
    pub force_max_text_width: bool,
    /// Declare columns without missing values as `NOT NULL`.
    pub infer_not_null: bool,
    pub overrides: Option<ColumnTypeOverrides>,
    pub unsupported_type_action: UnsupportedTypeAction,
}

impl Default for CreateTableOptions {
    fn default() -> Self {
        Self {
            table_name: None,
            primary_key: None,
            force_max_text_width: false,
            infer_not_null: true,
            overrides: None,
            unsupported_type_action: UnsupportedTypeAction::default(),
        }
    }
}

impl CreateTableOptions {
    /// Parses options from a JSON object. Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a valid options object.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context(InvalidOptionsJsonSnafu)
    }

    /// Parses options from a map whose keys all start with `prefix`, e.g. `ddl_table_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if an option is unknown or has an invalid value.
    pub fn try_from_prefixed(options: HashMap<String, String>, prefix: &str) -> Result<Self> {
        Self::try_from(&remove_prefix_from_hashmap_keys(options, prefix))
    }
}

impl TryFrom<&HashMap<String, String>> for CreateTableOptions {
    type Error = super::statement::Error;

    fn try_from(options: &HashMap<String, String>) -> Result<Self> {
        let mut parsed = Self::default();

        for (key, value) in options {
            match key.as_str() {
                "table_name" => parsed.table_name = Some(value.clone()),
                "primary_key" => parsed.primary_key = Some(value.clone()),
                "force_max_text_width" => parsed.force_max_text_width = parse_bool(key, value)?,
                "infer_not_null" => parsed.infer_not_null = parse_bool(key, value)?,
                "overrides" => {
                    parsed.overrides = Some(ColumnTypeOverrides::try_from(value.as_str())?);
                }
                "unsupported_type_action" => {
                    parsed.unsupported_type_action =
                        value.parse::<UnsupportedTypeAction>().map_err(|value| {
                            InvalidArgumentTypeSnafu {
                                argument: key,
                                expected: "one of error, warn, ignore or string",
                                value,
                            }
                            .build()
                        })?;
                }
                _ => UnknownOptionSnafu { key }.fail()?,
            }
        }

        Ok(parsed)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => InvalidArgumentTypeSnafu {
            argument: key,
            expected: "either true or false",
            value,
        }
        .fail(),
    }
}
