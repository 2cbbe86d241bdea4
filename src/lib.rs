#![cfg_attr(docsrs, feature(doc_auto_cfg))]

use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub mod sql;
pub mod util;

pub use sql::arrow_sql_gen::options::{ColumnTypeOverrides, CreateTableOptions};
pub use sql::arrow_sql_gen::statement::{create_table_script, CreateTableScriptBuilder};
pub use util::identifier::sanitize_identifier;

#[derive(PartialEq, Eq, Clone, Copy, Default, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsupportedTypeAction {
    /// Refuse to create the script if any unsupported types are found
    #[default]
    Error,
    /// Log a warning for any unsupported types and leave the column out
    Warn,
    /// Ignore any unsupported types (i.e. skip them)
    Ignore,
    /// Attempt to convert any unsupported types to a string
    String,
}

impl FromStr for UnsupportedTypeAction {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "error" => Ok(UnsupportedTypeAction::Error),
            "warn" => Ok(UnsupportedTypeAction::Warn),
            "ignore" => Ok(UnsupportedTypeAction::Ignore),
            "string" => Ok(UnsupportedTypeAction::String),
            other => Err(other.to_string()),
        }
    }
}
