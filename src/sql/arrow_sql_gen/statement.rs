use std::sync::Arc;

use arrow::{
    array::{Array, ArrayRef, RecordBatch},
    compute::{self, concat_batches},
    datatypes::{DataType, SchemaRef},
    error::ArrowError,
};
use itertools::Itertools;
use snafu::prelude::*;

use super::column_type::{infer_sql_column_type, SqlColumnType};
use super::options::{ColumnTypeOverrides, CreateTableOptions};
use super::profile::{self, profile_column};
use super::value_kind::ValueKind;
use crate::util::{handle_unsupported_type_error, identifier::sanitize_identifier};
use crate::UnsupportedTypeAction;

pub const DEFAULT_TABLE_NAME: &str = "no_name";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("The columns in the supplied dataset must have unique names, found duplicate: {name}"))]
    DuplicateColumnName { name: String },

    #[snafu(display("The option `{argument}` must be {expected}, found: {value}"))]
    InvalidArgumentType {
        argument: String,
        expected: String,
        value: String,
    },

    #[snafu(display("The column `{column}` specified in `{argument}` does not exist in the dataset"))]
    UnknownColumn { argument: String, column: String },

    #[snafu(display(
        "The primary key column `{column}` must not contain any null values, found {null_count}"
    ))]
    PrimaryKeyNullable { column: String, null_count: usize },

    #[snafu(display("Unsupported data type {data_type} for column `{column}`"))]
    UnsupportedDataType { column: String, data_type: DataType },

    #[snafu(display("The column name `{column}` does not contain any valid identifier characters"))]
    EmptyIdentifier { column: String },

    #[snafu(display("Cannot create a table without any columns"))]
    NoColumns,

    #[snafu(display("Unknown option: {key}"))]
    UnknownOption { key: String },

    #[snafu(display("Expected a column type override in the form column:TYPE, found: {entry}"))]
    InvalidOverride { entry: String },

    #[snafu(display("Failed to parse options: {source}"))]
    InvalidOptionsJson { source: serde_json::Error },

    #[snafu(display("Failed to profile column `{column}`: {source}"))]
    FailedToProfileColumn {
        column: String,
        source: profile::Error,
    },

    #[snafu(display("Failed to convert column `{column}` to text: {source}"))]
    FailedToCastColumn { column: String, source: ArrowError },

    #[snafu(display("Failed to combine record batches: {source}"))]
    FailedToConcatBatches { source: ArrowError },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A column of the created table, as inferred from the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// The column name as it appears in the dataset.
    pub name: String,
    /// The sanitized name used in the script.
    pub identifier: String,
    pub sql_type: SqlColumnType,
    pub null_count: usize,
    pub primary_key: bool,
    pub not_null: bool,
    /// Replaces the inferred type and constraints when set.
    pub type_override: Option<String>,
}

impl ColumnDescriptor {
    /// The type and constraints that follow the column name in the script.
    #[must_use]
    pub fn type_definition(&self) -> String {
        if let Some(type_override) = &self.type_override {
            return type_override.clone();
        }

        let mut definition = self.sql_type.to_string();
        if self.primary_key {
            definition.push_str(" PRIMARY KEY");
        }
        if self.not_null {
            definition.push_str(" NOT NULL");
        }
        definition
    }
}

/// Builds a `CREATE TABLE` script from the columns of a record batch.
///
/// ```rust,ignore
/// let sql = CreateTableScriptBuilder::new(&batch)
///     .table_name("people")
///     .primary_key("id")
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct CreateTableScriptBuilder {
    batch: RecordBatch,
    options: CreateTableOptions,
}

impl CreateTableScriptBuilder {
    #[must_use]
    pub fn new(batch: &RecordBatch) -> Self {
        Self {
            batch: batch.clone(),
            options: CreateTableOptions::default(),
        }
    }

    /// Infers from all `batches` as if they were a single batch with `schema`.
    ///
    /// # Errors
    ///
    /// Returns an error if the batches cannot be concatenated.
    pub fn try_from_batches(schema: SchemaRef, batches: &[RecordBatch]) -> Result<Self> {
        let batch = concat_batches(&schema, batches).context(FailedToConcatBatchesSnafu)?;
        Ok(Self {
            batch,
            options: CreateTableOptions::default(),
        })
    }

    #[must_use]
    pub fn with_options(mut self, options: CreateTableOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn table_name(mut self, table_name: impl Into<String>) -> Self {
        self.options.table_name = Some(table_name.into());
        self
    }

    #[must_use]
    pub fn primary_key(mut self, column: impl Into<String>) -> Self {
        self.options.primary_key = Some(column.into());
        self
    }

    /// Declare text columns as `TEXT` instead of `VARCHAR` sized to the longest value.
    #[must_use]
    pub fn force_max_text_width(mut self, force_max_text_width: bool) -> Self {
        self.options.force_max_text_width = force_max_text_width;
        self
    }

    #[must_use]
    pub fn infer_not_null(mut self, infer_not_null: bool) -> Self {
        self.options.infer_not_null = infer_not_null;
        self
    }

    #[must_use]
    pub fn overrides(mut self, overrides: ColumnTypeOverrides) -> Self {
        self.options.overrides = Some(overrides);
        self
    }

    #[must_use]
    pub fn unsupported_type_action(mut self, action: UnsupportedTypeAction) -> Self {
        self.options.unsupported_type_action = action;
        self
    }

    /// Infers the columns of the table, in dataset order.
    ///
    /// Types are inferred first, then the primary key is applied, then `NOT NULL` for the
    /// remaining columns without missing values, and finally the type overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the column names are not unique, a column has an unsupported type,
    /// or the primary key or an override names a column that does not exist. The primary key
    /// column must not contain missing values.
    pub fn infer_columns(&self) -> Result<Vec<ColumnDescriptor>> {
        let schema = self.batch.schema();

        if let Some(name) = schema.fields().iter().map(|f| f.name()).duplicates().next() {
            return DuplicateColumnNameSnafu { name }.fail();
        }

        let mut columns = Vec::with_capacity(schema.fields().len());
        for (field, array) in schema.fields().iter().zip(self.batch.columns()) {
            let Some((kind, array)) = self.resolve_value_kind(field.name(), array)? else {
                continue;
            };

            let identifier = sanitize_identifier(field.name())
                .filter(|identifier| !identifier.is_empty())
                .context(EmptyIdentifierSnafu {
                    column: field.name(),
                })?;

            let profile = profile_column(&array, kind).context(FailedToProfileColumnSnafu {
                column: field.name(),
            })?;
            let sql_type =
                infer_sql_column_type(kind, &profile, self.options.force_max_text_width);
            tracing::debug!("Inferred {sql_type} for {kind} column {}", field.name());

            columns.push(ColumnDescriptor {
                name: field.name().to_string(),
                identifier,
                sql_type,
                null_count: profile.null_count,
                primary_key: false,
                not_null: false,
                type_override: None,
            });
        }

        ensure!(!columns.is_empty(), NoColumnsSnafu);

        for identifier in columns.iter().map(|c| &c.identifier).duplicates() {
            tracing::warn!("Multiple columns share the identifier {identifier} after sanitizing");
        }

        if let Some(primary_key) = &self.options.primary_key {
            let column = find_column(&mut columns, "primary_key", primary_key)?;
            ensure!(
                column.null_count == 0,
                PrimaryKeyNullableSnafu {
                    column: primary_key,
                    null_count: column.null_count,
                }
            );
            column.primary_key = true;
        }

        if self.options.infer_not_null {
            for column in columns.iter_mut() {
                column.not_null = column.null_count == 0 && !column.primary_key;
            }
        }

        if let Some(overrides) = &self.options.overrides {
            for (name, sql_type) in overrides.iter() {
                let column = find_column(&mut columns, "overrides", name)?;
                column.type_override = Some(sql_type.to_string());
            }
        }

        Ok(columns)
    }

    /// Renders the `CREATE TABLE` script.
    ///
    /// # Errors
    ///
    /// See [`CreateTableScriptBuilder::infer_columns`].
    #[tracing::instrument(level = "debug", skip_all, fields(table_name = %self.table_name_or_default()))]
    pub fn build(self) -> Result<String> {
        let columns = self.infer_columns()?;
        Ok(render_create_table(self.table_name_or_default(), &columns))
    }

    fn table_name_or_default(&self) -> &str {
        self.options
            .table_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_TABLE_NAME)
    }

    /// The value kind of a column, or `None` if the column is left out of the table.
    fn resolve_value_kind(
        &self,
        column: &str,
        array: &ArrayRef,
    ) -> Result<Option<(ValueKind, ArrayRef)>> {
        let data_type = match ValueKind::try_from(array.data_type()) {
            Ok(kind) => return Ok(Some((kind, Arc::clone(array)))),
            Err(data_type) => data_type,
        };

        if self.options.unsupported_type_action == UnsupportedTypeAction::String {
            let array = compute::cast(array, &DataType::Utf8)
                .context(FailedToCastColumnSnafu { column })?;
            return Ok(Some((ValueKind::Text, array)));
        }

        handle_unsupported_type_error(
            self.options.unsupported_type_action,
            UnsupportedDataTypeSnafu { column, data_type }.build(),
        )?;
        Ok(None)
    }
}

/// Infers a `CREATE TABLE` script for `batch`.
///
/// # Errors
///
/// See [`CreateTableScriptBuilder::infer_columns`].
pub fn create_table_script(batch: &RecordBatch, options: &CreateTableOptions) -> Result<String> {
    CreateTableScriptBuilder::new(batch)
        .with_options(options.clone())
        .build()
}

/// The column named exactly `name`, or else the first column whose identifier matches the
/// sanitized `name`.
fn find_column<'a>(
    columns: &'a mut [ColumnDescriptor],
    argument: &str,
    name: &str,
) -> Result<&'a mut ColumnDescriptor> {
    let identifier = sanitize_identifier(name).unwrap_or_default();
    let position = columns
        .iter()
        .position(|column| column.name == name)
        .or_else(|| {
            columns
                .iter()
                .position(|column| column.identifier == identifier)
        })
        .context(UnknownColumnSnafu {
            argument,
            column: name,
        })?;
    Ok(&mut columns[position])
}

fn render_create_table(table_name: &str, columns: &[ColumnDescriptor]) -> String {
    let column_definitions = columns
        .iter()
        .map(|column| format!("{} {}", column.identifier, column.type_definition()))
        .join("\n, ");

    format!("CREATE TABLE {table_name} ( \n{column_definitions}\n);")
}
