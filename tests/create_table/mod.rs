use crate::arrow_record_batch_gen::*;
use arrow::array::{Int64Array, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow_table_script::sql::arrow_sql_gen::statement::{CreateTableScriptBuilder, Error};
use arrow_table_script::{
    create_table_script, sanitize_identifier, ColumnTypeOverrides, CreateTableOptions,
    UnsupportedTypeAction,
};
use rstest::rstest;
use std::collections::HashMap;
use std::sync::Arc;

fn column_lines(sql: &str) -> Vec<&str> {
    let lines: Vec<&str> = sql.lines().collect();
    lines[1..lines.len() - 1].to_vec()
}

#[rstest]
#[case::ints(
    get_arrow_int_record_batch(),
    "CREATE TABLE ints ( \nint8 SMALLINT NOT NULL\n, int16 SMALLINT NOT NULL\n, int32 INT NOT NULL\n, int64 BIGINT NOT NULL\n, uint8 SMALLINT NOT NULL\n, uint16 INT NOT NULL\n, uint32 BIGINT NOT NULL\n, uint64 NUMERIC NOT NULL\n);"
)]
#[case::bits(
    get_arrow_bit_record_batch(),
    "CREATE TABLE bits ( \nint8 BIT\n, int64 BIT\n, uint64 BIT NOT NULL\n);"
)]
#[case::floats(
    get_arrow_float_record_batch(),
    "CREATE TABLE floats ( \nfloat32 NUMERIC NOT NULL\n, float64 NUMERIC\n);"
)]
#[case::strings(
    get_arrow_utf8_record_batch(),
    "CREATE TABLE strings ( \nutf8 VARCHAR(6)\n, largeutf8 VARCHAR(3) NOT NULL\n, utf8view VARCHAR(7) NOT NULL\n, size VARCHAR(6) NOT NULL\n);"
)]
#[case::messy_names(
    get_arrow_messy_names_record_batch(),
    "CREATE TABLE messy_names ( \ncustomer_id INT NOT NULL\n, first_name VARCHAR(5) NOT NULL\n, no_of_orders INT\n, total NUMERIC NOT NULL\n);"
)]
#[test_log::test]
fn test_create_table_script(#[case] batch: RecordBatch, #[case] expected: &str) {
    let table_name = expected
        .split_whitespace()
        .nth(2)
        .expect("table name in expected script");

    let sql = CreateTableScriptBuilder::new(&batch)
        .table_name(table_name)
        .build()
        .expect("script should be inferred");

    assert_eq!(sql, expected);
}

#[rstest]
#[case(get_arrow_int_record_batch())]
#[case(get_arrow_bit_record_batch())]
#[case(get_arrow_float_record_batch())]
#[case(get_arrow_utf8_record_batch())]
#[case(get_arrow_messy_names_record_batch())]
fn test_one_line_per_column_in_dataset_order(#[case] batch: RecordBatch) {
    let sql = create_table_script(&batch, &CreateTableOptions::default())
        .expect("script should be inferred");

    let lines = column_lines(&sql);
    assert_eq!(lines.len(), batch.num_columns());

    for (i, (line, field)) in lines.iter().zip(batch.schema().fields()).enumerate() {
        let line = if i == 0 {
            *line
        } else {
            line.strip_prefix(", ").expect("comma prefixed column")
        };
        let identifier = sanitize_identifier(field.name()).expect("non-empty column name");
        assert!(
            line.starts_with(&format!("{identifier} ")),
            "{line} should define {identifier}"
        );
    }
}

#[rstest]
#[case(get_arrow_int_record_batch())]
#[case(get_arrow_bit_record_batch())]
#[case(get_arrow_float_record_batch())]
#[case(get_arrow_utf8_record_batch())]
fn test_columns_without_missing_values_are_not_null(#[case] batch: RecordBatch) {
    let columns = CreateTableScriptBuilder::new(&batch)
        .infer_columns()
        .expect("columns should be inferred");

    for column in columns {
        assert_eq!(
            column.type_definition().ends_with(" NOT NULL"),
            column.null_count == 0,
            "{}",
            column.name
        );
    }
}

#[test]
fn test_people_example() {
    let sql = CreateTableScriptBuilder::new(&get_arrow_people_record_batch())
        .table_name("people")
        .primary_key("id")
        .build()
        .expect("script should be inferred");

    assert_eq!(
        sql,
        "CREATE TABLE people ( \nid BIT PRIMARY KEY\n, name VARCHAR(2)\n);"
    );
}

#[test]
fn test_people_example_from_options() {
    let options = CreateTableOptions::try_from(&HashMap::from([
        ("table_name".to_string(), "people".to_string()),
        ("primary_key".to_string(), "ID".to_string()),
        ("overrides".to_string(), "Name:VARCHAR(100)".to_string()),
    ]))
    .expect("valid options");

    let sql = create_table_script(&get_arrow_people_record_batch(), &options)
        .expect("script should be inferred");

    assert_eq!(
        sql,
        "CREATE TABLE people ( \nid BIT PRIMARY KEY\n, name VARCHAR(100)\n);"
    );
}

#[test]
fn test_override_discards_inferred_constraints() {
    let overrides: ColumnTypeOverrides = [("id", "DATE")].into_iter().collect();
    let sql = CreateTableScriptBuilder::new(&get_arrow_people_record_batch())
        .primary_key("id")
        .overrides(overrides)
        .build()
        .expect("script should be inferred");

    assert_eq!(column_lines(&sql)[0], "id DATE");
}

#[test]
fn test_nullable_primary_key() {
    let schema = Schema::new(vec![
        Field::new("id", DataType::Int64, true),
        Field::new("Name", DataType::Utf8, false),
    ]);
    let batch = RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(Int64Array::from(vec![Some(4), None])),
            Arc::new(StringArray::from(vec!["Al", "Bo"])),
        ],
    )
    .expect("Unable to build record batch");

    let err = CreateTableScriptBuilder::new(&batch)
        .primary_key("id")
        .build()
        .expect_err("primary key contains nulls");

    assert!(matches!(err, Error::PrimaryKeyNullable { .. }));
    insta::assert_snapshot!(err.to_string(), @"The primary key column `id` must not contain any null values, found 1");
}

#[test]
fn test_unknown_override_column() {
    let err = CreateTableScriptBuilder::new(&get_arrow_people_record_batch())
        .overrides([("surname", "TEXT")].into_iter().collect())
        .build()
        .expect_err("unknown override column");

    insta::assert_snapshot!(err.to_string(), @"The column `surname` specified in `overrides` does not exist in the dataset");
}

#[test]
fn test_unsupported_type_error() {
    let err = create_table_script(
        &get_arrow_date_record_batch(),
        &CreateTableOptions::default(),
    )
    .expect_err("Date32 is unsupported");

    insta::assert_snapshot!(err.to_string(), @"Unsupported data type Date32 for column `born`");
}

#[test_log::test]
fn test_unsupported_type_warn_drops_column() {
    let sql = CreateTableScriptBuilder::new(&get_arrow_date_record_batch())
        .unsupported_type_action(UnsupportedTypeAction::Warn)
        .build()
        .expect("script should be inferred");

    assert_eq!(sql, "CREATE TABLE no_name ( \nid INT NOT NULL\n);");
}

#[test]
fn test_unsupported_type_as_string() {
    let options = CreateTableOptions::from_json(
        r#"{"table_name": "births", "unsupported_type_action": "string"}"#,
    )
    .expect("valid options");

    let sql = create_table_script(&get_arrow_date_record_batch(), &options)
        .expect("script should be inferred");

    assert_eq!(
        sql,
        "CREATE TABLE births ( \nid INT NOT NULL\n, born VARCHAR(10)\n);"
    );
}

#[test]
fn test_multiple_batches_match_single_batch() {
    let batch = get_arrow_people_record_batch();
    let batches = vec![batch.slice(0, 1), batch.slice(1, 2)];

    let from_batches = CreateTableScriptBuilder::try_from_batches(batch.schema(), &batches)
        .expect("batches should be combined")
        .table_name("people")
        .build()
        .expect("script should be inferred");
    let from_batch = CreateTableScriptBuilder::new(&batch)
        .table_name("people")
        .build()
        .expect("script should be inferred");

    assert_eq!(from_batches, from_batch);
}

#[test]
fn test_sanitized_name_collisions_are_kept() {
    let schema = Schema::new(vec![
        Field::new("Total", DataType::Int64, false),
        Field::new("total ", DataType::Int64, true),
    ]);
    let batch = RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(Int64Array::from(vec![5])),
            Arc::new(Int64Array::from(vec![None::<i64>])),
        ],
    )
    .expect("Unable to build record batch");

    let sql = create_table_script(&batch, &CreateTableOptions::default())
        .expect("distinct raw names are accepted");

    assert_eq!(
        sql,
        "CREATE TABLE no_name ( \ntotal BIGINT NOT NULL\n, total BIGINT\n);"
    );
}
