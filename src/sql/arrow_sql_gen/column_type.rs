use std::fmt::Display;

use super::profile::ColumnProfile;
use super::value_kind::{IntWidth, ValueKind};

/// The SQL column types a script can be inferred with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlColumnType {
    Bit,
    SmallInt,
    Int,
    BigInt,
    Numeric,
    VarChar(usize),
    Text,
}

impl Display for SqlColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlColumnType::Bit => write!(f, "BIT"),
            SqlColumnType::SmallInt => write!(f, "SMALLINT"),
            SqlColumnType::Int => write!(f, "INT"),
            SqlColumnType::BigInt => write!(f, "BIGINT"),
            SqlColumnType::Numeric => write!(f, "NUMERIC"),
            SqlColumnType::VarChar(width) => write!(f, "VARCHAR({width})"),
            SqlColumnType::Text => write!(f, "TEXT"),
        }
    }
}

/// Infers the SQL type of a column from its value kind and observed values.
///
/// Integer columns whose values span exactly 0 to 1 become `BIT`. Otherwise the
/// declared storage width decides, not the range the width can hold: 8-bit
/// unsigned and 16-bit signed both map to `SMALLINT`, 16-bit unsigned to `INT`,
/// 32-bit unsigned to `BIGINT` and 64-bit unsigned to `NUMERIC`.
///
/// Text-like columns become `VARCHAR(n)` sized to their longest value, or `TEXT`
/// when `force_max_text_width` is set or no value was observed.
#[must_use]
pub fn infer_sql_column_type(
    kind: ValueKind,
    profile: &ColumnProfile,
    force_max_text_width: bool,
) -> SqlColumnType {
    match kind {
        ValueKind::Text | ValueKind::Categorical => {
            if force_max_text_width {
                return SqlColumnType::Text;
            }
            profile
                .max_text_width
                .map_or(SqlColumnType::Text, SqlColumnType::VarChar)
        }
        ValueKind::Int(_) | ValueKind::UInt(_) if profile.is_bit => SqlColumnType::Bit,
        ValueKind::Int(IntWidth::W8 | IntWidth::W16) | ValueKind::UInt(IntWidth::W8) => {
            SqlColumnType::SmallInt
        }
        ValueKind::Int(IntWidth::W32) | ValueKind::UInt(IntWidth::W16) => SqlColumnType::Int,
        ValueKind::Int(IntWidth::W64) | ValueKind::UInt(IntWidth::W32) => SqlColumnType::BigInt,
        ValueKind::UInt(IntWidth::W64) | ValueKind::Float(_) => SqlColumnType::Numeric,
    }
}
