use arrow::datatypes::DataType;
use std::fmt::Display;

/// Declared storage width of an integer column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatWidth {
    W16,
    W32,
    W64,
}

/// The logical kind of values held by a column, independent of the observed values.
///
/// Only the kinds listed here take part in type inference. Every other Arrow
/// type is reported as unsupported by [`ValueKind::try_from`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Text,
    /// Dictionary encoded strings
    Categorical,
    Int(IntWidth),
    UInt(IntWidth),
    Float(FloatWidth),
}

impl ValueKind {
    #[must_use]
    pub fn is_text_like(&self) -> bool {
        matches!(self, ValueKind::Text | ValueKind::Categorical)
    }

    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(self, ValueKind::Int(_) | ValueKind::UInt(_))
    }
}

impl TryFrom<&DataType> for ValueKind {
    type Error = DataType;

    fn try_from(data_type: &DataType) -> Result<Self, Self::Error> {
        match data_type {
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => Ok(ValueKind::Text),
            DataType::Dictionary(_, value_type) if is_string_type(value_type) => {
                Ok(ValueKind::Categorical)
            }
            DataType::Int8 => Ok(ValueKind::Int(IntWidth::W8)),
            DataType::Int16 => Ok(ValueKind::Int(IntWidth::W16)),
            DataType::Int32 => Ok(ValueKind::Int(IntWidth::W32)),
            DataType::Int64 => Ok(ValueKind::Int(IntWidth::W64)),
            DataType::UInt8 => Ok(ValueKind::UInt(IntWidth::W8)),
            DataType::UInt16 => Ok(ValueKind::UInt(IntWidth::W16)),
            DataType::UInt32 => Ok(ValueKind::UInt(IntWidth::W32)),
            DataType::UInt64 => Ok(ValueKind::UInt(IntWidth::W64)),
            DataType::Float16 => Ok(ValueKind::Float(FloatWidth::W16)),
            DataType::Float32 => Ok(ValueKind::Float(FloatWidth::W32)),
            DataType::Float64 => Ok(ValueKind::Float(FloatWidth::W64)),
            _ => Err(data_type.clone()),
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueKind::Text => write!(f, "text"),
            ValueKind::Categorical => write!(f, "categorical"),
            ValueKind::Int(width) => write!(f, "int{}", width.bits()),
            ValueKind::UInt(width) => write!(f, "uint{}", width.bits()),
            ValueKind::Float(width) => write!(f, "float{}", width.bits()),
        }
    }
}

impl IntWidth {
    #[must_use]
    pub fn bits(&self) -> u8 {
        match self {
            IntWidth::W8 => 8,
            IntWidth::W16 => 16,
            IntWidth::W32 => 32,
            IntWidth::W64 => 64,
        }
    }
}

impl FloatWidth {
    #[must_use]
    pub fn bits(&self) -> u8 {
        match self {
            FloatWidth::W16 => 16,
            FloatWidth::W32 => 32,
            FloatWidth::W64 => 64,
        }
    }
}

fn is_string_type(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View
    )
}
