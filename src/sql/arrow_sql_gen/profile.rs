use arrow::{
    array::{Array, ArrayRef, AsArray},
    compute,
    datatypes::{
        DataType, Float16Type, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type,
        Int8Type, UInt16Type, UInt32Type, UInt64Type, UInt8Type,
    },
    error::ArrowError,
};
use snafu::prelude::*;

use super::value_kind::{FloatWidth, IntWidth, ValueKind};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("Failed to read {data_type} values as text: {source}"))]
    FailedToCastToText {
        data_type: DataType,
        source: ArrowError,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Statistics observed over the values of a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnProfile {
    /// Number of missing values. `NaN` counts as missing in float columns.
    pub null_count: usize,
    /// The non-missing values have a minimum of 0 and a maximum of 1.
    pub is_bit: bool,
    /// Longest non-missing string, counted in characters. `None` when the column
    /// is not text-like or has no non-missing values.
    pub max_text_width: Option<usize>,
}

impl ColumnProfile {
    #[must_use]
    pub fn has_nulls(&self) -> bool {
        self.null_count > 0
    }
}

macro_rules! is_bit_column {
    ($array:expr, $arrow_type:ty) => {{
        let array = $array.as_primitive::<$arrow_type>();
        matches!(
            (compute::min(array), compute::max(array)),
            (Some(0), Some(1))
        )
    }};
}

macro_rules! nan_count {
    ($array:expr, $arrow_type:ty) => {{
        $array
            .as_primitive::<$arrow_type>()
            .iter()
            .flatten()
            .filter(|value| value.is_nan())
            .count()
    }};
}

/// Profiles `array`, which must hold values of `kind`.
///
/// # Errors
///
/// Returns an error if a text-like column cannot be read as UTF-8 strings.
pub fn profile_column(array: &ArrayRef, kind: ValueKind) -> Result<ColumnProfile> {
    let nan_count = match kind {
        ValueKind::Float(FloatWidth::W16) => nan_count!(array, Float16Type),
        ValueKind::Float(FloatWidth::W32) => nan_count!(array, Float32Type),
        ValueKind::Float(FloatWidth::W64) => nan_count!(array, Float64Type),
        _ => 0,
    };
    let null_count = array
        .logical_nulls()
        .map_or(0, |nulls| nulls.null_count())
        + nan_count;

    let is_bit = match kind {
        ValueKind::Int(IntWidth::W8) => is_bit_column!(array, Int8Type),
        ValueKind::Int(IntWidth::W16) => is_bit_column!(array, Int16Type),
        ValueKind::Int(IntWidth::W32) => is_bit_column!(array, Int32Type),
        ValueKind::Int(IntWidth::W64) => is_bit_column!(array, Int64Type),
        ValueKind::UInt(IntWidth::W8) => is_bit_column!(array, UInt8Type),
        ValueKind::UInt(IntWidth::W16) => is_bit_column!(array, UInt16Type),
        ValueKind::UInt(IntWidth::W32) => is_bit_column!(array, UInt32Type),
        ValueKind::UInt(IntWidth::W64) => is_bit_column!(array, UInt64Type),
        ValueKind::Text | ValueKind::Categorical | ValueKind::Float(_) => false,
    };

    let max_text_width = if kind.is_text_like() {
        max_text_width(array)?
    } else {
        None
    };

    Ok(ColumnProfile {
        null_count,
        is_bit,
        max_text_width,
    })
}

/// Length of the longest non-missing string in `array`, in characters.
///
/// Large, view and dictionary encoded strings are cast to `Utf8` first.
pub(crate) fn max_text_width(array: &ArrayRef) -> Result<Option<usize>> {
    let utf8 = if array.data_type() == &DataType::Utf8 {
        ArrayRef::clone(array)
    } else {
        compute::cast(array, &DataType::Utf8).context(FailedToCastToTextSnafu {
            data_type: array.data_type().clone(),
        })?
    };

    Ok(utf8
        .as_string::<i32>()
        .iter()
        .flatten()
        .map(|value| value.chars().count())
        .max())
}
