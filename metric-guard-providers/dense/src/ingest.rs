//! Copies `FixedSizeList<Float32, D>` columns into row-major buffers.
use arrow_array::{Array, ArrayRef, FixedSizeListArray, Float32Array};
use arrow_schema::{DataType, Field};

use crate::errors::DenseLookupTableError;

/// Returns the row width declared by a schema field, rejecting nullable
/// fields and non-`Float32` children.
pub(crate) fn field_dimension(field: &Field, column: &str) -> Result<usize, DenseLookupTableError> {
    let DataType::FixedSizeList(child, width) = field.data_type() else {
        return Err(DenseLookupTableError::InvalidColumnType {
            column: column.to_owned(),
            actual: field.data_type().clone(),
        });
    };
    if field.is_nullable() || child.is_nullable() {
        return Err(DenseLookupTableError::NullableField {
            column: column.to_owned(),
            nullable_child: child.is_nullable(),
        });
    }
    if child.data_type() != &DataType::Float32 {
        return Err(DenseLookupTableError::InvalidListValueType {
            actual: child.data_type().clone(),
        });
    }
    usize::try_from(*width).map_err(|_| DenseLookupTableError::InvalidDimension { actual: *width })
}

/// Views a column as a fixed-size list array.
pub(crate) fn as_list<'a>(
    column_array: &'a ArrayRef,
    column: &str,
) -> Result<&'a FixedSizeListArray, DenseLookupTableError> {
    column_array
        .as_any()
        .downcast_ref::<FixedSizeListArray>()
        .ok_or_else(|| DenseLookupTableError::InvalidColumnType {
            column: column.to_owned(),
            actual: column_array.data_type().clone(),
        })
}

/// Appends the rows of `array` to `out` and returns their width.
///
/// `start_row` offsets the row numbers reported in errors so batches can be
/// appended one after another.
pub(crate) fn append_rows(
    array: &FixedSizeListArray,
    expected_dimension: Option<usize>,
    start_row: usize,
    out: &mut Vec<f32>,
) -> Result<usize, DenseLookupTableError> {
    let value_type = array.value_type();
    if value_type != DataType::Float32 {
        return Err(DenseLookupTableError::InvalidListValueType { actual: value_type });
    }
    let dimension = usize::try_from(array.value_length()).map_err(|_| {
        DenseLookupTableError::InvalidDimension {
            actual: array.value_length(),
        }
    })?;
    if let Some(expected) = expected_dimension.filter(|&expected| expected != dimension) {
        return Err(DenseLookupTableError::InconsistentBatchDimension {
            expected,
            actual: dimension,
        });
    }
    copy_rows(array, dimension, start_row, out)?;
    Ok(dimension)
}

pub(crate) fn copy_rows(
    array: &FixedSizeListArray,
    dimension: usize,
    start_row: usize,
    out: &mut Vec<f32>,
) -> Result<(), DenseLookupTableError> {
    let rows = array.len();
    let additional = rows
        .checked_mul(dimension)
        .ok_or(DenseLookupTableError::CapacityOverflow { rows, dimension })?;
    out.reserve(additional);
    for offset in 0..rows {
        let row = start_row + offset;
        if array.is_null(offset) {
            return Err(DenseLookupTableError::NullRow { row });
        }
        let values = array.value(offset);
        let floats = values.as_any().downcast_ref::<Float32Array>().ok_or_else(|| {
            DenseLookupTableError::InvalidListValueType {
                actual: values.data_type().clone(),
            }
        })?;
        if floats.len() != dimension {
            return Err(DenseLookupTableError::InvalidRowLength {
                row,
                expected: dimension,
                actual: floats.len(),
            });
        }
        if let Some(value_index) = (0..dimension).find(|&index| floats.is_null(index)) {
            return Err(DenseLookupTableError::NullValue { row, value_index });
        }
        out.extend(floats.values().iter().copied());
    }
    Ok(())
}
