use super::{DenseLookupTable, DenseLookupTableError, support::*};
use arrow_array::builder::{FixedSizeListBuilder, Float32Builder};
use arrow_array::{ArrayRef, FixedSizeListArray};
use arrow_schema::{DataType, Field};
use metric_guard_core::{
    CheckOptions, CheckInputErrorCode, DType, InputArray, InputKind, PreprocessorErrorCode,
    check_input,
};
use ndarray::array;
use rstest::rstest;
use std::sync::Arc;

fn demo_table() -> DenseLookupTable {
    DenseLookupTable::try_from_fixed_size_list("demo", &build_array(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]))
        .expect("valid table")
}

#[rstest]
fn table_from_fixed_size_list() {
    let table = demo_table();
    assert_eq!(table.name(), "demo");
    assert_eq!(table.len(), 2);
    assert!(!table.is_empty());
    assert_eq!(table.dimension(), 3);
    assert_eq!(table.row(1), Some(&[4.0, 5.0, 6.0][..]));
    assert_eq!(table.row(2), None);
}

#[rstest]
fn table_from_rows_matches_arrow_ingestion() {
    let rows = DenseLookupTable::try_from_rows("demo", vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]])
        .expect("rows share a width");
    assert_eq!(rows, demo_table());
}

#[rstest]
#[case::ragged(vec![vec![1.0], vec![1.0, 2.0]])]
#[case::empty(Vec::new())]
fn table_from_rows_rejects_invalid_rows(#[case] rows: Vec<Vec<f32>>) {
    let err = DenseLookupTable::try_from_rows("demo", rows).expect_err("rows are invalid");
    assert!(matches!(
        err,
        DenseLookupTableError::InvalidRowLength { row: 1, expected: 1, actual: 2 }
            | DenseLookupTableError::EmptyTable { .. }
    ));
}

#[rstest]
fn table_converts_to_a_float32_matrix() {
    let input = demo_table().to_input_array();
    assert_eq!(input.dtype(), DType::Float32);
    assert_eq!(input.shape(), &[2, 3]);
    assert_eq!(demo_table().to_array(), array![[1.0_f32, 2.0, 3.0], [4.0, 5.0, 6.0]]);
}

#[rstest]
fn preprocessor_expands_indicator_pairs() {
    let preprocessor = demo_table().into_preprocessor();
    let checked = check_input(
        &InputArray::from(array![[0_i64, 1], [-1, 0]]),
        InputKind::Tuples,
        Some(&preprocessor),
        &CheckOptions::new(),
    )
    .expect("indices are in range");
    assert_eq!(
        checked.into_array().into_f64(),
        array![[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]], [[4.0, 5.0, 6.0], [1.0, 2.0, 3.0]]].into_dyn()
    );
}

#[rstest]
fn preprocessor_reports_rows_out_of_range() {
    let preprocessor = demo_table().into_preprocessor();
    let err = check_input(
        &InputArray::from(vec![2_i64]),
        InputKind::Classic,
        Some(&preprocessor),
        &CheckOptions::new(),
    )
    .expect_err("row 2 does not exist");
    assert_eq!(err.code(), CheckInputErrorCode::PreprocessorFailure);
    assert_eq!(err.preprocessor_code(), Some(PreprocessorErrorCode::IndexOutOfBounds));
}

#[rstest]
fn table_rejects_null_rows() {
    let mut builder = FixedSizeListBuilder::new(Float32Builder::new(), 2);
    builder.values().append_value(1.0);
    builder.values().append_value(2.0);
    builder.append(true);
    builder.values().append_null();
    builder.values().append_null();
    builder.append(false);
    let err = DenseLookupTable::try_from_fixed_size_list("demo", &builder.finish())
        .expect_err("null rows must be rejected");
    assert!(matches!(err, DenseLookupTableError::NullRow { row: 1 }));
}

#[rstest]
fn table_rejects_null_values() {
    let mut builder = FixedSizeListBuilder::new(Float32Builder::new(), 2);
    builder.values().append_value(1.0);
    builder.values().append_value(2.0);
    builder.append(true);
    builder.values().append_value(3.0);
    builder.values().append_null();
    builder.append(true);
    let err = DenseLookupTable::try_from_fixed_size_list("demo", &builder.finish())
        .expect_err("null values must be rejected");
    assert!(matches!(
        err,
        DenseLookupTableError::NullValue {
            row: 1,
            value_index: 1
        }
    ));
}

#[rstest]
fn table_rejects_non_float_children() {
    let field = Arc::new(Field::new("item", DataType::Int32, true));
    let values: ArrayRef = Arc::new(arrow_array::Int32Array::from(vec![1, 2, 3, 4]));
    let array = FixedSizeListArray::new(field, 2, values, None);
    let err = DenseLookupTable::try_from_fixed_size_list("demo", &array)
        .expect_err("non-float children must be rejected");
    assert!(matches!(err, DenseLookupTableError::InvalidListValueType { .. }));
}
