//! Property tests for [`check_input`].
//!
//! Covers idempotence on already valid input, shape preservation for formed
//! points, agreement between preprocessor flavours, and arity reporting.

use std::convert::Infallible;

use ndarray::{Array2, Array3, ArrayD, Axis};
use proptest::prelude::*;
use test_strategy::Arbitrary;

use super::check_input;
use crate::{
    array::{InputArray, NumericArray},
    error::CheckInputError,
    kind::InputKind,
    options::{CheckOptions, TargetDType},
    preprocessor::Preprocessor,
    test_utils::suite_proptest_config,
};

/// Preprocessor flavour under test.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Arbitrary)]
enum Flavour {
    /// Rows fetched by fancy indexing.
    #[weight(2)]
    LookupTable,
    /// Rows fetched by a callback closing over the same table.
    IndicatorFn,
}

fn matrix(max_rows: usize, max_cols: usize) -> impl Strategy<Value = Array2<f64>> {
    (1..=max_rows, 1..=max_cols).prop_flat_map(|(rows, cols)| {
        proptest::collection::vec(-1e6_f64..1e6, rows * cols).prop_map(move |values| {
            Array2::from_shape_vec((rows, cols), values).unwrap_or_else(|_| Array2::zeros((rows, cols)))
        })
    })
}

fn table_and_indices() -> impl Strategy<Value = (Array2<f64>, Vec<i64>)> {
    matrix(6, 4).prop_flat_map(|table| {
        let rows = i64::try_from(table.nrows()).unwrap_or(i64::MAX);
        let indices = proptest::collection::vec(0..rows, 1..8);
        (Just(table), indices)
    })
}

fn build_preprocessor(flavour: Flavour, table: &Array2<f64>) -> Preprocessor {
    match flavour {
        Flavour::LookupTable => Preprocessor::LookupTable(InputArray::from(table.clone())),
        Flavour::IndicatorFn => {
            let table = table.clone();
            Preprocessor::from_fn(move |indicators: &InputArray| {
                let rows: Vec<usize> = indicators
                    .values()
                    .iter()
                    .filter_map(|value| value.as_index())
                    .filter_map(|index| usize::try_from(index).ok())
                    .collect();
                Ok::<_, Infallible>(InputArray::from(table.select(Axis(0), &rows)))
            })
        }
    }
}

fn as_f64(array: &NumericArray) -> ArrayD<f64> {
    array.clone().into_f64()
}

proptest! {
    #![proptest_config(suite_proptest_config(128))]

    #[test]
    fn check_input_is_idempotent(points in matrix(8, 5)) {
        let options = CheckOptions::new();
        let first = check_input(&InputArray::from(points), InputKind::Classic, None, &options)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        let again = InputArray::from(as_f64(first.array()));
        let second = check_input(&again, InputKind::Classic, None, &options)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert_eq!(first.array(), second.array());
        prop_assert!(second.warnings().is_empty());
    }

    #[test]
    fn formed_points_keep_their_shape(points in matrix(8, 5), numeric in any::<bool>()) {
        let target = if numeric { TargetDType::Numeric } else { TargetDType::Float32 };
        let options = CheckOptions::new().with_dtype(target);
        let checked = check_input(&InputArray::from(points.clone()), InputKind::Classic, None, &options)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert_eq!(checked.array().shape(), points.shape());
    }

    #[test]
    fn expanded_points_match_table_rows(
        (table, indices) in table_and_indices(),
        flavour in any::<Flavour>(),
    ) {
        let preprocessor = build_preprocessor(flavour, &table);
        let indicators = InputArray::from(indices.clone());
        let checked = check_input(&indicators, InputKind::Classic, Some(&preprocessor), &CheckOptions::new())
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        let rows: Vec<usize> = indices.iter().filter_map(|&index| usize::try_from(index).ok()).collect();
        prop_assert_eq!(as_f64(checked.array()), table.select(Axis(0), &rows).into_dyn());
    }

    #[test]
    fn tuple_arity_mismatch_names_both_arities(
        samples in 1_usize..4,
        found in 1_usize..6,
        expected in 1_usize..6,
        features in 1_usize..4,
    ) {
        prop_assume!(found != expected);
        let tuples = InputArray::from(Array3::<f64>::ones((samples, found, features)));
        let options = CheckOptions::new().with_tuple_size(expected);
        let err = check_input(&tuples, InputKind::Tuples, None, &options)
            .expect_err("arity differs");
        let message = err.to_string();
        let names_both = matches!(
            err,
            CheckInputError::TupleArity { expected: e, found: f, .. } if e == expected && f == found
        );
        prop_assert!(names_both);
        let expected_prefix = format!("Tuples of {expected} element(s) expected.");
        let found_fragment = format!("Got tuples of {found} element(s) instead");
        prop_assert!(message.starts_with(&expected_prefix));
        prop_assert!(message.contains(&found_fragment));
    }
}
