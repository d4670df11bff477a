//! Detection of degenerate pairs.

use std::sync::Arc;

use ndarray::{ArrayView3, Axis};

use crate::{
    array::Shape,
    context::Context,
    error::{CheckInputError, Result},
};

/// Pairs whose elements lie closer than this are treated as collapsed.
const COLLAPSE_TOLERANCE: f64 = 1e-9;

/// Fails when any pair compares an element with itself.
///
/// `pairs` has shape `(n_pairs, 2, n_features)`. Two elements are considered
/// identical when their Euclidean distance is below `1e-9`.
///
/// # Errors
/// Returns [`CheckInputError::CollapsedPairs`] with the number of collapsed
/// pairs, or [`CheckInputError::TupleArity`] when axis 1 cannot hold pairs.
///
/// # Examples
/// ```
/// use metric_guard_core::check_collapsed_pairs;
/// use ndarray::array;
///
/// let pairs = array![[[0.1, 3.3], [0.1, 3.3]], [[0.1, 3.3], [3.3, 0.1]]];
/// let err = check_collapsed_pairs(pairs.view()).expect_err("first pair is collapsed");
/// assert_eq!(
///     err.to_string(),
///     "1 collapsed pairs found (where the left element is the same as the right element), out of 2 pairs in total."
/// );
/// ```
pub fn check_collapsed_pairs(pairs: ArrayView3<'_, f64>) -> Result<()> {
    let (total, arity, _) = pairs.dim();
    if arity < 2 {
        return Err(CheckInputError::TupleArity {
            expected: 2,
            found: arity,
            shape: Shape::from(pairs.shape()),
            input: Arc::from(pairs.to_string()),
            context: Context::none(),
        });
    }
    let left = pairs.index_axis(Axis(1), 0);
    let right = pairs.index_axis(Axis(1), 1);
    let collapsed = left
        .outer_iter()
        .zip(right.outer_iter())
        .filter(|(lhs, rhs)| {
            let squared: f64 = lhs
                .iter()
                .zip(rhs.iter())
                .map(|(a, b)| (a - b) * (a - b))
                .sum();
            squared.sqrt() < COLLAPSE_TOLERANCE
        })
        .count();
    if collapsed > 0 {
        return Err(CheckInputError::CollapsedPairs { collapsed, total });
    }
    Ok(())
}
