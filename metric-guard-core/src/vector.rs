//! Validation of single vectors handed to distance functions.

use ndarray::Array1;

use crate::{
    array::{InputArray, NumericArray, Shape},
    check::coerce,
    error::{CheckInputError, Result},
    options::TargetDType,
};

/// Collapses `input` to a 1D numeric vector.
///
/// Scalars become one-element vectors and unit axes are dropped, so an input
/// with at most one axis longer than one is accepted. `dtype` selects the
/// output dtype; `None` keeps integers and floats as they are.
///
/// # Errors
/// Returns [`CheckInputError::InvalidVector`] when more than one axis is
/// longer than one, and propagates dtype conversion failures.
///
/// # Examples
/// ```
/// use metric_guard_core::{InputArray, NumericArray, validate_vector};
/// use ndarray::array;
///
/// let vector = validate_vector(&InputArray::scalar(1_i64), None).expect("scalars are vectors");
/// assert_eq!(vector, NumericArray::Int64(array![1_i64].into_dyn()));
///
/// let err = validate_vector(&InputArray::from(array![[1, 2], [3, 4]]), None)
///     .expect_err("matrices are not vectors");
/// assert_eq!(err.to_string(), "Input vector should be 1-D.");
/// ```
pub fn validate_vector(input: &InputArray, dtype: Option<TargetDType>) -> Result<NumericArray> {
    let target = dtype.unwrap_or(TargetDType::Numeric);
    if input.ndim() == 1 {
        return coerce(input, target);
    }
    let non_unit = input.shape().iter().filter(|&&len| len != 1).count();
    if non_unit > 1 {
        return Err(CheckInputError::InvalidVector {
            shape: Shape::from(input.shape()),
        });
    }
    let flat: Array1<_> = input.values().iter().cloned().collect();
    coerce(&InputArray::with_dtype(flat.into_dyn(), input.dtype()), target)
}
