//! Expansion of indicators into formed samples.
//!
//! A [`Preprocessor`] turns lightweight indicators (row indices, file names,
//! identifiers) into dense feature vectors. Lookup tables fancy-index their
//! rows; indicator functions are called once with the whole indicator array.

use std::{error::Error as StdError, fmt, sync::Arc};

use ndarray::{ArrayD, Axis, IxDyn};
use tracing::{debug, instrument};

use crate::{
    array::InputArray,
    error::{CallbackError, PreprocessorError},
    value::Value,
};

type IndicatorCallback =
    dyn Fn(&InputArray) -> Result<InputArray, CallbackError> + Send + Sync + 'static;

/// Caller supplied function mapping an indicator array to samples.
///
/// # Examples
/// ```
/// use std::convert::Infallible;
///
/// use metric_guard_core::{IndicatorFn, InputArray};
/// use ndarray::array;
///
/// let doubler = IndicatorFn::new(|indicators: &InputArray| {
///     let rows = indicators.shape()[0];
///     Ok::<_, Infallible>(InputArray::from(ndarray::Array2::<f64>::zeros((rows, 2))))
/// });
/// let out = doubler.call(&InputArray::from(array![0_i64, 1, 2])).expect("callback succeeds");
/// assert_eq!(out.shape(), &[3, 2]);
/// ```
#[derive(Clone)]
pub struct IndicatorFn(Arc<IndicatorCallback>);

impl IndicatorFn {
    /// Wraps a fallible function.
    pub fn new<F, E>(callback: F) -> Self
    where
        F: Fn(&InputArray) -> Result<InputArray, E> + Send + Sync + 'static,
        E: StdError + Send + Sync + 'static,
    {
        Self(Arc::new(move |indicators| {
            callback(indicators).map_err(|err| Arc::new(err) as CallbackError)
        }))
    }

    /// Invokes the function.
    ///
    /// # Errors
    /// Returns whatever failure the wrapped function reported.
    pub fn call(&self, indicators: &InputArray) -> Result<InputArray, CallbackError> {
        (self.0)(indicators)
    }
}

impl fmt::Debug for IndicatorFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IndicatorFn(..)")
    }
}

/// Mechanism expanding indicators into samples.
#[derive(Clone, Debug)]
pub enum Preprocessor {
    /// Indicator `i` selects row `i` of the table.
    LookupTable(InputArray),
    /// Indicators are handed to a function that returns the samples.
    IndicatorFn(IndicatorFn),
}

impl Preprocessor {
    /// Builds a lookup-table preprocessor.
    ///
    /// # Errors
    /// Returns [`PreprocessorError::InvalidType`] when `table` is
    /// 0-dimensional and so cannot be indexed.
    ///
    /// # Examples
    /// ```
    /// use metric_guard_core::{InputArray, Preprocessor};
    ///
    /// assert!(Preprocessor::from_array(InputArray::scalar(5_i64)).is_err());
    /// ```
    pub fn from_array(table: InputArray) -> Result<Self, PreprocessorError> {
        if table.ndim() == 0 {
            return Err(PreprocessorError::InvalidType {
                description: format!("0-dimensional {} array {table}", table.dtype()),
            });
        }
        Ok(Self::LookupTable(table))
    }

    /// Builds an indicator-function preprocessor.
    pub fn from_fn<F, E>(callback: F) -> Self
    where
        F: Fn(&InputArray) -> Result<InputArray, E> + Send + Sync + 'static,
        E: StdError + Send + Sync + 'static,
    {
        Self::IndicatorFn(IndicatorFn::new(callback))
    }

    /// Expands `indicators` into samples.
    ///
    /// Lookup tables produce an array of shape
    /// `indicators.shape() ++ table.shape()[1..]`; negative indicators count
    /// from the end of the table. Indicator functions must return one row per
    /// indicator.
    ///
    /// # Errors
    /// Returns [`PreprocessorError`] when an indicator cannot address the
    /// table, or when the function fails or returns a mismatched array.
    pub fn expand(&self, indicators: &InputArray) -> Result<InputArray, PreprocessorError> {
        match self {
            Self::LookupTable(table) => lookup(table, indicators),
            Self::IndicatorFn(callback) => {
                let output = callback.call(indicators).map_err(PreprocessorError::Callback)?;
                if output.ndim() == 0 {
                    return Err(PreprocessorError::ScalarOutput);
                }
                let expected = indicators.shape().first().copied().unwrap_or(1);
                let actual = output.shape()[0];
                if expected != actual {
                    return Err(PreprocessorError::LengthMismatch { expected, actual });
                }
                Ok(output)
            }
        }
    }
}

fn resolve_index(value: &Value, rows: usize) -> Result<usize, PreprocessorError> {
    let index = value
        .as_index()
        .ok_or_else(|| PreprocessorError::NonIntegerIndicator {
            value: value.to_string(),
        })?;
    let out_of_bounds = || PreprocessorError::IndexOutOfBounds { index, rows };
    let signed_rows = i64::try_from(rows).map_err(|_| out_of_bounds())?;
    let resolved = if index < 0 { index + signed_rows } else { index };
    if !(0..signed_rows).contains(&resolved) {
        return Err(out_of_bounds());
    }
    usize::try_from(resolved).map_err(|_| out_of_bounds())
}

fn lookup(table: &InputArray, indicators: &InputArray) -> Result<InputArray, PreprocessorError> {
    let Some((&rows, row_shape)) = table.shape().split_first() else {
        return Err(PreprocessorError::InvalidType {
            description: format!("0-dimensional {} array {table}", table.dtype()),
        });
    };
    let row_len: usize = row_shape.iter().product();
    let mut values = Vec::with_capacity(indicators.values().len() * row_len);
    for indicator in indicators.values() {
        let row = resolve_index(indicator, rows)?;
        values.extend(table.values().index_axis(Axis(0), row).iter().cloned());
    }
    let mut shape = indicators.shape().to_vec();
    shape.extend_from_slice(row_shape);
    let expanded = ArrayD::from_shape_vec(IxDyn(&shape), values).map_err(|err| {
        PreprocessorError::Stacking {
            reason: err.to_string(),
        }
    })?;
    Ok(InputArray::with_dtype(expanded, table.dtype()))
}

/// Expands an array of point indicators.
///
/// # Errors
/// Propagates any [`PreprocessorError`] raised by the expansion.
#[instrument(
    name = "preprocessor.points",
    err,
    skip(points, preprocessor),
    fields(shape = ?points.shape()),
)]
pub fn preprocess_points(
    points: &InputArray,
    preprocessor: &Preprocessor,
) -> Result<InputArray, PreprocessorError> {
    preprocessor.expand(points)
}

/// Expands an array of indicator tuples.
///
/// Each tuple column (axis 1) is expanded separately and the results are
/// stacked back along axis 1, so `(n, k)` indicators become `(n, k, d)`
/// samples for `d`-dimensional rows.
///
/// # Errors
/// Returns [`PreprocessorError::NotTuples`] when `tuples` has fewer than two
/// dimensions and propagates expansion or stacking failures.
#[instrument(
    name = "preprocessor.tuples",
    err,
    skip(tuples, preprocessor),
    fields(shape = ?tuples.shape()),
)]
pub fn preprocess_tuples(
    tuples: &InputArray,
    preprocessor: &Preprocessor,
) -> Result<InputArray, PreprocessorError> {
    if tuples.ndim() < 2 {
        return Err(PreprocessorError::NotTuples { ndim: tuples.ndim() });
    }
    let arity = tuples.shape()[1];
    let mut columns = Vec::with_capacity(arity);
    for position in 0..arity {
        let column = tuples.index_axis(Axis(1), position);
        columns.push(preprocessor.expand(&column)?.insert_axis(Axis(1)));
    }
    debug!(arity, "stacking preprocessed tuple columns");
    stack_columns(&columns)
}

fn stack_columns(columns: &[InputArray]) -> Result<InputArray, PreprocessorError> {
    let Some(first) = columns.first() else {
        return Err(PreprocessorError::Stacking {
            reason: "tuples hold no elements".to_owned(),
        });
    };
    let views: Vec<_> = columns.iter().map(|column| column.values().view()).collect();
    let stacked = ndarray::concatenate(Axis(1), &views).map_err(|err| {
        PreprocessorError::Stacking {
            reason: err.to_string(),
        }
    })?;
    let dtype = first.dtype();
    if columns.iter().all(|column| column.dtype() == dtype) {
        Ok(InputArray::with_dtype(stacked, dtype))
    } else {
        Ok(InputArray::from_values(stacked))
    }
}
