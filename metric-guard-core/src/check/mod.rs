//! Input validation entry point.
//!
//! [`check_input`] dispatches on the rank of the raw input, expands indicators
//! through a preprocessor when one is available, converts the result to a
//! numeric dtype and enforces the size and arity constraints configured in
//! [`CheckOptions`].

mod coerce;
#[cfg(test)]
mod property;

use std::sync::Arc;

use ndarray::Ix3;
use tracing::{debug, instrument, warn};

use crate::{
    array::{InputArray, NumericArray, Shape},
    error::{CheckInputError, ExpectedInput, ReshapeHint, Result, ShapeStage},
    kind::InputKind,
    options::{CheckOptions, TargetDType},
    pairs::check_collapsed_pairs,
    preprocessor::{Preprocessor, preprocess_points, preprocess_tuples},
    value::DType,
    warning::DataConversionWarning,
};

pub(crate) use self::coerce::coerce;

/// Outcome of a successful [`check_input`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct Checked {
    array: NumericArray,
    warnings: Vec<DataConversionWarning>,
}

impl Checked {
    /// Returns the validated array.
    #[must_use]
    pub fn array(&self) -> &NumericArray {
        &self.array
    }

    /// Returns the conversion warnings raised during the check.
    #[must_use]
    pub fn warnings(&self) -> &[DataConversionWarning] {
        &self.warnings
    }

    /// Consumes the outcome and returns the validated array.
    #[must_use]
    pub fn into_array(self) -> NumericArray {
        self.array
    }
}

/// Validates estimator input and converts it to a numeric array.
///
/// Classic input must be a 2D array of points, or a 1D array of indicators
/// when `preprocessor` is supplied. Tuple input must be a 3D array of tuples,
/// or a 2D array of indicator tuples when `preprocessor` is supplied.
///
/// # Errors
/// Returns a [`CheckInputError`] describing the first violated constraint.
///
/// # Examples
/// ```
/// use metric_guard_core::{CheckOptions, InputArray, InputKind, check_input};
/// use ndarray::array;
///
/// let points = InputArray::from(array![[1.0, 2.0], [3.0, 4.0]]);
/// let checked = check_input(&points, InputKind::Classic, None, &CheckOptions::new())
///     .expect("formed points are valid");
/// assert_eq!(checked.array().shape(), &[2, 2]);
///
/// let err = check_input(&InputArray::from(vec![1.0, 2.0]), InputKind::Classic, None, &CheckOptions::new())
///     .expect_err("indicators need a preprocessor");
/// assert!(err.to_string().starts_with("2D array of formed points expected."));
/// ```
#[instrument(
    name = "core.check_input",
    err,
    skip(input, preprocessor, options),
    fields(
        kind = %kind,
        shape = ?input.shape(),
        dtype = %input.dtype(),
        preprocessor = preprocessor.is_some(),
    ),
)]
pub fn check_input(
    input: &InputArray,
    kind: InputKind,
    preprocessor: Option<&Preprocessor>,
    options: &CheckOptions,
) -> Result<Checked> {
    coerce::ensure_real(input)?;
    let preprocessed = dispatch(input, kind, preprocessor, options)?;
    let array = preprocessed.as_ref().unwrap_or(input);
    let mut warnings = Vec::new();
    let numeric = check_array(array, options, &mut warnings)?;

    if numeric.ndim() != kind.formed_rank() {
        return Err(CheckInputError::InvalidShape {
            expected: kind.formed(),
            stage: if preprocessed.is_some() {
                ShapeStage::AfterPreprocessor
            } else {
                ShapeStage::Raw
            },
            hint: ReshapeHint::ReshapeOrPreprocess,
            found: numeric.ndim(),
            input: Arc::from(numeric.to_string()),
            context: options.context().clone(),
        });
    }

    if kind == InputKind::Tuples {
        check_tuples(&numeric, options)?;
    }

    Ok(Checked {
        array: numeric,
        warnings,
    })
}

/// Expands indicators when the rank calls for it and rejects unusable ranks.
fn dispatch(
    input: &InputArray,
    kind: InputKind,
    preprocessor: Option<&Preprocessor>,
    options: &CheckOptions,
) -> Result<Option<InputArray>> {
    let ndim = input.ndim();
    if ndim == kind.formed_rank() {
        debug!(ndim, "input holds formed samples");
        return Ok(None);
    }
    let shape_error = |expected: ExpectedInput, stage: ShapeStage, hint: ReshapeHint| {
        CheckInputError::InvalidShape {
            expected,
            stage,
            hint,
            found: ndim,
            input: Arc::from(input.to_string()),
            context: options.context().clone(),
        }
    };
    match (preprocessor, ndim == kind.indicator_rank()) {
        (Some(preprocessor), true) => {
            debug!(ndim, "expanding indicators through the preprocessor");
            let expanded = match kind {
                InputKind::Classic => preprocess_points(input, preprocessor),
                InputKind::Tuples => preprocess_tuples(input, preprocessor),
            }?;
            Ok(Some(expanded))
        }
        (None, true) => Err(shape_error(
            kind.formed(),
            ShapeStage::Raw,
            ReshapeHint::ReshapeOrPreprocess,
        )),
        (Some(_), false) => Err(shape_error(
            kind.indicators_or_formed(),
            ShapeStage::WithPreprocessor,
            ReshapeHint::Reshape,
        )),
        (None, false) => Err(shape_error(kind.formed(), ShapeStage::Raw, ReshapeHint::Reshape)),
    }
}

// The numeric target keeps bool values as they are; int64 only stores them.
fn converts_dtype(source: DType, numeric: &NumericArray, target: TargetDType) -> bool {
    !matches!((target, source), (TargetDType::Numeric, DType::Bool)) && numeric.dtype() != source
}

/// Converts `array` and applies the rank-independent checks.
fn check_array(
    array: &InputArray,
    options: &CheckOptions,
    warnings: &mut Vec<DataConversionWarning>,
) -> Result<NumericArray> {
    let numeric = coerce(array, options.dtype())?;
    let context = options.context();

    if options.force_all_finite() && !numeric.is_finite() {
        return Err(CheckInputError::NonFinite {
            dtype: numeric.dtype(),
            context: context.clone(),
        });
    }

    let shape = numeric.shape();
    if options.min_samples() > 0
        && let Some(&samples) = shape.first()
        && samples < options.min_samples()
    {
        return Err(CheckInputError::InsufficientSamples {
            samples,
            shape: Shape::from(shape),
            minimum: options.min_samples(),
            context: context.clone(),
        });
    }
    if options.min_features() > 0 && shape.len() == 2 {
        ensure_min_features(shape, 1, options)?;
    }

    if options.warn_on_dtype() && converts_dtype(array.dtype(), &numeric, options.dtype()) {
        let warning = DataConversionWarning::new(array.dtype(), numeric.dtype(), context.clone());
        warn!(
            from = %warning.source_dtype(),
            to = %warning.target_dtype(),
            estimator = context.name().unwrap_or_default(),
            "{warning}"
        );
        warnings.push(warning);
    }
    Ok(numeric)
}

fn ensure_min_features(shape: &[usize], axis: usize, options: &CheckOptions) -> Result<()> {
    let features = shape.get(axis).copied().unwrap_or_default();
    if features < options.min_features() {
        return Err(CheckInputError::InsufficientFeatures {
            features,
            shape: Shape::from(shape),
            minimum: options.min_features(),
            context: options.context().clone(),
        });
    }
    Ok(())
}

/// Applies the checks specific to 3D tuple arrays.
fn check_tuples(numeric: &NumericArray, options: &CheckOptions) -> Result<()> {
    let shape = numeric.shape();
    if options.min_features() > 0 {
        ensure_min_features(shape, 2, options)?;
    }
    let found = shape.get(1).copied().unwrap_or_default();
    if let Some(expected) = options.tuple_size()
        && expected != found
    {
        return Err(CheckInputError::TupleArity {
            expected,
            found,
            shape: Shape::from(shape),
            input: Arc::from(numeric.to_string()),
            context: options.context().clone(),
        });
    }
    if options.reject_collapsed_pairs() && found == 2 {
        let pairs = numeric
            .clone()
            .into_f64()
            .into_dimensionality::<Ix3>()
            .map_err(|_| CheckInputError::InvalidShape {
                expected: ExpectedInput::FormedTuples,
                stage: ShapeStage::Raw,
                hint: ReshapeHint::Reshape,
                found: shape.len(),
                input: Arc::from(numeric.to_string()),
                context: options.context().clone(),
            })?;
        check_collapsed_pairs(pairs.view())?;
    }
    Ok(())
}
