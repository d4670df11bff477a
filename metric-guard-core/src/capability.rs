//! Capabilities composed by estimators that consume checked input.
//!
//! Estimators implement [`PreparesInputs`] to expose their preprocessor and
//! tuple arity, then opt into [`PointTransformer`] or [`TupleScorer`] for the
//! operations they support. The default methods route every input through
//! [`check_input`] with the estimator's own context.

use ndarray::{Array1, Array2, ArrayView1, Ix2, Ix3};

use crate::{
    array::InputArray,
    check::{Checked, check_input},
    context::{Context, EstimatorName},
    error::{CheckInputError, MetricError},
    kind::InputKind,
    options::CheckOptions,
    preprocessor::Preprocessor,
};

/// Access to the configuration an estimator applies to its inputs.
///
/// # Examples
/// ```
/// use metric_guard_core::{EstimatorName, InputArray, PreparesInputs, Preprocessor};
/// use ndarray::array;
///
/// struct Itml;
/// impl EstimatorName for Itml {}
/// impl PreparesInputs for Itml {
///     fn preprocessor(&self) -> Option<&Preprocessor> {
///         None
///     }
///     fn tuple_size(&self) -> Option<usize> {
///         Some(2)
///     }
/// }
///
/// let err = Itml
///     .prepare_tuples(&InputArray::from(ndarray::Array3::<f64>::zeros((2, 3, 2))))
///     .expect_err("Itml learns from pairs");
/// assert!(err.to_string().starts_with("Tuples of 2 element(s) expected by Itml."));
/// ```
pub trait PreparesInputs: EstimatorName {
    /// Returns the preprocessor used to expand indicators, if any.
    fn preprocessor(&self) -> Option<&Preprocessor>;

    /// Returns the arity of the tuples the estimator learns from.
    fn tuple_size(&self) -> Option<usize> {
        None
    }

    /// Returns the base options used for every check.
    fn input_options(&self) -> CheckOptions {
        CheckOptions::new().with_context(Context::named(self.estimator_name()))
    }

    /// Checks classic input.
    ///
    /// # Errors
    /// Propagates the [`CheckInputError`] raised by [`check_input`].
    fn prepare_points(&self, points: &InputArray) -> Result<Checked, CheckInputError> {
        check_input(
            points,
            InputKind::Classic,
            self.preprocessor(),
            &self.input_options(),
        )
    }

    /// Checks tuple input against the estimator's own arity.
    ///
    /// # Errors
    /// Propagates the [`CheckInputError`] raised by [`check_input`].
    fn prepare_tuples(&self, tuples: &InputArray) -> Result<Checked, CheckInputError> {
        let options = self.input_options().with_tuple_size(self.tuple_size());
        check_input(tuples, InputKind::Tuples, self.preprocessor(), &options)
    }
}

/// Estimators that map points into a learned space.
pub trait PointTransformer: PreparesInputs {
    /// Transforms checked points.
    ///
    /// # Errors
    /// Returns [`MetricError`] when the points fail validation or do not match
    /// the learned dimensionality.
    fn transform(&self, points: &InputArray) -> Result<Array2<f64>, MetricError>;
}

/// Estimators that score pairs of points.
pub trait TupleScorer: PreparesInputs {
    /// Number of features each element must carry, when fixed.
    fn expected_features(&self) -> Option<usize> {
        None
    }

    /// Scores one pair.
    fn score_pair(&self, left: ArrayView1<'_, f64>, right: ArrayView1<'_, f64>) -> f64;

    /// Checks `pairs` and scores each of them.
    ///
    /// Pairs are always checked with an arity of two, whatever tuples the
    /// estimator learns from.
    ///
    /// # Errors
    /// Returns [`MetricError`] when the pairs fail validation or carry a
    /// different number of features than expected.
    fn score_pairs(&self, pairs: &InputArray) -> Result<Array1<f64>, MetricError> {
        let options = self.input_options().with_tuple_size(2);
        let checked = check_input(pairs, InputKind::Tuples, self.preprocessor(), &options)?;
        let pairs = into_f64_rank::<Ix3>(checked)?;
        let features = pairs.dim().2;
        if let Some(expected) = self.expected_features()
            && expected != features
        {
            return Err(MetricError::FeatureMismatch {
                expected,
                actual: features,
            });
        }
        Ok(pairs
            .outer_iter()
            .map(|pair| self.score_pair(pair.row(0), pair.row(1)))
            .collect())
    }
}

/// Converts checked output to a `float64` array of fixed rank.
pub(crate) fn into_f64_rank<D: ndarray::Dimension>(
    checked: Checked,
) -> Result<ndarray::Array<f64, D>, MetricError> {
    let array = checked.into_array().into_f64();
    let found = array.ndim();
    array.into_dimensionality::<D>().map_err(|_| MetricError::Rank {
        expected: D::NDIM.unwrap_or(found),
        found,
    })
}

/// Shorthand for checked, transformed points.
pub(crate) fn prepare_matrix<E>(estimator: &E, points: &InputArray) -> Result<Array2<f64>, MetricError>
where
    E: PreparesInputs + ?Sized,
{
    into_f64_rank::<Ix2>(estimator.prepare_points(points)?)
}
