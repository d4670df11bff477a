//! Mahalanobis metric built from a learned linear map.

use std::borrow::Cow;

use ndarray::{Array1, Array2, ArrayView1, Ix1};

use crate::{
    array::InputArray,
    capability::{PointTransformer, PreparesInputs, TupleScorer, prepare_matrix},
    context::EstimatorName,
    error::MetricError,
    options::TargetDType,
    preprocessor::Preprocessor,
    vector::validate_vector,
};

/// Metric `d(x, y) = ‖L(x − y)‖` for a components matrix `L`.
///
/// `L` has shape `(n_components, n_features)`. Every operation checks its
/// input first, so indicators can be passed whenever a preprocessor is set.
///
/// # Examples
/// ```
/// use metric_guard_core::{InputArray, MahalanobisMetric, TupleScorer};
/// use ndarray::array;
///
/// let metric = MahalanobisMetric::new(array![[2.0, 0.0], [0.0, 1.0]])
///     .expect("components are not empty");
/// let pairs = InputArray::from(array![[[0.0, 0.0], [1.0, 0.0]]]);
/// let scores = metric.score_pairs(&pairs).expect("pairs are valid");
/// assert_eq!(scores[0], 2.0);
/// ```
#[derive(Clone, Debug)]
pub struct MahalanobisMetric {
    name: Option<String>,
    components: Array2<f64>,
    preprocessor: Option<Preprocessor>,
    tuple_size: Option<usize>,
}

impl MahalanobisMetric {
    /// Creates a metric from its components matrix.
    ///
    /// # Errors
    /// Returns [`MetricError::EmptyComponents`] when `components` holds no
    /// entries.
    pub fn new(components: Array2<f64>) -> Result<Self, MetricError> {
        if components.is_empty() {
            return Err(MetricError::EmptyComponents);
        }
        Ok(Self {
            name: None,
            components,
            preprocessor: None,
            tuple_size: None,
        })
    }

    /// Overrides the name used in diagnostics.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the preprocessor used to expand indicators.
    #[must_use]
    pub fn with_preprocessor(mut self, preprocessor: Preprocessor) -> Self {
        self.preprocessor = Some(preprocessor);
        self
    }

    /// Sets the arity of the tuples the metric is fitted on.
    #[must_use]
    pub fn with_tuple_size(mut self, tuple_size: impl Into<Option<usize>>) -> Self {
        self.tuple_size = tuple_size.into();
        self
    }

    /// Returns the components matrix `L`.
    #[must_use]
    pub fn components(&self) -> &Array2<f64> {
        &self.components
    }

    /// Returns the number of features the metric expects.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.components.ncols()
    }

    /// Returns `M = LᵀL`.
    #[must_use]
    pub fn mahalanobis_matrix(&self) -> Array2<f64> {
        self.components.t().dot(&self.components)
    }

    /// Returns a distance function over two vectors.
    ///
    /// Each argument is validated with [`validate_vector`] and converted to
    /// `float64`.
    ///
    /// # Examples
    /// ```
    /// use metric_guard_core::{InputArray, MahalanobisMetric};
    /// use ndarray::array;
    ///
    /// let metric = MahalanobisMetric::new(array![[3.0, 0.0], [0.0, 4.0]]).expect("valid");
    /// let distance = metric.metric();
    /// let d = distance(
    ///     &InputArray::from(vec![1.0, 1.0]),
    ///     &InputArray::from(array![[0.0], [0.0]]),
    /// )
    /// .expect("vectors are valid");
    /// assert_eq!(d, 5.0);
    /// ```
    pub fn metric(&self) -> impl Fn(&InputArray, &InputArray) -> Result<f64, MetricError> + '_ {
        move |left, right| {
            let left = self.vector(left)?;
            let right = self.vector(right)?;
            Ok(self.distance(left.view(), right.view()))
        }
    }

    fn vector(&self, input: &InputArray) -> Result<Array1<f64>, MetricError> {
        let vector = validate_vector(input, Some(TargetDType::Float64))?.into_f64();
        let found = vector.ndim();
        let vector = vector
            .into_dimensionality::<Ix1>()
            .map_err(|_| MetricError::Rank { expected: 1, found })?;
        if vector.len() != self.n_features() {
            return Err(MetricError::FeatureMismatch {
                expected: self.n_features(),
                actual: vector.len(),
            });
        }
        Ok(vector)
    }

    fn distance(&self, left: ArrayView1<'_, f64>, right: ArrayView1<'_, f64>) -> f64 {
        let projected = self.components.dot(&(&left - &right));
        projected.dot(&projected).sqrt()
    }
}

impl EstimatorName for MahalanobisMetric {
    fn estimator_name(&self) -> Cow<'_, str> {
        self.name
            .as_deref()
            .map_or(Cow::Borrowed("MahalanobisMetric"), Cow::Borrowed)
    }
}

impl PreparesInputs for MahalanobisMetric {
    fn preprocessor(&self) -> Option<&Preprocessor> {
        self.preprocessor.as_ref()
    }

    fn tuple_size(&self) -> Option<usize> {
        self.tuple_size
    }
}

impl PointTransformer for MahalanobisMetric {
    fn transform(&self, points: &InputArray) -> Result<Array2<f64>, MetricError> {
        let points = prepare_matrix(self, points)?;
        if points.ncols() != self.n_features() {
            return Err(MetricError::FeatureMismatch {
                expected: self.n_features(),
                actual: points.ncols(),
            });
        }
        Ok(points.dot(&self.components.t()))
    }
}

impl TupleScorer for MahalanobisMetric {
    fn expected_features(&self) -> Option<usize> {
        Some(self.n_features())
    }

    fn score_pair(&self, left: ArrayView1<'_, f64>, right: ArrayView1<'_, f64>) -> f64 {
        self.distance(left, right)
    }
}
