//! Constraint bundle applied by [`crate::check_input`].

use crate::context::{Context, EstimatorName};

/// Numeric dtype requested from the checks.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum TargetDType {
    /// Keep integer and float data as is; convert everything else to `float64`.
    Numeric,
    /// Convert to 32-bit floats.
    Float32,
    /// Convert to 64-bit floats.
    #[default]
    Float64,
}

/// Configures the constraints enforced by [`crate::check_input`].
///
/// # Examples
/// ```
/// use metric_guard_core::{CheckOptions, TargetDType};
///
/// let options = CheckOptions::new()
///     .with_tuple_size(2)
///     .with_min_samples(3)
///     .with_dtype(TargetDType::Numeric)
///     .with_warn_on_dtype(true)
///     .with_estimator(&"MMC");
/// assert_eq!(options.tuple_size(), Some(2));
/// assert_eq!(options.min_samples(), 3);
/// assert_eq!(options.context().to_string(), " by MMC");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckOptions {
    tuple_size: Option<usize>,
    min_samples: usize,
    min_features: usize,
    dtype: TargetDType,
    warn_on_dtype: bool,
    force_all_finite: bool,
    reject_collapsed_pairs: bool,
    context: Context,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            tuple_size: None,
            min_samples: 1,
            min_features: 1,
            dtype: TargetDType::Float64,
            warn_on_dtype: false,
            force_all_finite: true,
            reject_collapsed_pairs: false,
            context: Context::none(),
        }
    }
}

impl CheckOptions {
    /// Creates options populated with the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the expected tuple arity; `None` disables the arity check.
    #[must_use]
    pub fn with_tuple_size(mut self, tuple_size: impl Into<Option<usize>>) -> Self {
        self.tuple_size = tuple_size.into();
        self
    }

    /// Sets the minimum number of samples; `0` disables the check.
    #[must_use]
    pub fn with_min_samples(mut self, minimum: usize) -> Self {
        self.min_samples = minimum;
        self
    }

    /// Sets the minimum number of features; `0` disables the check.
    #[must_use]
    pub fn with_min_features(mut self, minimum: usize) -> Self {
        self.min_features = minimum;
        self
    }

    /// Sets the dtype the output is converted to.
    #[must_use]
    pub fn with_dtype(mut self, dtype: TargetDType) -> Self {
        self.dtype = dtype;
        self
    }

    /// Requests a [`crate::DataConversionWarning`] whenever the dtype changes.
    #[must_use]
    pub fn with_warn_on_dtype(mut self, warn: bool) -> Self {
        self.warn_on_dtype = warn;
        self
    }

    /// Controls whether NaN and infinite values are rejected.
    #[must_use]
    pub fn with_force_all_finite(mut self, force: bool) -> Self {
        self.force_all_finite = force;
        self
    }

    /// Controls whether pairs comparing an element with itself are rejected.
    #[must_use]
    pub fn with_reject_collapsed_pairs(mut self, reject: bool) -> Self {
        self.reject_collapsed_pairs = reject;
        self
    }

    /// Attributes diagnostics to `context`.
    #[must_use]
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    /// Attributes diagnostics to `estimator`.
    #[must_use]
    pub fn with_estimator(self, estimator: &dyn EstimatorName) -> Self {
        self.with_context(Context::of(estimator))
    }

    /// Returns the expected tuple arity.
    #[must_use]
    pub fn tuple_size(&self) -> Option<usize> {
        self.tuple_size
    }

    /// Returns the minimum number of samples.
    #[must_use]
    pub fn min_samples(&self) -> usize {
        self.min_samples
    }

    /// Returns the minimum number of features.
    #[must_use]
    pub fn min_features(&self) -> usize {
        self.min_features
    }

    /// Returns the requested dtype.
    #[must_use]
    pub fn dtype(&self) -> TargetDType {
        self.dtype
    }

    /// Reports whether dtype changes produce warnings.
    #[must_use]
    pub fn warn_on_dtype(&self) -> bool {
        self.warn_on_dtype
    }

    /// Reports whether non-finite values are rejected.
    #[must_use]
    pub fn force_all_finite(&self) -> bool {
        self.force_all_finite
    }

    /// Reports whether collapsed pairs are rejected.
    #[must_use]
    pub fn reject_collapsed_pairs(&self) -> bool {
        self.reject_collapsed_pairs
    }

    /// Returns the context attached to diagnostics.
    #[must_use]
    pub fn context(&self) -> &Context {
        &self.context
    }
}
