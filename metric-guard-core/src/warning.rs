//! Non-fatal diagnostics raised while checking inputs.

use core::fmt;

use crate::{context::Context, value::DType};

/// Reports that input data was silently converted to another dtype.
///
/// # Examples
/// ```
/// use metric_guard_core::{Context, DataConversionWarning, DType};
///
/// let warning = DataConversionWarning::new(DType::Object, DType::Float64, Context::named("NCA"));
/// assert_eq!(
///     warning.to_string(),
///     "Data with input dtype object was converted to float64 by NCA."
/// );
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct DataConversionWarning {
    from: DType,
    to: DType,
    context: Context,
}

impl DataConversionWarning {
    /// Creates a warning for a conversion from `from` to `to`.
    #[must_use]
    pub fn new(from: DType, to: DType, context: Context) -> Self {
        Self { from, to, context }
    }

    /// Returns the dtype of the input.
    #[must_use]
    pub fn source_dtype(&self) -> DType {
        self.from
    }

    /// Returns the dtype of the output.
    #[must_use]
    pub fn target_dtype(&self) -> DType {
        self.to
    }

    /// Returns the estimator context.
    #[must_use]
    pub fn context(&self) -> &Context {
        &self.context
    }
}

impl fmt::Display for DataConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Data with input dtype {} was converted to {}{}.",
            self.from, self.to, self.context
        )
    }
}
