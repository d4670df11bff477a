//! Naming of the estimator responsible for a check.
//!
//! Diagnostics carry a context suffix such as `" by NCA"` so callers can tell
//! which estimator rejected their input.

use std::{borrow::Cow, fmt, sync::Arc};

/// Provides the name used to attribute diagnostics to an estimator.
///
/// The default implementation yields the unqualified type name, without
/// generic parameters.
///
/// # Examples
/// ```
/// use metric_guard_core::EstimatorName;
///
/// struct Itml;
/// impl EstimatorName for Itml {}
///
/// assert_eq!(Itml.estimator_name(), "Itml");
/// assert_eq!("NCA".estimator_name(), "NCA");
/// ```
pub trait EstimatorName {
    /// Returns the estimator's display name.
    fn estimator_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(short_type_name(core::any::type_name::<Self>()))
    }
}

fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

impl EstimatorName for str {
    fn estimator_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl EstimatorName for String {
    fn estimator_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl<T> EstimatorName for &T
where
    T: EstimatorName + ?Sized,
{
    fn estimator_name(&self) -> Cow<'_, str> {
        (**self).estimator_name()
    }
}

/// Suffix naming the estimator behind a diagnostic.
///
/// Displays as `" by <name>"` or as the empty string when no estimator is
/// known.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Context {
    name: Option<Arc<str>>,
}

impl Context {
    /// Builds a context naming `name`.
    #[must_use]
    pub fn named(name: impl AsRef<str>) -> Self {
        Self {
            name: Some(Arc::from(name.as_ref())),
        }
    }

    /// Builds a context for an estimator.
    #[must_use]
    pub fn of(estimator: &dyn EstimatorName) -> Self {
        Self::named(estimator.estimator_name())
    }

    /// Builds an empty context.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns the estimator name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, " by {name}"),
            None => Ok(()),
        }
    }
}

/// Returns the name of `estimator`, or `None` when no estimator is given.
///
/// # Examples
/// ```
/// use metric_guard_core::make_name;
///
/// assert_eq!(make_name(Some(&"NCA")), Some("NCA".to_owned()));
/// assert_eq!(make_name(None), None);
/// ```
#[must_use]
pub fn make_name(estimator: Option<&dyn EstimatorName>) -> Option<String> {
    estimator.map(|estimator| estimator.estimator_name().into_owned())
}

/// Returns the context suffix for `estimator`.
///
/// # Examples
/// ```
/// use metric_guard_core::make_context;
///
/// assert_eq!(make_context(Some(&"NCA")).to_string(), " by NCA");
/// assert_eq!(make_context(None).to_string(), "");
/// ```
#[must_use]
pub fn make_context(estimator: Option<&dyn EstimatorName>) -> Context {
    estimator.map_or_else(Context::none, Context::of)
}
