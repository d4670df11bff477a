//! Error types for the metric-guard core library.
//!
//! Defines the error enums surfaced by input checking, preprocessing and the
//! metric capabilities, the stable machine-readable codes attached to each
//! variant, and a convenient result alias.

use std::{error::Error as StdError, fmt, sync::Arc};

use thiserror::Error;

use crate::{array::Shape, context::Context, value::DType};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Describes the array layout an input check expected to find.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ExpectedInput {
    /// Two-dimensional array of already formed points.
    FormedPoints,
    /// Three-dimensional array of already formed tuples.
    FormedTuples,
    /// Indicators that a preprocessor can expand, or formed points.
    IndicatorsOrPoints,
    /// Indicator tuples that a preprocessor can expand, or formed tuples.
    IndicatorsOrTuples,
}

impl fmt::Display for ExpectedInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FormedPoints => "2D array of formed points",
            Self::FormedTuples => "3D array of formed tuples",
            Self::IndicatorsOrPoints => "1D array of indicators or 2D array of formed points",
            Self::IndicatorsOrTuples => "2D array of indicators or 3D array of formed tuples",
        })
    }
}

/// Stage of the check at which a rank mismatch was detected.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ShapeStage {
    /// The raw input had the wrong rank and no preprocessor was involved.
    Raw,
    /// The raw input had the wrong rank although a preprocessor was supplied.
    WithPreprocessor,
    /// The preprocessor produced an array of the wrong rank.
    AfterPreprocessor,
}

impl fmt::Display for ShapeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Raw => "",
            Self::WithPreprocessor => " when using a preprocessor",
            Self::AfterPreprocessor => " after the preprocessor has been applied",
        })
    }
}

/// Remedy appended to rank-mismatch messages.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ReshapeHint {
    /// Only reshaping the data can fix the input.
    Reshape,
    /// Reshaping or supplying a preprocessor can fix the input.
    ReshapeOrPreprocess,
}

impl fmt::Display for ReshapeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reshape => Ok(()),
            Self::ReshapeOrPreprocess => f.write_str(" and/or use a preprocessor"),
        }
    }
}

/// Boxed failure raised by a user supplied indicator function.
pub type CallbackError = Arc<dyn StdError + Send + Sync>;

/// An error produced while expanding indicators through a preprocessor.
#[non_exhaustive]
#[derive(Clone, Debug, Error)]
pub enum PreprocessorError {
    /// An indicator addressed a row outside the lookup table.
    #[error("index {index} is out of bounds for axis 0 with size {rows}")]
    IndexOutOfBounds {
        /// Indicator as supplied by the caller.
        index: i64,
        /// Number of rows held by the lookup table.
        rows: usize,
    },
    /// A lookup table was addressed with something other than an integer.
    #[error("indicator {value} cannot index a lookup table; only integers are valid indices")]
    NonIntegerIndicator {
        /// Rendered form of the offending indicator.
        value: String,
    },
    /// The indicator function returned a different number of rows.
    #[error("preprocessor returned {actual} row(s) for {expected} indicator(s)")]
    LengthMismatch {
        /// Number of indicators handed to the preprocessor.
        expected: usize,
        /// Number of rows returned.
        actual: usize,
    },
    /// The indicator function returned a 0-dimensional array.
    #[error("preprocessor returned a 0-dimensional array")]
    ScalarOutput,
    /// Tuples must expose a tuple axis before they can be expanded.
    #[error("tuples must have at least 2 dimensions to be preprocessed, got {ndim}D")]
    NotTuples {
        /// Rank of the supplied tuples.
        ndim: usize,
    },
    /// Expanded tuple columns could not be stacked together.
    #[error("could not stack preprocessed tuple columns: {reason}")]
    Stacking {
        /// Description of the stacking failure.
        reason: String,
    },
    /// A lookup table was built from something that cannot be indexed.
    #[error(
        "Invalid type for the preprocessor: {description}. You should provide either None, an array-like object, or a callable."
    )]
    InvalidType {
        /// Description of the rejected value.
        description: String,
    },
    /// The user supplied indicator function failed.
    #[error("{0}")]
    Callback(#[source] CallbackError),
}

define_error_codes! {
    /// Stable codes describing [`PreprocessorError`] variants.
    enum PreprocessorErrorCode for PreprocessorError {
        /// An indicator addressed a row outside the lookup table.
        IndexOutOfBounds => IndexOutOfBounds { .. } => "PREPROCESSOR_INDEX_OUT_OF_BOUNDS",
        /// A lookup table was addressed with something other than an integer.
        NonIntegerIndicator => NonIntegerIndicator { .. } => "PREPROCESSOR_NON_INTEGER_INDICATOR",
        /// The indicator function returned a different number of rows.
        LengthMismatch => LengthMismatch { .. } => "PREPROCESSOR_LENGTH_MISMATCH",
        /// The indicator function returned a 0-dimensional array.
        ScalarOutput => ScalarOutput => "PREPROCESSOR_SCALAR_OUTPUT",
        /// Tuples must expose a tuple axis before they can be expanded.
        NotTuples => NotTuples { .. } => "PREPROCESSOR_NOT_TUPLES",
        /// Expanded tuple columns could not be stacked together.
        Stacking => Stacking { .. } => "PREPROCESSOR_STACKING",
        /// A lookup table was built from something that cannot be indexed.
        InvalidType => InvalidType { .. } => "PREPROCESSOR_INVALID_TYPE",
        /// The user supplied indicator function failed.
        Callback => Callback(..) => "PREPROCESSOR_CALLBACK",
    }
}

/// Error type produced when validating estimator inputs.
#[non_exhaustive]
#[derive(Clone, Debug, Error)]
pub enum CheckInputError {
    /// The requested input kind is not recognised.
    #[error("Unknown value {value} for type_of_inputs. Valid values are 'classic' or 'tuples'.")]
    InvalidInputKind {
        /// Raw value supplied by the caller.
        value: String,
    },
    /// The input (or the preprocessed input) had the wrong rank.
    #[error(
        "{expected} expected{context}{stage}. Found {found}D array instead:\ninput={input}. Reshape your data{hint}.\n"
    )]
    InvalidShape {
        /// Layout the check expected.
        expected: ExpectedInput,
        /// Stage at which the mismatch was detected.
        stage: ShapeStage,
        /// Remedy suggested to the caller.
        hint: ReshapeHint,
        /// Rank that was found instead.
        found: usize,
        /// Rendered offending array.
        input: Arc<str>,
        /// Estimator responsible for the check.
        context: Context,
    },
    /// Tuples did not hold the declared number of elements.
    #[error(
        "Tuples of {expected} element(s) expected{context}. Got tuples of {found} element(s) instead (shape={shape}):\ninput={input}.\n"
    )]
    TupleArity {
        /// Declared tuple arity.
        expected: usize,
        /// Arity found on axis 1.
        found: usize,
        /// Shape of the offending array.
        shape: Shape,
        /// Rendered offending array.
        input: Arc<str>,
        /// Estimator responsible for the check.
        context: Context,
    },
    /// Fewer samples than required.
    #[error(
        "Found array with {samples} sample(s) (shape={shape}) while a minimum of {minimum} is required{context}."
    )]
    InsufficientSamples {
        /// Samples found on axis 0.
        samples: usize,
        /// Shape of the offending array.
        shape: Shape,
        /// Configured minimum.
        minimum: usize,
        /// Estimator responsible for the check.
        context: Context,
    },
    /// Fewer features than required.
    #[error(
        "Found array with {features} feature(s) (shape={shape}) while a minimum of {minimum} is required{context}."
    )]
    InsufficientFeatures {
        /// Features found on the feature axis.
        features: usize,
        /// Shape of the offending array.
        shape: Shape,
        /// Configured minimum.
        minimum: usize,
        /// Estimator responsible for the check.
        context: Context,
    },
    /// Complex values cannot be used as samples.
    #[error("Complex data not supported\n{input}\n")]
    ComplexData {
        /// Rendered offending array.
        input: Arc<str>,
    },
    /// A value could not be converted to the requested numeric dtype.
    #[error("could not convert string to float: '{value}'")]
    DtypeCoercion {
        /// Offending value.
        value: String,
    },
    /// NaN or infinite values were found while finite values are required.
    #[error("Input contains NaN, infinity or a value too large for {dtype}{context}.")]
    NonFinite {
        /// Dtype of the converted array.
        dtype: DType,
        /// Estimator responsible for the check.
        context: Context,
    },
    /// The preprocessor could not expand the indicators.
    #[error("An error occurred when trying to use the preprocessor: {0}")]
    Preprocessor(#[from] PreprocessorError),
    /// Some pairs compare an element with itself.
    #[error(
        "{collapsed} collapsed pairs found (where the left element is the same as the right element), out of {total} pairs in total."
    )]
    CollapsedPairs {
        /// Number of degenerate pairs.
        collapsed: usize,
        /// Total number of pairs inspected.
        total: usize,
    },
    /// A vector had more than one non-unit dimension.
    #[error("Input vector should be 1-D.")]
    InvalidVector {
        /// Shape of the rejected input.
        shape: Shape,
    },
}

define_error_codes! {
    /// Stable codes describing [`CheckInputError`] variants.
    enum CheckInputErrorCode for CheckInputError {
        /// The requested input kind is not recognised.
        InvalidInputKind => InvalidInputKind { .. } => "CHECK_INPUT_INVALID_KIND",
        /// The input (or the preprocessed input) had the wrong rank.
        InvalidShape => InvalidShape { .. } => "CHECK_INPUT_INVALID_SHAPE",
        /// Tuples did not hold the declared number of elements.
        TupleArity => TupleArity { .. } => "CHECK_INPUT_TUPLE_ARITY",
        /// Fewer samples than required.
        InsufficientSamples => InsufficientSamples { .. } => "CHECK_INPUT_INSUFFICIENT_SAMPLES",
        /// Fewer features than required.
        InsufficientFeatures => InsufficientFeatures { .. } => "CHECK_INPUT_INSUFFICIENT_FEATURES",
        /// Complex values cannot be used as samples.
        ComplexData => ComplexData { .. } => "CHECK_INPUT_COMPLEX_DATA",
        /// A value could not be converted to the requested numeric dtype.
        DtypeCoercion => DtypeCoercion { .. } => "CHECK_INPUT_DTYPE_COERCION",
        /// NaN or infinite values were found while finite values are required.
        NonFinite => NonFinite { .. } => "CHECK_INPUT_NON_FINITE",
        /// The preprocessor could not expand the indicators.
        PreprocessorFailure => Preprocessor(..) => "CHECK_INPUT_PREPROCESSOR_FAILURE",
        /// Some pairs compare an element with itself.
        CollapsedPairs => CollapsedPairs { .. } => "CHECK_INPUT_COLLAPSED_PAIRS",
        /// A vector had more than one non-unit dimension.
        InvalidVector => InvalidVector { .. } => "CHECK_INPUT_INVALID_VECTOR",
    }
}

impl CheckInputError {
    /// Retrieve the inner [`PreprocessorErrorCode`] when the error originated in a preprocessor.
    #[must_use]
    pub const fn preprocessor_code(&self) -> Option<PreprocessorErrorCode> {
        match self {
            Self::Preprocessor(error) => Some(error.code()),
            _ => None,
        }
    }
}

/// Error type produced by the metric capabilities.
#[non_exhaustive]
#[derive(Clone, Debug, Error)]
pub enum MetricError {
    /// Input validation failed.
    #[error(transparent)]
    Input(#[from] CheckInputError),
    /// A validated array did not have the rank the operation needs.
    #[error("expected a {expected}D array but found {found}D")]
    Rank {
        /// Rank the operation needs.
        expected: usize,
        /// Rank that was found.
        found: usize,
    },
    /// Samples and components disagree on the number of features.
    #[error("input has {actual} feature(s) but the metric expects {expected}")]
    FeatureMismatch {
        /// Features expected by the components matrix.
        expected: usize,
        /// Features found in the input.
        actual: usize,
    },
    /// A components matrix must hold at least one entry.
    #[error("components matrix must not be empty")]
    EmptyComponents,
}

define_error_codes! {
    /// Stable codes describing [`MetricError`] variants.
    enum MetricErrorCode for MetricError {
        /// Input validation failed.
        InputFailure => Input(..) => "METRIC_INPUT_FAILURE",
        /// A validated array did not have the rank the operation needs.
        Rank => Rank { .. } => "METRIC_RANK",
        /// Samples and components disagree on the number of features.
        FeatureMismatch => FeatureMismatch { .. } => "METRIC_FEATURE_MISMATCH",
        /// A components matrix must hold at least one entry.
        EmptyComponents => EmptyComponents => "METRIC_EMPTY_COMPONENTS",
    }
}

impl MetricError {
    /// Retrieve the inner [`CheckInputErrorCode`] when input validation failed.
    #[must_use]
    pub const fn input_code(&self) -> Option<CheckInputErrorCode> {
        match self {
            Self::Input(error) => Some(error.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by input checks.
pub type Result<T> = core::result::Result<T, CheckInputError>;
