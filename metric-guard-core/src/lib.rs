//! Metric-guard core library.
//!
//! Validates and normalises the inputs handed to metric-learning estimators:
//! points or tuples of points, given either as formed samples or as
//! indicators expanded through a [`Preprocessor`].
#![cfg_attr(docsrs, feature(doc_cfg))]

mod array;
mod capability;
mod check;
mod context;
mod error;
mod kind;
mod mahalanobis;
mod options;
mod pairs;
mod preprocessor;
mod value;
mod vector;
mod warning;

#[cfg(test)]
pub(crate) mod test_utils;

pub use crate::{
    array::{InputArray, NumericArray, Shape},
    capability::{PointTransformer, PreparesInputs, TupleScorer},
    check::{Checked, check_input},
    context::{Context, EstimatorName, make_context, make_name},
    error::{
        CallbackError, CheckInputError, CheckInputErrorCode, ExpectedInput, MetricError,
        MetricErrorCode, PreprocessorError, PreprocessorErrorCode, ReshapeHint, Result,
        ShapeStage,
    },
    kind::InputKind,
    mahalanobis::MahalanobisMetric,
    options::{CheckOptions, TargetDType},
    pairs::check_collapsed_pairs,
    preprocessor::{IndicatorFn, Preprocessor, preprocess_points, preprocess_tuples},
    value::{Complex, DType, Value},
    vector::validate_vector,
    warning::DataConversionWarning,
};
