//! Input flavours accepted by the checks.

use core::{fmt, str::FromStr};

use crate::error::{CheckInputError, ExpectedInput};

/// Declares whether an input holds points or tuples of points.
///
/// # Examples
/// ```
/// use metric_guard_core::InputKind;
///
/// let kind: InputKind = "tuples".parse().expect("known kind");
/// assert_eq!(kind, InputKind::Tuples);
/// assert!("pairs".parse::<InputKind>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum InputKind {
    /// One row per sample.
    #[default]
    Classic,
    /// Fixed-arity groups of samples.
    Tuples,
}

impl InputKind {
    /// Rank of indicator input for this kind.
    #[must_use]
    pub const fn indicator_rank(self) -> usize {
        match self {
            Self::Classic => 1,
            Self::Tuples => 2,
        }
    }

    /// Rank of formed input for this kind.
    #[must_use]
    pub const fn formed_rank(self) -> usize {
        self.indicator_rank() + 1
    }

    pub(crate) const fn formed(self) -> ExpectedInput {
        match self {
            Self::Classic => ExpectedInput::FormedPoints,
            Self::Tuples => ExpectedInput::FormedTuples,
        }
    }

    pub(crate) const fn indicators_or_formed(self) -> ExpectedInput {
        match self {
            Self::Classic => ExpectedInput::IndicatorsOrPoints,
            Self::Tuples => ExpectedInput::IndicatorsOrTuples,
        }
    }
}

impl FromStr for InputKind {
    type Err = CheckInputError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "classic" => Ok(Self::Classic),
            "tuples" => Ok(Self::Tuples),
            other => Err(CheckInputError::InvalidInputKind {
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Classic => "classic",
            Self::Tuples => "tuples",
        })
    }
}
