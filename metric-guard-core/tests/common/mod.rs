#![allow(dead_code, reason = "each integration test uses a subset of the helpers")]

use std::{collections::HashMap, convert::Infallible, fmt};

use metric_guard_core::{EstimatorName, InputArray, Preprocessor, Value};
use ndarray::{Array2, array};
use rand::{Rng, rngs::SmallRng};

/// Stand-in estimator named like the ones callers attribute diagnostics to.
#[expect(clippy::upper_case_acronyms, reason = "mirrors the estimator's public name")]
pub struct NCA;

impl EstimatorName for NCA {}

/// Ways diagnostics can be attributed in tests.
#[derive(Clone, Copy, Debug)]
pub enum Attribution {
    Instance,
    Name,
    Nobody,
}

impl Attribution {
    pub fn estimator(self) -> Option<&'static dyn EstimatorName> {
        match self {
            Self::Instance => Some(&NCA),
            Self::Name => Some(&"NCA"),
            Self::Nobody => None,
        }
    }

    pub fn context(self) -> &'static str {
        match self {
            Self::Instance | Self::Name => " by NCA",
            Self::Nobody => "",
        }
    }
}

/// Feature matrix backing the preprocessors below.
pub fn feature_table() -> Array2<f64> {
    array![
        [0.89, 0.11, 1.48, 0.12],
        [2.63, 1.08, 1.68, 0.46],
        [1.00, 0.59, 0.62, 1.15],
    ]
}

/// Returns one row of ones with three features per indicator, whatever the
/// indicators are.
pub fn mock_preprocessor() -> Preprocessor {
    preprocessor_returning(|rows| InputArray::from(Array2::<f64>::ones((rows, 3))))
}

/// Returns a preprocessor mapping `n` indicators to `build(n)`.
pub fn preprocessor_returning<F>(build: F) -> Preprocessor
where
    F: Fn(usize) -> InputArray + Send + Sync + 'static,
{
    Preprocessor::from_fn(move |indicators: &InputArray| {
        let rows = indicators.shape().first().copied().unwrap_or(1);
        Ok::<_, Infallible>(build(rows))
    })
}

/// Failure raised by [`file_loader`] for unknown paths.
#[derive(Debug)]
pub struct MissingFile(pub String);

impl fmt::Display for MissingFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no such file: {}", self.0)
    }
}

impl std::error::Error for MissingFile {}

/// Simulates fetching image files from a folder.
pub fn file_loader() -> Preprocessor {
    let table = feature_table();
    let folder: HashMap<String, usize> = (0..table.nrows())
        .map(|row| (format!("img{row}.png"), row))
        .collect();
    Preprocessor::from_fn(move |paths: &InputArray| {
        let mut rows = Vec::new();
        for path in paths.values() {
            let name = path.as_str().unwrap_or_default();
            let row = folder
                .get(name)
                .ok_or_else(|| MissingFile(name.to_owned()))?;
            rows.push(*row);
        }
        Ok::<_, MissingFile>(InputArray::from(table.select(ndarray::Axis(0), &rows)))
    })
}

/// Maps identifiers such as `id2` to rows of [`feature_table`].
pub fn id_loader() -> Preprocessor {
    let table = feature_table();
    Preprocessor::from_fn(move |ids: &InputArray| {
        let rows: Vec<usize> = ids
            .values()
            .iter()
            .filter_map(Value::as_str)
            .filter_map(|id| id.strip_prefix("id"))
            .filter_map(|index| index.parse().ok())
            .collect();
        Ok::<_, Infallible>(InputArray::from(table.select(ndarray::Axis(0), &rows)))
    })
}

/// Random formed points with values in `[-10, 10)`.
pub fn random_points(rng: &mut SmallRng, rows: usize, cols: usize) -> Array2<f64> {
    Array2::from_shape_fn((rows, cols), |_| rng.gen_range(-10.0..10.0))
}

/// Random row indicators addressing a table of `rows` rows.
pub fn random_indices(rng: &mut SmallRng, count: usize, rows: usize) -> Vec<i64> {
    (0..count)
        .map(|_| i64::try_from(rng.gen_range(0..rows)).unwrap_or_default())
        .collect()
}
