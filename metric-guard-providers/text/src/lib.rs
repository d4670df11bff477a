//! Keyed text provider mapping string indicators to feature vectors.
//!
//! Sources hold one sample per line: a key followed by whitespace-separated
//! values, as in `img1.png 0.5 1.25 3`. Blank lines and lines starting with
//! `#` are ignored.
use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    sync::Arc,
};

use metric_guard_core::{InputArray, Preprocessor};
use ndarray::{ArrayD, IxDyn, ShapeError};
use thiserror::Error;
use tracing::{debug, instrument};

/// Largest edit distance at which an unknown key still gets a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Errors raised while reading or querying a [`KeyedLoader`].
#[derive(Debug, Error)]
pub enum KeyedLoaderError {
    #[error("keyed source holds no samples")]
    EmptyInput,
    #[error("line {line}: key `{key}` has no values")]
    MissingValues { line: usize, key: String },
    #[error("line {line}: `{token}` is not a number")]
    InvalidNumber { line: usize, token: String },
    #[error("line {line}: expected {expected} value(s) but found {actual}")]
    InconsistentDimension {
        line: usize,
        expected: usize,
        actual: usize,
    },
    #[error("line {line}: key `{key}` is already defined")]
    DuplicateKey { line: usize, key: String },
    #[error("unknown key `{key}`{}", suggestion_hint(.suggestion.as_deref()))]
    UnknownKey {
        key: String,
        suggestion: Option<String>,
    },
    #[error("indicator {value} is not a string key")]
    NonStringIndicator { value: String },
    #[error("could not shape loaded rows: {0}")]
    Shape(#[from] ShapeError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

fn suggestion_hint(suggestion: Option<&str>) -> String {
    suggestion.map_or_else(String::new, |key| format!("; did you mean `{key}`?"))
}

/// Feature vectors addressed by string keys.
#[derive(Debug)]
pub struct KeyedLoader {
    name: String,
    keys: Vec<String>,
    rows: HashMap<String, usize>,
    dimension: usize,
    values: Vec<f64>,
}

impl KeyedLoader {
    /// Reads a keyed source.
    ///
    /// # Errors
    /// Returns [`KeyedLoaderError`] when a line is malformed, a key repeats,
    /// rows disagree on their width, no sample is found, or reading fails.
    ///
    /// # Examples
    /// ```
    /// use std::io::Cursor;
    ///
    /// use metric_guard_providers_text::KeyedLoader;
    ///
    /// let loader = KeyedLoader::try_from_reader("images", Cursor::new("img0.png 1 2\nimg1.png 3 4\n"))
    ///     .expect("source is well formed");
    /// assert_eq!(loader.len(), 2);
    /// assert_eq!(loader.row("img1.png"), Some(&[3.0, 4.0][..]));
    /// ```
    pub fn try_from_reader<R>(name: impl Into<String>, reader: R) -> Result<Self, KeyedLoaderError>
    where
        R: BufRead,
    {
        let mut keys = Vec::new();
        let mut rows = HashMap::new();
        let mut values = Vec::new();
        let mut dimension = None;
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let number = index + 1;
            let mut tokens = line.split_whitespace();
            let Some(key) = tokens.next().filter(|key| !key.starts_with('#')) else {
                continue;
            };
            let row = tokens
                .map(|token| {
                    token.parse::<f64>().map_err(|_| KeyedLoaderError::InvalidNumber {
                        line: number,
                        token: token.to_owned(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            if row.is_empty() {
                return Err(KeyedLoaderError::MissingValues {
                    line: number,
                    key: key.to_owned(),
                });
            }
            let expected = *dimension.get_or_insert(row.len());
            if expected != row.len() {
                return Err(KeyedLoaderError::InconsistentDimension {
                    line: number,
                    expected,
                    actual: row.len(),
                });
            }
            if rows.insert(key.to_owned(), keys.len()).is_some() {
                return Err(KeyedLoaderError::DuplicateKey {
                    line: number,
                    key: key.to_owned(),
                });
            }
            keys.push(key.to_owned());
            values.extend(row);
        }
        let Some(dimension) = dimension else {
            return Err(KeyedLoaderError::EmptyInput);
        };
        let name = name.into();
        debug!(%name, rows = keys.len(), dimension, "loaded keyed source");
        Ok(Self {
            name,
            keys,
            rows,
            dimension,
            values,
        })
    }

    /// Reads a keyed source from a file.
    ///
    /// # Errors
    /// Returns [`KeyedLoaderError::Io`] when the file cannot be opened and any
    /// error raised by [`Self::try_from_reader`].
    pub fn try_from_path(
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self, KeyedLoaderError> {
        let file = File::open(path)?;
        Self::try_from_reader(name, BufReader::new(file))
    }

    /// Returns the loader name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of keyed samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` when no sample is loaded, which reading never allows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the width of each feature vector.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the keys in source order.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Returns the vector stored under `key`.
    #[must_use]
    pub fn row(&self, key: &str) -> Option<&[f64]> {
        let start = self.rows.get(key)?.checked_mul(self.dimension)?;
        self.values.get(start..start.checked_add(self.dimension)?)
    }

    /// Returns the closest known key within a small edit distance.
    #[must_use]
    pub fn suggest(&self, key: &str) -> Option<&str> {
        self.keys
            .iter()
            .map(|known| (strsim::levenshtein(key, known), known))
            .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, known)| known.as_str())
    }

    /// Maps string indicators to their vectors.
    ///
    /// The output has shape `indicators.shape() ++ [dimension]`.
    ///
    /// # Errors
    /// Returns [`KeyedLoaderError::NonStringIndicator`] for non-string
    /// indicators and [`KeyedLoaderError::UnknownKey`] for keys missing from
    /// the source.
    #[instrument(
        name = "text.load",
        err,
        skip(self, indicators),
        fields(loader = %self.name, shape = ?indicators.shape()),
    )]
    pub fn load(&self, indicators: &InputArray) -> Result<InputArray, KeyedLoaderError> {
        let mut values = Vec::with_capacity(indicators.values().len() * self.dimension);
        for indicator in indicators.values() {
            let key = indicator
                .as_str()
                .ok_or_else(|| KeyedLoaderError::NonStringIndicator {
                    value: indicator.to_string(),
                })?;
            let row = self.row(key).ok_or_else(|| KeyedLoaderError::UnknownKey {
                key: key.to_owned(),
                suggestion: self.suggest(key).map(str::to_owned),
            })?;
            values.extend_from_slice(row);
        }
        let mut shape = indicators.shape().to_vec();
        shape.push(self.dimension);
        Ok(InputArray::from(ArrayD::from_shape_vec(IxDyn(&shape), values)?))
    }

    /// Wraps the loader as an indicator-function [`Preprocessor`].
    #[must_use]
    pub fn into_preprocessor(self) -> Preprocessor {
        let loader = Arc::new(self);
        Preprocessor::from_fn(move |indicators: &InputArray| loader.load(indicators))
    }
}
