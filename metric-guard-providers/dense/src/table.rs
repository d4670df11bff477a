//! Dense lookup tables and their conversion into preprocessors.
use std::{fs::File, path::Path};

use arrow_array::{Array, FixedSizeListArray, RecordBatch, RecordBatchReader};
use metric_guard_core::{InputArray, Preprocessor};
use ndarray::Array2;
use parquet::arrow::{ProjectionMask, arrow_reader::ParquetRecordBatchReaderBuilder};
use parquet::file::reader::ChunkReader;
use tracing::{debug, instrument};

use crate::errors::DenseLookupTableError;
use crate::ingest::{append_rows, as_list, field_dimension};

/// Row-major `f32` table addressed by integer indicators.
///
/// # Examples
/// ```
/// use metric_guard_core::{CheckOptions, InputArray, InputKind, check_input};
/// use metric_guard_providers_dense::DenseLookupTable;
///
/// let table = DenseLookupTable::try_from_rows("demo", vec![vec![0.0, 1.0], vec![2.0, 3.0]])
///     .expect("rows share a width");
/// let preprocessor = table.into_preprocessor();
/// let checked = check_input(
///     &InputArray::from(vec![1_i64, 0]),
///     InputKind::Classic,
///     Some(&preprocessor),
///     &CheckOptions::new(),
/// )
/// .expect("indices are in range");
/// assert_eq!(checked.array().shape(), &[2, 2]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DenseLookupTable {
    name: String,
    rows: usize,
    dimension: usize,
    values: Vec<f32>,
}

impl DenseLookupTable {
    fn from_parts(
        name: impl Into<String>,
        rows: usize,
        dimension: usize,
        values: Vec<f32>,
    ) -> Result<Self, DenseLookupTableError> {
        let name = name.into();
        if rows == 0 {
            return Err(DenseLookupTableError::EmptyTable { name });
        }
        debug_assert_eq!(values.len(), rows.saturating_mul(dimension));
        debug!(%name, rows, dimension, "loaded dense lookup table");
        Ok(Self {
            name,
            rows,
            dimension,
            values,
        })
    }

    /// Builds a table from in-memory rows.
    ///
    /// # Errors
    /// Returns [`DenseLookupTableError::EmptyTable`] when `rows` is empty and
    /// [`DenseLookupTableError::InvalidRowLength`] when rows differ in width.
    pub fn try_from_rows(
        name: impl Into<String>,
        rows: Vec<Vec<f32>>,
    ) -> Result<Self, DenseLookupTableError> {
        let dimension = rows.first().map_or(0, Vec::len);
        let mut values = Vec::with_capacity(rows.len().saturating_mul(dimension));
        for (row, data) in rows.iter().enumerate() {
            if data.len() != dimension {
                return Err(DenseLookupTableError::InvalidRowLength {
                    row,
                    expected: dimension,
                    actual: data.len(),
                });
            }
            values.extend_from_slice(data);
        }
        Self::from_parts(name, rows.len(), dimension, values)
    }

    /// Loads a table from an Arrow [`FixedSizeListArray`].
    ///
    /// # Errors
    /// Returns [`DenseLookupTableError`] when the list holds nulls, carries a
    /// non-`Float32` child type or is empty.
    pub fn try_from_fixed_size_list(
        name: impl Into<String>,
        array: &FixedSizeListArray,
    ) -> Result<Self, DenseLookupTableError> {
        let mut values = Vec::new();
        let dimension = append_rows(array, None, 0, &mut values)?;
        Self::from_parts(name, array.len(), dimension, values)
    }

    /// Loads a table from the `column` of several record batches.
    ///
    /// # Errors
    /// Returns [`DenseLookupTableError`] when a batch lacks the column, when
    /// batches disagree on the row width, or when any row is invalid.
    pub fn try_from_record_batches<I>(
        name: impl Into<String>,
        column: &str,
        batches: I,
    ) -> Result<Self, DenseLookupTableError>
    where
        I: IntoIterator<Item = RecordBatch>,
    {
        let mut values = Vec::new();
        let mut rows = 0_usize;
        let mut dimension = None;
        for batch in batches {
            let schema = batch.schema();
            let index = schema
                .index_of(column)
                .map_err(|_| DenseLookupTableError::ColumnNotFound {
                    column: column.to_owned(),
                })?;
            let width = field_dimension(schema.field(index), column)?;
            if let Some(expected) = dimension.filter(|&expected| expected != width) {
                return Err(DenseLookupTableError::InconsistentBatchDimension {
                    expected,
                    actual: width,
                });
            }
            dimension = Some(width);
            let list = as_list(batch.column(index), column)?;
            append_rows(list, dimension, rows, &mut values)?;
            rows += list.len();
        }
        Self::from_parts(name, rows, dimension.unwrap_or(0), values)
    }

    /// Loads a table from a Parquet file column of `FixedSizeList<Float32, D>` rows.
    ///
    /// # Errors
    /// Returns [`DenseLookupTableError::Io`] when the file cannot be opened and
    /// any error raised by [`Self::try_from_parquet_reader`].
    pub fn try_from_parquet_path(
        name: impl Into<String>,
        path: impl AsRef<Path>,
        column: &str,
    ) -> Result<Self, DenseLookupTableError> {
        let file = File::open(path)?;
        Self::try_from_parquet_reader(name, file, column)
    }

    /// Loads a table from a Parquet reader.
    ///
    /// # Errors
    /// Returns [`DenseLookupTableError`] when the column is missing, has the
    /// wrong type or holds invalid rows, and propagates Parquet and Arrow
    /// failures.
    #[instrument(name = "dense.parquet", err, skip(name, reader))]
    pub fn try_from_parquet_reader<R>(
        name: impl Into<String>,
        reader: R,
        column: &str,
    ) -> Result<Self, DenseLookupTableError>
    where
        R: ChunkReader + Send + 'static,
    {
        let builder = ParquetRecordBatchReaderBuilder::try_new(reader)?;
        let mask = ProjectionMask::columns(builder.parquet_schema(), [column]);
        let reader = builder.with_projection(mask).build()?;
        let schema = reader.schema();
        let index = schema
            .index_of(column)
            .map_err(|_| DenseLookupTableError::ColumnNotFound {
                column: column.to_owned(),
            })?;
        let dimension = field_dimension(schema.field(index), column)?;
        let mut values = Vec::new();
        let mut rows = 0_usize;
        for batch in reader {
            let batch = batch?;
            let list = as_list(batch.column(index), column)?;
            append_rows(list, Some(dimension), rows, &mut values)?;
            rows += list.len();
        }
        Self::from_parts(name, rows, dimension, values)
    }

    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows
    }

    /// Returns `true` when the table has no rows, which loading never allows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Returns the width of each row.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the row-major values.
    #[must_use]
    pub fn data(&self) -> &[f32] {
        &self.values
    }

    /// Returns row `index`, or `None` when it is out of range.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[f32]> {
        let start = index.checked_mul(self.dimension)?;
        let end = start.checked_add(self.dimension)?;
        if index >= self.rows {
            return None;
        }
        self.values.get(start..end)
    }

    /// Copies the table into a `(rows, dimension)` matrix.
    #[must_use]
    pub fn to_array(&self) -> Array2<f32> {
        Array2::from_shape_fn((self.rows, self.dimension), |(row, col)| {
            self.values
                .get(row * self.dimension + col)
                .copied()
                .unwrap_or_default()
        })
    }

    /// Copies the table into a `float32` [`InputArray`].
    #[must_use]
    pub fn to_input_array(&self) -> InputArray {
        InputArray::from_f32(&self.to_array())
    }

    /// Wraps the table as a lookup-table [`Preprocessor`].
    #[must_use]
    pub fn into_preprocessor(self) -> Preprocessor {
        Preprocessor::LookupTable(self.to_input_array())
    }
}
