//! Array containers passed into and out of the input checks.
//!
//! [`InputArray`] is the loosely-typed, dynamically-ranked array estimators
//! receive from callers. [`NumericArray`] is the dense numeric array the checks
//! hand back once rank, size and dtype constraints hold.

use core::fmt;

use ndarray::{Array, ArrayD, Axis, Dimension, IxDyn};

use crate::value::{DType, Value};

/// Shape of an array, rendered like a Python tuple (`(2,)`, `(2, 3)`).
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Shape(Vec<usize>);

impl Shape {
    /// Returns the axis lengths.
    #[must_use]
    pub fn dims(&self) -> &[usize] {
        &self.0
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Self(dims.to_vec())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (index, dim) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{dim}")?;
        }
        if self.0.len() == 1 {
            f.write_str(",")?;
        }
        f.write_str(")")
    }
}

/// Loosely-typed array of arbitrary rank.
///
/// # Examples
/// ```
/// use metric_guard_core::{DType, InputArray};
/// use ndarray::array;
///
/// let indicators = InputArray::from(array![["img0.png", "img1.png"]]);
/// assert_eq!(indicators.ndim(), 2);
/// assert_eq!(indicators.dtype(), DType::Str);
///
/// let points = InputArray::from(array![[1.0, 2.3], [2.3, 4.3]]).astype_object();
/// assert_eq!(points.dtype(), DType::Object);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct InputArray {
    values: ArrayD<Value>,
    dtype: DType,
}

impl InputArray {
    /// Wraps values, inferring the dtype from them.
    #[must_use]
    pub fn from_values(values: ArrayD<Value>) -> Self {
        let dtype = DType::infer(values.iter());
        Self { values, dtype }
    }

    pub(crate) fn with_dtype(values: ArrayD<Value>, dtype: DType) -> Self {
        Self { values, dtype }
    }

    /// Builds a 0-dimensional array holding a single value.
    #[must_use]
    pub fn scalar(value: impl Into<Value>) -> Self {
        Self::from_values(ArrayD::from_elem(IxDyn(&[]), value.into()))
    }

    /// Builds an array from single-precision floats, tagged as `float32`.
    #[must_use]
    pub fn from_f32<D: Dimension>(array: &Array<f32, D>) -> Self {
        let values = array.map(|&value| Value::from(value)).into_dyn();
        Self::with_dtype(values, DType::Float32)
    }

    /// Retags the array as `object` without touching its values.
    #[must_use]
    pub fn astype_object(self) -> Self {
        Self {
            values: self.values,
            dtype: DType::Object,
        }
    }

    /// Returns the underlying values.
    #[must_use]
    pub fn values(&self) -> &ArrayD<Value> {
        &self.values
    }

    /// Returns the dtype tag.
    #[must_use]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Returns the number of dimensions.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.values.ndim()
    }

    /// Returns the axis lengths.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        self.values.shape()
    }

    /// Reports whether any element is complex or the dtype is complex.
    #[must_use]
    pub fn has_complex(&self) -> bool {
        self.dtype == DType::Complex128 || self.values.iter().any(Value::is_complex)
    }

    /// Extracts the sub-array at `index` along `axis`, keeping the dtype.
    pub(crate) fn index_axis(&self, axis: Axis, index: usize) -> Self {
        Self::with_dtype(self.values.index_axis(axis, index).to_owned(), self.dtype)
    }

    /// Inserts a unit axis, keeping the dtype.
    pub(crate) fn insert_axis(self, axis: Axis) -> Self {
        Self::with_dtype(self.values.insert_axis(axis), self.dtype)
    }
}

impl<T, D> From<Array<T, D>> for InputArray
where
    T: Clone + Into<Value>,
    D: Dimension,
{
    fn from(array: Array<T, D>) -> Self {
        Self::from_values(array.mapv(Into::into).into_dyn())
    }
}

impl<T> From<Vec<T>> for InputArray
where
    T: Into<Value>,
{
    fn from(values: Vec<T>) -> Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        Self::from_values(ndarray::Array1::from(values).into_dyn())
    }
}

impl fmt::Display for InputArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.values, f)
    }
}

/// Dense numeric array produced by a successful check.
#[derive(Clone, Debug, PartialEq)]
pub enum NumericArray {
    /// 64-bit integers, kept when the `numeric` dtype is requested.
    Int64(ArrayD<i64>),
    /// 32-bit floats.
    Float32(ArrayD<f32>),
    /// 64-bit floats.
    Float64(ArrayD<f64>),
}

impl NumericArray {
    /// Returns the dtype of the stored values.
    #[must_use]
    pub fn dtype(&self) -> DType {
        match self {
            Self::Int64(_) => DType::Int64,
            Self::Float32(_) => DType::Float32,
            Self::Float64(_) => DType::Float64,
        }
    }

    /// Returns the axis lengths.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        match self {
            Self::Int64(array) => array.shape(),
            Self::Float32(array) => array.shape(),
            Self::Float64(array) => array.shape(),
        }
    }

    /// Returns the number of dimensions.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Returns the values when they are stored as `float64`.
    #[must_use]
    pub fn as_f64(&self) -> Option<&ArrayD<f64>> {
        match self {
            Self::Float64(array) => Some(array),
            _ => None,
        }
    }

    /// Converts the values to `float64`.
    #[must_use]
    pub fn into_f64(self) -> ArrayD<f64> {
        match self {
            Self::Int64(array) => array.mapv(|value| value as f64),
            Self::Float32(array) => array.mapv(f64::from),
            Self::Float64(array) => array,
        }
    }

    /// Reports whether every value is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Int64(_) => true,
            Self::Float32(array) => array.iter().all(|value| value.is_finite()),
            Self::Float64(array) => array.iter().all(|value| value.is_finite()),
        }
    }
}

impl fmt::Display for NumericArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int64(array) => fmt::Display::fmt(array, f),
            Self::Float32(array) => fmt::Display::fmt(array, f),
            Self::Float64(array) => fmt::Display::fmt(array, f),
        }
    }
}
