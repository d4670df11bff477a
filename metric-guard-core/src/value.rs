//! Element values and dtype tags for loosely-typed input arrays.

use core::fmt;

/// A complex number carried by an input element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Complex {
    /// Real part.
    pub re: f64,
    /// Imaginary part.
    pub im: f64,
}

impl Complex {
    /// Builds a complex number from its parts.
    #[must_use]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im.is_sign_negative() {
            write!(f, "({}-{}j)", self.re, -self.im)
        } else {
            write!(f, "({}+{}j)", self.re, self.im)
        }
    }
}

/// A single element of an [`crate::InputArray`].
///
/// Elements are either numbers, usable directly as samples, or strings,
/// usable as indicators for a preprocessor or parsed into numbers during
/// dtype coercion.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Boolean flag.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Complex number; never accepted as a sample.
    Complex(Complex),
    /// Text such as a file name or identifier.
    Str(String),
}

impl Value {
    /// Returns the value as a lookup-table index when it is an integer.
    #[must_use]
    pub fn as_index(&self) -> Option<i64> {
        match self {
            Self::Int(index) => Some(*index),
            _ => None,
        }
    }

    /// Returns the text when the value is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(text) => Some(text),
            _ => None,
        }
    }

    /// Reports whether the value is complex.
    #[must_use]
    pub fn is_complex(&self) -> bool {
        matches!(self, Self::Complex(_))
    }

    /// Narrowest dtype able to hold this value on its own.
    #[must_use]
    pub fn dtype(&self) -> DType {
        match self {
            Self::Bool(_) => DType::Bool,
            Self::Int(_) => DType::Int64,
            Self::Float(_) => DType::Float64,
            Self::Complex(_) => DType::Complex128,
            Self::Str(_) => DType::Str,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Int(int) => write!(f, "{int}"),
            Self::Float(float) => write!(f, "{float}"),
            Self::Complex(complex) => write!(f, "{complex}"),
            Self::Str(text) => write!(f, "'{text}'"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<Complex> for Value {
    fn from(value: Complex) -> Self {
        Self::Complex(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Element type tag of an input array, named after the numpy dtypes callers
/// see in diagnostics.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DType {
    /// Booleans.
    Bool,
    /// 64-bit signed integers.
    Int64,
    /// 32-bit floats.
    Float32,
    /// 64-bit floats.
    Float64,
    /// Complex numbers.
    Complex128,
    /// Homogeneous strings.
    Str,
    /// Heterogeneous, untyped values.
    Object,
}

impl DType {
    /// Infers the dtype of a collection of values.
    ///
    /// Empty collections default to `float64`. Strings mixed with other
    /// values yield `object`; numeric values widen in the order
    /// `bool < int64 < float64 < complex128`.
    ///
    /// # Examples
    /// ```
    /// use metric_guard_core::{DType, Value};
    ///
    /// let values = [Value::Int(1), Value::Float(2.5)];
    /// assert_eq!(DType::infer(values.iter()), DType::Float64);
    /// let mixed = [Value::Int(1), Value::from("a")];
    /// assert_eq!(DType::infer(mixed.iter()), DType::Object);
    /// ```
    pub fn infer<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut inferred: Option<Self> = None;
        for value in values {
            let next = value.dtype();
            inferred = Some(match inferred {
                None => next,
                Some(current) => current.widen(next),
            });
            if inferred == Some(Self::Object) {
                break;
            }
        }
        inferred.unwrap_or(Self::Float64)
    }

    fn widen(self, other: Self) -> Self {
        match (self, other) {
            (Self::Str, Self::Str) => Self::Str,
            (Self::Str | Self::Object, _) | (_, Self::Str | Self::Object) => Self::Object,
            _ => {
                if self.numeric_rank() >= other.numeric_rank() {
                    self
                } else {
                    other
                }
            }
        }
    }

    const fn numeric_rank(self) -> u8 {
        match self {
            Self::Bool => 0,
            Self::Int64 => 1,
            Self::Float32 => 2,
            Self::Float64 => 3,
            Self::Complex128 | Self::Str | Self::Object => 4,
        }
    }

    /// Reports whether the dtype holds floating point numbers.
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bool => "bool",
            Self::Int64 => "int64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Complex128 => "complex128",
            Self::Str => "str",
            Self::Object => "object",
        })
    }
}
