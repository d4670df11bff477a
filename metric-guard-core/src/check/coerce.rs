//! Dtype coercion of loosely-typed arrays into numeric arrays.

use std::sync::Arc;

use ndarray::{ArrayD, IxDyn};

use crate::{
    array::{InputArray, NumericArray},
    error::{CheckInputError, Result},
    options::TargetDType,
    value::{DType, Value},
};

/// Fails with [`CheckInputError::ComplexData`] when `input` holds complex values.
pub(crate) fn ensure_real(input: &InputArray) -> Result<()> {
    if input.has_complex() {
        return Err(CheckInputError::ComplexData {
            input: Arc::from(input.to_string()),
        });
    }
    Ok(())
}

/// Converts `input` to the numeric dtype selected by `target`.
pub(crate) fn coerce(input: &InputArray, target: TargetDType) -> Result<NumericArray> {
    ensure_real(input)?;
    match (target, input.dtype()) {
        (TargetDType::Numeric, DType::Bool | DType::Int64) => {
            convert(input, value_to_i64).map(NumericArray::Int64)
        }
        (TargetDType::Numeric, DType::Float32) | (TargetDType::Float32, _) => {
            convert(input, value_to_f64).map(|array| NumericArray::Float32(array.mapv(narrow)))
        }
        (TargetDType::Numeric | TargetDType::Float64, _) => {
            convert(input, value_to_f64).map(NumericArray::Float64)
        }
    }
}

fn convert<T, F>(input: &InputArray, cast: F) -> Result<ArrayD<T>>
where
    T: Clone + Default,
    F: Fn(&Value) -> Result<T>,
{
    let mut output = ArrayD::from_elem(IxDyn(input.shape()), T::default());
    for (slot, value) in output.iter_mut().zip(input.values()) {
        *slot = cast(value)?;
    }
    Ok(output)
}

// float32 targets round each value the way numpy's astype does.
fn narrow(value: f64) -> f32 {
    value as f32
}

fn value_to_f64(value: &Value) -> Result<f64> {
    match value {
        Value::Bool(flag) => Ok(f64::from(u8::from(*flag))),
        Value::Int(int) => Ok(*int as f64),
        Value::Float(float) => Ok(*float),
        Value::Str(text) => parse_float(text),
        Value::Complex(complex) => Err(CheckInputError::DtypeCoercion {
            value: complex.to_string(),
        }),
    }
}

fn value_to_i64(value: &Value) -> Result<i64> {
    match value {
        Value::Bool(flag) => Ok(i64::from(*flag)),
        Value::Int(int) => Ok(*int),
        other => Err(CheckInputError::DtypeCoercion {
            value: other.to_string(),
        }),
    }
}

fn parse_float(text: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| CheckInputError::DtypeCoercion {
            value: text.to_owned(),
        })
}
