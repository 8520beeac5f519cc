//! Typed, shaped attribute arrays owned by the host data store.
//!
//! A [`DataArray`] is a flat buffer organized as `tuple_shape` logical
//! entities (points, cells, ...) each carrying `component_shape` values.

use crate::mesh_error::MeshExportError;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Element type of an array buffer.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum DataType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    Boolean,
}

impl DataType {
    /// Returns `true` for the signed and unsigned integer types.
    pub fn is_integer(self) -> bool {
        !matches!(
            self,
            DataType::Float32 | DataType::Float64 | DataType::Boolean
        )
    }
}

/// Owned buffer tagged with its element type.
#[derive(Clone, Debug, PartialEq)]
pub enum ArrayValues {
    Int8(Vec<i8>),
    UInt8(Vec<u8>),
    Int16(Vec<i16>),
    UInt16(Vec<u16>),
    Int32(Vec<i32>),
    UInt32(Vec<u32>),
    Int64(Vec<i64>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Boolean(Vec<bool>),
}

fn to_f64<T: ToPrimitive>(values: &[T]) -> Vec<f64> {
    // Every primitive numeric type converts to f64 (possibly rounding).
    values.iter().map(|v| v.to_f64().unwrap_or(f64::NAN)).collect()
}

fn to_i64<T: ToPrimitive + Copy + Into<u64>>(values: &[T]) -> Result<Vec<i64>, MeshExportError> {
    values
        .iter()
        .map(|v| v.to_i64().ok_or(MeshExportError::IndexOverflow((*v).into())))
        .collect()
}

fn signed_to_i64<T: Copy + Into<i64>>(values: &[T]) -> Vec<i64> {
    values.iter().map(|&v| v.into()).collect()
}

fn checked_product(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &n| acc.checked_mul(n))
}

impl ArrayValues {
    /// Element type of the buffer.
    pub fn data_type(&self) -> DataType {
        match self {
            ArrayValues::Int8(_) => DataType::Int8,
            ArrayValues::UInt8(_) => DataType::UInt8,
            ArrayValues::Int16(_) => DataType::Int16,
            ArrayValues::UInt16(_) => DataType::UInt16,
            ArrayValues::Int32(_) => DataType::Int32,
            ArrayValues::UInt32(_) => DataType::UInt32,
            ArrayValues::Int64(_) => DataType::Int64,
            ArrayValues::UInt64(_) => DataType::UInt64,
            ArrayValues::Float32(_) => DataType::Float32,
            ArrayValues::Float64(_) => DataType::Float64,
            ArrayValues::Boolean(_) => DataType::Boolean,
        }
    }

    /// Number of scalar elements in the buffer.
    pub fn len(&self) -> usize {
        match self {
            ArrayValues::Int8(v) => v.len(),
            ArrayValues::UInt8(v) => v.len(),
            ArrayValues::Int16(v) => v.len(),
            ArrayValues::UInt16(v) => v.len(),
            ArrayValues::Int32(v) => v.len(),
            ArrayValues::UInt32(v) => v.len(),
            ArrayValues::Int64(v) => v.len(),
            ArrayValues::UInt64(v) => v.len(),
            ArrayValues::Float32(v) => v.len(),
            ArrayValues::Float64(v) => v.len(),
            ArrayValues::Boolean(v) => v.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy the buffer into `f64`; booleans map to `0.0` / `1.0`.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            ArrayValues::Int8(v) => to_f64(v),
            ArrayValues::UInt8(v) => to_f64(v),
            ArrayValues::Int16(v) => to_f64(v),
            ArrayValues::UInt16(v) => to_f64(v),
            ArrayValues::Int32(v) => to_f64(v),
            ArrayValues::UInt32(v) => to_f64(v),
            ArrayValues::Int64(v) => to_f64(v),
            ArrayValues::UInt64(v) => to_f64(v),
            ArrayValues::Float32(v) => to_f64(v),
            ArrayValues::Float64(v) => v.clone(),
            ArrayValues::Boolean(v) => v.iter().map(|&b| if b { 1.0 } else { 0.0 }).collect(),
        }
    }

    /// Copy an integer buffer into `i64`.
    ///
    /// Fails for floating point and boolean buffers, and for unsigned values
    /// above `i64::MAX`.
    pub fn to_i64_vec(&self) -> Result<Vec<i64>, MeshExportError> {
        match self {
            ArrayValues::Int8(v) => Ok(signed_to_i64(v)),
            ArrayValues::Int16(v) => Ok(signed_to_i64(v)),
            ArrayValues::Int32(v) => Ok(signed_to_i64(v)),
            ArrayValues::Int64(v) => Ok(v.clone()),
            ArrayValues::UInt8(v) => to_i64(v),
            ArrayValues::UInt16(v) => to_i64(v),
            ArrayValues::UInt32(v) => to_i64(v),
            ArrayValues::UInt64(v) => to_i64(v),
            other => Err(MeshExportError::UnsupportedConversion {
                data_type: other.data_type(),
                target: "i64",
            }),
        }
    }

    /// Render each element as text, as used by ASCII encoders.
    pub fn to_string_vec(&self) -> Vec<String> {
        fn render<T: ToString>(values: &[T]) -> Vec<String> {
            values.iter().map(ToString::to_string).collect()
        }
        match self {
            ArrayValues::Int8(v) => render(v),
            ArrayValues::UInt8(v) => render(v),
            ArrayValues::Int16(v) => render(v),
            ArrayValues::UInt16(v) => render(v),
            ArrayValues::Int32(v) => render(v),
            ArrayValues::UInt32(v) => render(v),
            ArrayValues::Int64(v) => render(v),
            ArrayValues::UInt64(v) => render(v),
            ArrayValues::Float32(v) => render(v),
            ArrayValues::Float64(v) => render(v),
            ArrayValues::Boolean(v) => v.iter().map(|&b| u8::from(b).to_string()).collect(),
        }
    }
}

/// A named array organized as `tuple_shape` entities of `component_shape` values.
#[derive(Clone, Debug, PartialEq)]
pub struct DataArray {
    name: String,
    tuple_shape: Vec<usize>,
    component_shape: Vec<usize>,
    values: ArrayValues,
}

impl DataArray {
    /// Build an array, checking the buffer length against both shapes.
    pub fn try_new(
        name: impl Into<String>,
        tuple_shape: Vec<usize>,
        component_shape: Vec<usize>,
        values: ArrayValues,
    ) -> Result<Self, MeshExportError> {
        let name = name.into();
        let expected = checked_product(&tuple_shape)
            .zip(checked_product(&component_shape))
            .and_then(|(tuples, components)| tuples.checked_mul(components));
        let Some(expected) = expected else {
            return Err(MeshExportError::ShapeOverflow {
                name,
                tuple_shape,
                component_shape,
            });
        };
        if values.len() != expected {
            return Err(MeshExportError::ArrayLengthMismatch {
                name,
                expected,
                found: values.len(),
            });
        }
        Ok(Self {
            name,
            tuple_shape,
            component_shape,
            values,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Per-axis counts of the logical entities this array spans.
    #[inline]
    pub fn tuple_shape(&self) -> &[usize] {
        &self.tuple_shape
    }

    /// Per-axis counts of the values stored for each entity.
    #[inline]
    pub fn component_shape(&self) -> &[usize] {
        &self.component_shape
    }

    #[inline]
    pub fn values(&self) -> &ArrayValues {
        &self.values
    }

    #[inline]
    pub fn data_type(&self) -> DataType {
        self.values.data_type()
    }

    pub fn num_tuples(&self) -> usize {
        self.tuple_shape.iter().product()
    }

    pub fn num_components(&self) -> usize {
        self.component_shape.iter().product()
    }

    /// Full shape: tuple axes followed by component axes.
    pub fn shape(&self) -> Vec<usize> {
        self.tuple_shape
            .iter()
            .chain(self.component_shape.iter())
            .copied()
            .collect()
    }
}
