use std::fmt::Debug;

use num_traits::{NumCast, ToPrimitive};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;

use super::DataType;
use crate::PolyDataError;

/// Values of an attribute, stored in exactly one numeric representation. The variant always matches the
/// [DataType] of the owning attribute, so values written as one type can never be read back as another.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AttributeData {
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Int8(Vec<i8>),
    UInt8(Vec<u8>),
    Int16(Vec<i16>),
    UInt16(Vec<u16>),
    Int32(Vec<i32>),
    UInt32(Vec<u32>),
}

/// Runs `$body` with `$values` bound to the value vector of `$data`, whatever its variant
macro_rules! with_values {
    ($data:expr, $values:ident => $body:expr) => {
        match $data {
            AttributeData::Float32($values) => $body,
            AttributeData::Float64($values) => $body,
            AttributeData::Int8($values) => $body,
            AttributeData::UInt8($values) => $body,
            AttributeData::Int16($values) => $body,
            AttributeData::UInt16($values) => $body,
            AttributeData::Int32($values) => $body,
            AttributeData::UInt32($values) => $body,
        }
    };
}

/// Runs `$body` with the type alias `$t` set to the primitive type of `$data_type`
macro_rules! with_primitive {
    ($data_type:expr, $t:ident => $body:expr) => {
        match $data_type {
            DataType::Float32 => {
                type $t = f32;
                $body
            }
            DataType::Float64 => {
                type $t = f64;
                $body
            }
            DataType::Int8 => {
                type $t = i8;
                $body
            }
            DataType::UInt8 => {
                type $t = u8;
                $body
            }
            DataType::Int16 => {
                type $t = i16;
                $body
            }
            DataType::UInt16 => {
                type $t = u16;
                $body
            }
            DataType::Int32 => {
                type $t = i32;
                $body
            }
            DataType::UInt32 => {
                type $t = u32;
                $body
            }
        }
    };
}

mod private {
    pub trait Sealed {}
}

/// Primitive types that can be stored in an attribute. Every primitive type is bound to exactly one [DataType].
pub trait AttributePrimitive:
    Copy + Default + PartialEq + Debug + NumCast + private::Sealed + 'static
{
    const DATA_TYPE: DataType;

    /// Borrows the values of `data` if they are stored as `Self`
    fn values(data: &AttributeData) -> Option<&[Self]>;
    /// Mutably borrows the values of `data` if they are stored as `Self`
    fn values_mut(data: &mut AttributeData) -> Option<&mut [Self]>;
    /// Wraps `values` into the matching `AttributeData` variant
    fn into_data(values: Vec<Self>) -> AttributeData;
}

macro_rules! impl_attribute_primitive {
    ($t:ty => $variant:ident) => {
        const_assert_eq!(std::mem::size_of::<$t>(), DataType::$variant.size());

        impl private::Sealed for $t {}

        impl AttributePrimitive for $t {
            const DATA_TYPE: DataType = DataType::$variant;

            fn values(data: &AttributeData) -> Option<&[Self]> {
                match data {
                    AttributeData::$variant(values) => Some(values.as_slice()),
                    _ => None,
                }
            }

            fn values_mut(data: &mut AttributeData) -> Option<&mut [Self]> {
                match data {
                    AttributeData::$variant(values) => Some(values.as_mut_slice()),
                    _ => None,
                }
            }

            fn into_data(values: Vec<Self>) -> AttributeData {
                AttributeData::$variant(values)
            }
        }
    };
}

impl_attribute_primitive!(f32 => Float32);
impl_attribute_primitive!(f64 => Float64);
impl_attribute_primitive!(i8 => Int8);
impl_attribute_primitive!(u8 => UInt8);
impl_attribute_primitive!(i16 => Int16);
impl_attribute_primitive!(u16 => UInt16);
impl_attribute_primitive!(i32 => Int32);
impl_attribute_primitive!(u32 => UInt32);

fn try_zeroed_values<T: AttributePrimitive>(len: usize) -> Result<Vec<T>, PolyDataError> {
    let mut values = Vec::new();
    values
        .try_reserve_exact(len)
        .map_err(|_| PolyDataError::Allocation { count: len })?;
    values.resize(len, T::default());
    Ok(values)
}

fn try_resize_values<T: AttributePrimitive>(
    values: &mut Vec<T>,
    len: usize,
) -> Result<(), PolyDataError> {
    if len > values.len() {
        values
            .try_reserve_exact(len - values.len())
            .map_err(|_| PolyDataError::Allocation { count: len })?;
    }
    values.resize(len, T::default());
    Ok(())
}

fn cast_values<S: AttributePrimitive, T: AttributePrimitive>(
    values: &[S],
) -> Result<Vec<T>, PolyDataError> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            <T as NumCast>::from(*value).ok_or(PolyDataError::ValueNotRepresentable {
                index,
                target: T::DATA_TYPE,
            })
        })
        .collect()
}

fn copy_values<T: AttributePrimitive>(
    target: &mut [T],
    source: &AttributeData,
) -> Result<(), PolyDataError> {
    let source_values = T::values(source).ok_or(PolyDataError::DataTypeMismatch {
        stored: T::DATA_TYPE,
        requested: source.data_type(),
    })?;
    if source_values.len() != target.len() {
        return Err(PolyDataError::ValueCountMismatch {
            expected: target.len(),
            actual: source_values.len(),
        });
    }
    target.copy_from_slice(source_values);
    Ok(())
}

impl AttributeData {
    /// Creates `len` zero values of the given `data_type`
    pub fn zeroed(data_type: DataType, len: usize) -> Self {
        with_primitive!(data_type, T => T::into_data(vec![T::default(); len]))
    }

    /// Like [zeroed](Self::zeroed), but reports an error instead of aborting if the memory cannot be reserved
    pub fn try_zeroed(data_type: DataType, len: usize) -> Result<Self, PolyDataError> {
        with_primitive!(data_type, T => try_zeroed_values::<T>(len).map(T::into_data))
    }

    pub fn data_type(&self) -> DataType {
        match self {
            AttributeData::Float32(_) => DataType::Float32,
            AttributeData::Float64(_) => DataType::Float64,
            AttributeData::Int8(_) => DataType::Int8,
            AttributeData::UInt8(_) => DataType::UInt8,
            AttributeData::Int16(_) => DataType::Int16,
            AttributeData::UInt16(_) => DataType::UInt16,
            AttributeData::Int32(_) => DataType::Int32,
            AttributeData::UInt32(_) => DataType::UInt32,
        }
    }

    /// Number of values (not elements!)
    pub fn len(&self) -> usize {
        with_values!(self, values => values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of all values in bytes
    pub fn size_in_bytes(&self) -> usize {
        self.len() * self.data_type().size()
    }

    /// Resizes to `len` values. Existing values are kept, new values are zero. If the memory for the new values
    /// cannot be reserved, the values are left as they were.
    pub fn resize(&mut self, len: usize) -> Result<(), PolyDataError> {
        with_values!(self, values => try_resize_values(values, len))
    }

    /// Borrows the values as `T`, or returns `None` if they are stored as a different type
    pub fn as_slice<T: AttributePrimitive>(&self) -> Option<&[T]> {
        T::values(self)
    }

    pub fn as_mut_slice<T: AttributePrimitive>(&mut self) -> Option<&mut [T]> {
        T::values_mut(self)
    }

    /// Overwrites all values with the values of `source`, which must have the same data type and length
    pub fn copy_from(&mut self, source: &AttributeData) -> Result<(), PolyDataError> {
        with_values!(self, values => copy_values(values.as_mut_slice(), source))
    }

    /// Returns the value at `index` widened to `f64`
    pub fn value_as_f64(&self, index: usize) -> Option<f64> {
        with_values!(self, values => values.get(index).and_then(|value| value.to_f64()))
    }

    /// Converts all values to `target`. Fails if any value has no representation in `target`, e.g. a negative
    /// value that is converted to an unsigned type.
    pub fn cast_to(&self, target: DataType) -> Result<AttributeData, PolyDataError> {
        with_values!(self, values => with_primitive!(target, T => cast_values::<_, T>(values).map(T::into_data)))
    }
}

impl<T: AttributePrimitive> From<Vec<T>> for AttributeData {
    fn from(values: Vec<T>) -> Self {
        T::into_data(values)
    }
}
