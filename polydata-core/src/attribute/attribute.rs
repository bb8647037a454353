#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{
    decode_type_byte, encode_type_byte, AttributeData, AttributeKind, AttributePrimitive,
    DataType,
};
use crate::PolyDataError;

/// Maximum length of an attribute name in bytes, excluding the NUL terminator written on the wire
pub const MAX_ATTRIBUTE_NAME_LENGTH: usize = 255;

fn checked_value_count(size: usize, n_components: u32) -> Result<usize, PolyDataError> {
    size.checked_mul(n_components as usize)
        .ok_or(PolyDataError::Allocation { count: size })
}

/// A named, typed data channel attached to the points or cells of a POLYDATA message.
///
/// An attribute holds `size` elements, each made up of `n_components` values. The number of components is
/// dictated by the [AttributeKind] (3 for vectors and normals, 9 for tensors, 4 for RGBA colors), except for
/// scalars which can have between 1 and 127 components. Values are stored in a single [AttributeData] buffer
/// whose representation matches [data_type](Self::data_type), and which always holds exactly
/// `size * n_components` values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Attribute {
    kind: AttributeKind,
    n_components: u32,
    size: usize,
    name: String,
    data: AttributeData,
}

impl Default for Attribute {
    fn default() -> Self {
        Self {
            kind: AttributeKind::PointScalar,
            n_components: 1,
            size: 0,
            name: String::new(),
            data: AttributeData::Float32(vec![]),
        }
    }
}

impl Attribute {
    /// Creates a new, empty single-component `Float32` point scalar attribute
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates a new attribute with the given type and `size` zero-initialized elements
    /// ```
    /// # use polydata_core::attribute::*;
    /// let normals = Attribute::with_type("Normals", AttributeKind::PointNormal, DataType::Float32, 1, 4).unwrap();
    /// assert_eq!(normals.n_components(), 3);
    /// assert_eq!(normals.data::<f32>().unwrap().len(), 12);
    /// ```
    pub fn with_type<S: Into<String>>(
        name: S,
        kind: AttributeKind,
        data_type: DataType,
        n_components: u32,
        size: usize,
    ) -> Result<Self, PolyDataError> {
        let mut attribute = Self::new();
        attribute.set_name(name)?;
        attribute.set_kind(kind, data_type, n_components)?;
        attribute.set_element_count(size)?;
        Ok(attribute)
    }

    /// Resets this attribute to the state of [new](Self::new)
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    pub fn kind(&self) -> AttributeKind {
        self.kind
    }

    pub fn data_type(&self) -> DataType {
        self.data.data_type()
    }

    pub fn n_components(&self) -> u32 {
        self.n_components
    }

    /// Number of elements (points or cells) that this attribute has values for
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of values, i.e. `size * n_components`
    pub fn value_count(&self) -> usize {
        self.size * self.n_components as usize
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the name of this attribute. Names are written NUL-terminated, so names containing a NUL byte or
    /// exceeding [MAX_ATTRIBUTE_NAME_LENGTH] bytes are rejected.
    pub fn set_name<S: Into<String>>(&mut self, name: S) -> Result<(), PolyDataError> {
        let name = name.into();
        if name.len() > MAX_ATTRIBUTE_NAME_LENGTH || name.bytes().any(|b| b == 0) {
            return Err(PolyDataError::InvalidName {
                max_len: MAX_ATTRIBUTE_NAME_LENGTH,
            });
        }
        self.name = name;
        Ok(())
    }

    /// Returns the attribute type byte (kind in the lower five bits, data type in the upper three bits)
    pub fn type_byte(&self) -> u8 {
        encode_type_byte(self.kind, self.data_type())
    }

    /// Sets kind and data type from an attribute type byte. See [set_kind](Self::set_kind) for the rules on
    /// `n_components`. On success, returns the decoded kind. On failure, this attribute is left unchanged.
    /// ```
    /// # use polydata_core::attribute::*;
    /// let mut attribute = Attribute::new();
    /// assert_eq!(attribute.set_type(0x81, 0).unwrap(), AttributeKind::PointVector);
    /// assert_eq!(attribute.data_type(), DataType::Int16);
    /// assert!(attribute.set_type(0x05, 1).is_err());
    /// ```
    pub fn set_type(
        &mut self,
        type_byte: u8,
        n_components: u32,
    ) -> Result<AttributeKind, PolyDataError> {
        let (kind_code, data_type) = decode_type_byte(type_byte);
        let kind =
            AttributeKind::from_code(kind_code).ok_or(PolyDataError::InvalidAttributeType {
                kind_code,
                data_type_code: data_type.code(),
                n_components,
            })?;
        self.set_kind(kind, data_type, n_components)
    }

    /// Sets kind and data type of this attribute. Scalars take `n_components` from the caller and accept
    /// `1..=127`, all other kinds ignore `n_components` and use their fixed component count. The value buffer
    /// is resized to `size * n_components`. If `data_type` changes, the previous values are discarded and all
    /// values are zero. On failure, this attribute is left unchanged.
    pub fn set_kind(
        &mut self,
        kind: AttributeKind,
        data_type: DataType,
        n_components: u32,
    ) -> Result<AttributeKind, PolyDataError> {
        let resolved_components =
            kind.resolve_components(n_components)
                .ok_or(PolyDataError::InvalidAttributeType {
                    kind_code: kind.code(),
                    data_type_code: data_type.code(),
                    n_components,
                })?;

        let value_count = checked_value_count(self.size, resolved_components)?;
        if data_type == self.data.data_type() {
            self.data.resize(value_count)?;
        } else {
            self.data = AttributeData::try_zeroed(data_type, value_count)?;
        }
        self.kind = kind;
        self.n_components = resolved_components;
        Ok(kind)
    }

    /// Sets the number of elements. The value buffer keeps its data type and is resized to
    /// `size * n_components`, new values are zero. Fails with [PolyDataError::Allocation] if the values do not fit
    /// into memory, in which case this attribute is left unchanged.
    pub fn set_element_count(&mut self, size: usize) -> Result<(), PolyDataError> {
        let value_count = checked_value_count(size, self.n_components)?;
        self.data.resize(value_count)?;
        self.size = size;
        Ok(())
    }

    /// Borrows the value buffer
    pub fn values(&self) -> &AttributeData {
        &self.data
    }

    /// Replaces the value buffer with `data`, which must match the data type of this attribute and hold exactly
    /// `size * n_components` values
    pub fn replace_values(&mut self, data: AttributeData) -> Result<(), PolyDataError> {
        if data.data_type() != self.data_type() {
            return Err(PolyDataError::DataTypeMismatch {
                stored: self.data_type(),
                requested: data.data_type(),
            });
        }
        if data.len() != self.value_count() {
            return Err(PolyDataError::ValueCountMismatch {
                expected: self.value_count(),
                actual: data.len(),
            });
        }
        self.data = data;
        Ok(())
    }

    /// Borrows all values as `T`. Fails if `T` does not match the data type of this attribute.
    pub fn data<T: AttributePrimitive>(&self) -> Result<&[T], PolyDataError> {
        self.data
            .as_slice::<T>()
            .ok_or(PolyDataError::DataTypeMismatch {
                stored: self.data_type(),
                requested: T::DATA_TYPE,
            })
    }

    fn data_mut<T: AttributePrimitive>(&mut self) -> Result<&mut [T], PolyDataError> {
        let stored = self.data_type();
        self.data
            .as_mut_slice::<T>()
            .ok_or(PolyDataError::DataTypeMismatch {
                stored,
                requested: T::DATA_TYPE,
            })
    }

    /// Copies the first `size * n_components` values of `source` into this attribute. Fails without changing
    /// anything if `T` does not match the data type or if `source` is too short.
    /// ```
    /// # use polydata_core::attribute::*;
    /// let mut attribute = Attribute::new();
    /// attribute.set_element_count(3).unwrap();
    /// attribute.set_data(&[1.0_f32, 2.0, 3.0]).unwrap();
    /// assert_eq!(attribute.data::<f32>().unwrap(), &[1.0, 2.0, 3.0]);
    /// ```
    pub fn set_data<T: AttributePrimitive>(&mut self, source: &[T]) -> Result<(), PolyDataError> {
        let required = self.value_count();
        let values = self.data_mut::<T>()?;
        if source.len() < required {
            return Err(PolyDataError::SourceTooShort {
                required,
                actual: source.len(),
            });
        }
        values.copy_from_slice(&source[..required]);
        Ok(())
    }

    /// Copies all values into the front of `target` and returns the number of copied values. Fails without
    /// copying if `T` does not match the data type or if `target` is too short.
    pub fn get_data<T: AttributePrimitive>(&self, target: &mut [T]) -> Result<usize, PolyDataError> {
        let values = self.data::<T>()?;
        if target.len() < values.len() {
            return Err(PolyDataError::SourceTooShort {
                required: values.len(),
                actual: target.len(),
            });
        }
        target[..values.len()].copy_from_slice(values);
        Ok(values.len())
    }

    fn check_element_index(&self, n: usize) -> Result<(), PolyDataError> {
        if n >= self.size {
            Err(PolyDataError::IndexOutOfRange {
                index: n,
                len: self.size,
            })
        } else {
            Ok(())
        }
    }

    /// Borrows the `n_components` values of element `n`
    pub fn nth_data<T: AttributePrimitive>(&self, n: usize) -> Result<&[T], PolyDataError> {
        self.check_element_index(n)?;
        let components = self.n_components as usize;
        let values = self.data::<T>()?;
        Ok(&values[n * components..(n + 1) * components])
    }

    /// Overwrites the values of element `n` with the first `n_components` values of `source`
    pub fn set_nth_data<T: AttributePrimitive>(
        &mut self,
        n: usize,
        source: &[T],
    ) -> Result<(), PolyDataError> {
        self.check_element_index(n)?;
        let components = self.n_components as usize;
        if source.len() < components {
            return Err(PolyDataError::SourceTooShort {
                required: components,
                actual: source.len(),
            });
        }
        let values = self.data_mut::<T>()?;
        values[n * components..(n + 1) * components].copy_from_slice(&source[..components]);
        Ok(())
    }

    /// Copies the values of element `n` into the front of `target`
    pub fn get_nth_data<T: AttributePrimitive>(
        &self,
        n: usize,
        target: &mut [T],
    ) -> Result<(), PolyDataError> {
        let values = self.nth_data::<T>(n)?;
        if target.len() < values.len() {
            return Err(PolyDataError::SourceTooShort {
                required: values.len(),
                actual: target.len(),
            });
        }
        target[..values.len()].copy_from_slice(values);
        Ok(())
    }

    /// Reads a single component of element `element` widened to `f64`, regardless of the data type
    pub fn get_value_as_f64(&self, element: usize, component: usize) -> Option<f64> {
        if element >= self.size || component >= self.n_components as usize {
            return None;
        }
        self.data
            .value_as_f64(element * self.n_components as usize + component)
    }

    /// Returns a copy of this attribute with all values converted to `data_type`
    pub fn converted(&self, data_type: DataType) -> Result<Attribute, PolyDataError> {
        Ok(Attribute {
            kind: self.kind,
            n_components: self.n_components,
            size: self.size,
            name: self.name.clone(),
            data: self.data.cast_to(data_type)?,
        })
    }
}
