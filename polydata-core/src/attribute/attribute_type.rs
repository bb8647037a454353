use std::fmt::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Whether an attribute stores one value group per point or per cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AttributeDomain {
    Point,
    Cell,
}

/// The kind of an attribute: its category (scalar, vector, normal, tensor or RGBA color) crossed with its
/// [AttributeDomain]. The discriminants are the wire codes, which occupy the lower five bits of the
/// attribute type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum AttributeKind {
    PointScalar = 0x00,
    PointVector = 0x01,
    PointNormal = 0x02,
    PointTensor = 0x03,
    PointRgba = 0x04,
    CellScalar = 0x10,
    CellVector = 0x11,
    CellNormal = 0x12,
    CellTensor = 0x13,
    CellRgba = 0x14,
}

/// Maximum number of components of a scalar attribute
pub const MAX_SCALAR_COMPONENTS: u32 = 127;

impl AttributeKind {
    /// Mask selecting the kind bits of an attribute type byte
    pub const TYPE_BYTE_MASK: u8 = 0x1F;

    pub const ALL: [AttributeKind; 10] = [
        AttributeKind::PointScalar,
        AttributeKind::PointVector,
        AttributeKind::PointNormal,
        AttributeKind::PointTensor,
        AttributeKind::PointRgba,
        AttributeKind::CellScalar,
        AttributeKind::CellVector,
        AttributeKind::CellNormal,
        AttributeKind::CellTensor,
        AttributeKind::CellRgba,
    ];

    /// Returns the `AttributeKind` for the given wire code, or `None` if the code is unknown
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.code() == code)
    }

    /// Returns the wire code of this kind
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn domain(self) -> AttributeDomain {
        if self.code() & 0x10 == 0 {
            AttributeDomain::Point
        } else {
            AttributeDomain::Cell
        }
    }

    pub fn is_scalar(self) -> bool {
        matches!(self, AttributeKind::PointScalar | AttributeKind::CellScalar)
    }

    /// Returns the number of components that this kind prescribes. Scalars have a caller-defined number of
    /// components, so `None` is returned for them.
    pub fn fixed_components(self) -> Option<u32> {
        match self {
            AttributeKind::PointScalar | AttributeKind::CellScalar => None,
            AttributeKind::PointVector
            | AttributeKind::CellVector
            | AttributeKind::PointNormal
            | AttributeKind::CellNormal => Some(3),
            AttributeKind::PointTensor | AttributeKind::CellTensor => Some(9),
            AttributeKind::PointRgba | AttributeKind::CellRgba => Some(4),
        }
    }

    /// Returns the number of components an attribute of this kind ends up with if `requested` components are
    /// asked for. Fixed-size kinds ignore `requested`, scalars accept `1..=MAX_SCALAR_COMPONENTS`. Returns `None`
    /// if the request is invalid.
    pub fn resolve_components(self, requested: u32) -> Option<u32> {
        match self.fixed_components() {
            Some(fixed) => Some(fixed),
            None if (1..=MAX_SCALAR_COMPONENTS).contains(&requested) => Some(requested),
            None => None,
        }
    }
}

impl Display for AttributeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AttributeKind::PointScalar => "point scalar",
            AttributeKind::PointVector => "point vector",
            AttributeKind::PointNormal => "point normal",
            AttributeKind::PointTensor => "point tensor",
            AttributeKind::PointRgba => "point RGBA",
            AttributeKind::CellScalar => "cell scalar",
            AttributeKind::CellVector => "cell vector",
            AttributeKind::CellNormal => "cell normal",
            AttributeKind::CellTensor => "cell tensor",
            AttributeKind::CellRgba => "cell RGBA",
        };
        f.write_str(name)
    }
}

/// Numeric representation of the values of an attribute. The discriminants are the wire codes, which occupy
/// the upper three bits of the attribute type byte. `Float32` is code 0, so type bytes from peers that only
/// know single-precision attributes decode as `Float32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum DataType {
    Float32 = 0,
    Float64 = 1,
    Int8 = 2,
    UInt8 = 3,
    Int16 = 4,
    UInt16 = 5,
    Int32 = 6,
    UInt32 = 7,
}

impl DataType {
    /// Bit offset of the data type code within an attribute type byte
    pub const TYPE_BYTE_SHIFT: u32 = 5;

    pub const ALL: [DataType; 8] = [
        DataType::Float32,
        DataType::Float64,
        DataType::Int8,
        DataType::UInt8,
        DataType::Int16,
        DataType::UInt16,
        DataType::Int32,
        DataType::UInt32,
    ];

    /// Returns the `DataType` for the given wire code, or `None` if the code is unknown
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Returns the wire code of this data type
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Size in bytes of a single value of this data type
    pub const fn size(self) -> usize {
        match self {
            DataType::Int8 | DataType::UInt8 => 1,
            DataType::Int16 | DataType::UInt16 => 2,
            DataType::Int32 | DataType::UInt32 | DataType::Float32 => 4,
            DataType::Float64 => 8,
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, DataType::Float32 | DataType::Float64)
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Combines an [AttributeKind] and a [DataType] into the attribute type byte used on the wire
pub fn encode_type_byte(kind: AttributeKind, data_type: DataType) -> u8 {
    kind.code() | (data_type.code() << DataType::TYPE_BYTE_SHIFT)
}

/// Splits an attribute type byte into its raw kind code and its [DataType]. The kind code is not validated.
pub fn decode_type_byte(type_byte: u8) -> (u8, DataType) {
    let kind_code = type_byte & AttributeKind::TYPE_BYTE_MASK;
    let data_type_code = type_byte >> DataType::TYPE_BYTE_SHIFT;
    // Three bits can only hold the eight valid codes
    let data_type = DataType::ALL[data_type_code as usize];
    (kind_code, data_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes_roundtrip() {
        for kind in AttributeKind::ALL.iter().copied() {
            assert_eq!(AttributeKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(AttributeKind::from_code(0x05), None);
        assert_eq!(AttributeKind::from_code(0x0F), None);
        assert_eq!(AttributeKind::from_code(0x15), None);
    }

    #[test]
    fn test_kind_domains() {
        assert_eq!(AttributeKind::PointTensor.domain(), AttributeDomain::Point);
        assert_eq!(AttributeKind::CellScalar.domain(), AttributeDomain::Cell);
        assert_eq!(AttributeKind::CellRgba.domain(), AttributeDomain::Cell);
    }

    #[test]
    fn test_component_rules() {
        assert_eq!(AttributeKind::PointScalar.resolve_components(1), Some(1));
        assert_eq!(AttributeKind::CellScalar.resolve_components(127), Some(127));
        assert_eq!(AttributeKind::PointScalar.resolve_components(0), None);
        assert_eq!(AttributeKind::PointScalar.resolve_components(128), None);
        assert_eq!(AttributeKind::PointVector.resolve_components(0), Some(3));
        assert_eq!(AttributeKind::CellNormal.resolve_components(200), Some(3));
        assert_eq!(AttributeKind::PointTensor.resolve_components(1), Some(9));
        assert_eq!(AttributeKind::CellRgba.resolve_components(1), Some(4));
    }

    #[test]
    fn test_type_byte_roundtrip() {
        for kind in AttributeKind::ALL.iter().copied() {
            for data_type in DataType::ALL.iter().copied() {
                let type_byte = encode_type_byte(kind, data_type);
                assert_eq!(decode_type_byte(type_byte), (kind.code(), data_type));
            }
        }
    }

    #[test]
    fn test_legacy_type_byte_is_float32() {
        assert_eq!(
            encode_type_byte(AttributeKind::PointScalar, DataType::Float32),
            0x00
        );
        assert_eq!(decode_type_byte(0x11), (0x11, DataType::Float32));
        assert_eq!(decode_type_byte(0xE4), (0x04, DataType::UInt32));
    }

    #[test]
    fn test_data_type_sizes() {
        let sizes = DataType::ALL
            .iter()
            .map(|data_type| data_type.size())
            .collect::<Vec<_>>();
        assert_eq!(sizes, vec![4, 8, 1, 1, 2, 2, 4, 4]);
    }
}
