use std::{convert::TryFrom, mem::size_of};

use polydata_core::{
    attribute::{decode_type_byte, AttributeData, AttributeKind, DataType},
    math::Alignable,
};

use super::{
    CellChannel, CodecError, PolyDataHeader, ATTRIBUTE_HEADER_BYTE_LENGTH,
};

/// Wire-level description of a single attribute
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeInfo {
    /// Packed attribute type, kind in the lower five bits and data type in the upper three bits
    pub type_byte: u8,
    pub n_components: u8,
    /// Number of elements
    pub n: u32,
    pub name: String,
    /// `n * n_components` values. Empty until [PolyDataInfo::allocate_buffers] is called.
    pub data: AttributeData,
}

impl AttributeInfo {
    pub fn new(type_byte: u8, n_components: u8, n: u32, name: String) -> Self {
        let data_type = decode_type_byte(type_byte).1;
        Self {
            type_byte,
            n_components,
            n,
            name,
            data: AttributeData::zeroed(data_type, 0),
        }
    }

    pub fn data_type(&self) -> DataType {
        decode_type_byte(self.type_byte).1
    }

    /// Decoded attribute kind, or `None` if the type byte holds an unknown kind code
    pub fn kind(&self) -> Option<AttributeKind> {
        AttributeKind::from_code(decode_type_byte(self.type_byte).0)
    }

    pub fn value_count(&self) -> usize {
        self.n as usize * self.n_components as usize
    }

    /// Size of the attribute values on the wire
    pub fn data_size(&self) -> usize {
        self.value_count() * self.data_type().size()
    }
}

/// In-memory mirror of a POLYDATA content payload: the header, the attribute headers and names, and the bulk
/// buffers for points, cells and attribute values.
///
/// A descriptor is used in two stages. With only the header and the attribute metadata filled in, it is enough to
/// compute the packed size through [size_of_content]. After [allocate_buffers](Self::allocate_buffers), the bulk buffers have
/// the sizes the header declares and can be filled and packed. All buffers are owned, so dropping the descriptor
/// releases them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolyDataInfo {
    pub header: PolyDataHeader,
    /// `3 * npoints` coordinates
    pub points: Vec<f32>,
    cells: [Vec<u32>; 4],
    pub attributes: Vec<AttributeInfo>,
}

fn try_zeroed_vec<T: Copy + Default>(
    len: usize,
    section: &'static str,
) -> Result<Vec<T>, CodecError> {
    let mut values = Vec::new();
    values
        .try_reserve_exact(len)
        .map_err(|_| CodecError::Allocation {
            section,
            bytes: len.saturating_mul(size_of::<T>()),
        })?;
    values.resize(len, T::default());
    Ok(values)
}

/// Converts a count into its 32-bit wire field
pub(crate) fn wire_u32(field: &'static str, value: usize) -> Result<u32, CodecError> {
    u32::try_from(value).map_err(|_| CodecError::FieldOverflow { field, value })
}

impl PolyDataInfo {
    /// Creates an empty descriptor with a zeroed header and no buffers
    pub fn new() -> Self {
        Default::default()
    }

    /// Length-prefixed cell words of the given channel
    pub fn cells(&self, channel: CellChannel) -> &[u32] {
        &self.cells[channel.index()]
    }

    pub fn cells_mut(&mut self, channel: CellChannel) -> &mut Vec<u32> {
        &mut self.cells[channel.index()]
    }

    /// Total length of the names section, including the NUL terminators but excluding padding
    pub fn names_length(&self) -> usize {
        self.attributes
            .iter()
            .map(|attribute| attribute.name.len() + 1)
            .sum()
    }

    /// Resizes all bulk buffers to the sizes declared by the header and the attribute headers. All values are zero
    /// afterwards.
    pub fn allocate_buffers(&mut self) -> Result<(), CodecError> {
        self.points = try_zeroed_vec(self.header.npoints as usize * 3, "points")?;
        for channel in CellChannel::ALL.iter().copied() {
            let words = self.header.cell_data_size(channel) as usize / 4;
            self.cells[channel.index()] = try_zeroed_vec(words, channel.name())?;
        }
        for attribute in self.attributes.iter_mut() {
            attribute.data = AttributeData::try_zeroed(attribute.data_type(), attribute.value_count())
                .map_err(|_| CodecError::Allocation {
                    section: "attribute data",
                    bytes: attribute.data_size(),
                })?;
        }
        Ok(())
    }

    /// Frees all bulk buffers. The header and the attribute metadata are kept.
    pub fn release_buffers(&mut self) {
        self.points = Vec::new();
        self.cells = Default::default();
        for attribute in self.attributes.iter_mut() {
            attribute.data = AttributeData::zeroed(attribute.data_type(), 0);
        }
    }
}

/// Returns the packed size of the content described by `info` in bytes. Only the header and the attribute metadata
/// are used, the bulk buffers don't have to be allocated.
pub fn size_of_content(info: &PolyDataInfo) -> usize {
    let header = &info.header;
    let points_size = header.npoints as usize * 3 * size_of::<f32>();
    let cells_size: usize = CellChannel::ALL
        .iter()
        .map(|channel| header.cell_data_size(*channel) as usize)
        .sum();
    let attribute_headers_size = info.attributes.len() * ATTRIBUTE_HEADER_BYTE_LENGTH;
    let names_size = info.names_length().align_to(2);
    let data_size: usize = info
        .attributes
        .iter()
        .map(AttributeInfo::data_size)
        .sum();

    PolyDataHeader::BYTE_LENGTH
        + points_size
        + cells_size
        + attribute_headers_size
        + names_size
        + data_size
}
