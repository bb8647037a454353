use anyhow::Result;
use byteorder::ByteOrder;
use log::trace;
use polydata_core::{
    attribute::{AttributeData, AttributeKind},
    math::Alignable,
};

use super::{
    AttributeInfo, CellChannel, CodecError, PolyDataHeader, PolyDataInfo,
    ATTRIBUTE_HEADER_BYTE_LENGTH,
};

/// Hands out consecutive sections of a received payload, failing instead of reading past its end
struct SectionCursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> SectionCursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.offset..]
    }

    fn take(&mut self, section: &'static str, len: usize) -> Result<&'a [u8], CodecError> {
        let available = self.bytes.len() - self.offset;
        if len > available {
            return Err(CodecError::Truncated {
                section,
                offset: self.offset,
                required: len,
                available,
            });
        }
        let start = self.offset;
        self.offset += len;
        Ok(&self.bytes[start..self.offset])
    }

    /// Takes `count` elements of `element_size` bytes each
    fn take_elements(
        &mut self,
        section: &'static str,
        count: usize,
        element_size: usize,
    ) -> Result<&'a [u8], CodecError> {
        let len = count.checked_mul(element_size).ok_or_else(|| {
            CodecError::MalformedHeader(format!(
                "{} elements of {} are too many to address",
                count, section
            ))
        })?;
        self.take(section, len)
    }
}

/// Decodes the values of a single attribute. `bytes` holds exactly `values.len()` values.
fn read_attribute_data<E: ByteOrder>(bytes: &[u8], values: &mut AttributeData) {
    match values {
        AttributeData::Float32(values) => E::read_f32_into(bytes, values),
        AttributeData::Float64(values) => E::read_f64_into(bytes, values),
        AttributeData::Int8(values) => values
            .iter_mut()
            .zip(bytes)
            .for_each(|(value, byte)| *value = *byte as i8),
        AttributeData::UInt8(values) => values.copy_from_slice(bytes),
        AttributeData::Int16(values) => E::read_i16_into(bytes, values),
        AttributeData::UInt16(values) => E::read_u16_into(bytes, values),
        AttributeData::Int32(values) => E::read_i32_into(bytes, values),
        AttributeData::UInt32(values) => E::read_u32_into(bytes, values),
    }
}

/// Checks that the type byte and component count of `attribute` form a valid attribute type
fn check_attribute_type(attribute: &AttributeInfo, index: usize) -> Result<(), CodecError> {
    let valid = attribute
        .kind()
        .and_then(|kind: AttributeKind| kind.resolve_components(attribute.n_components as u32))
        .map_or(false, |components| components == attribute.n_components as u32);
    if valid {
        Ok(())
    } else {
        Err(CodecError::MalformedHeader(format!(
            "attribute {} has invalid type byte {:#04x} with {} components",
            index, attribute.type_byte, attribute.n_components
        )))
    }
}

/// Parses a POLYDATA content payload in byte order `E` into a fully populated [PolyDataInfo].
///
/// Every section the header declares is bounds-checked before any buffer is allocated, so the memory used for the
/// descriptor never exceeds the size of `bytes`. Bytes after the declared content are ignored.
pub fn unpack<E: ByteOrder>(bytes: &[u8]) -> Result<PolyDataInfo> {
    let mut cursor = SectionCursor::new(bytes);

    let mut header_words = [0_u32; PolyDataHeader::WORD_COUNT];
    E::read_u32_into(
        cursor.take("header", PolyDataHeader::BYTE_LENGTH)?,
        &mut header_words,
    );
    let header = PolyDataHeader::from_words(header_words);
    for channel in CellChannel::ALL.iter().copied() {
        let size = header.cell_data_size(channel);
        if size % 4 != 0 {
            return Err(CodecError::MalformedHeader(format!(
                "size of {} ({} bytes) is not a multiple of 4",
                channel, size
            ))
            .into());
        }
    }

    let points_bytes = cursor.take_elements("points", header.npoints as usize, 12)?;
    let mut cell_bytes: [&[u8]; 4] = Default::default();
    for channel in CellChannel::ALL.iter().copied() {
        trace!("Reading {} at offset {}", channel, cursor.offset);
        cell_bytes[channel.index()] =
            cursor.take(channel.name(), header.cell_data_size(channel) as usize)?;
    }

    let attribute_headers = cursor.take_elements(
        "attribute headers",
        header.nattributes as usize,
        ATTRIBUTE_HEADER_BYTE_LENGTH,
    )?;
    let mut attributes = attribute_headers
        .chunks_exact(ATTRIBUTE_HEADER_BYTE_LENGTH)
        .map(|record| {
            AttributeInfo::new(record[0], record[1], E::read_u32(&record[2..]), String::new())
        })
        .collect::<Vec<_>>();
    for (index, attribute) in attributes.iter().enumerate() {
        check_attribute_type(attribute, index)?;
    }

    trace!("Reading attribute names at offset {}", cursor.offset);
    let mut names_length = 0;
    for (index, attribute) in attributes.iter_mut().enumerate() {
        let terminator = cursor
            .remaining()
            .iter()
            .position(|byte| *byte == 0)
            .ok_or_else(|| {
                CodecError::MalformedHeader(format!(
                    "name of attribute {} is not NUL-terminated",
                    index
                ))
            })?;
        let name = cursor.take("attribute names", terminator + 1)?;
        attribute.name = std::str::from_utf8(&name[..terminator])
            .map_err(|_| {
                CodecError::MalformedHeader(format!("name of attribute {} is not valid UTF-8", index))
            })?
            .to_owned();
        names_length += terminator + 1;
    }
    cursor.take("attribute names padding", names_length.padding_to(2))?;

    let mut attribute_bytes = Vec::with_capacity(attributes.len());
    for attribute in &attributes {
        attribute_bytes.push(cursor.take_elements(
            "attribute data",
            attribute.value_count(),
            attribute.data_type().size(),
        )?);
    }

    if cursor.offset < bytes.len() {
        trace!(
            "Ignoring {} trailing bytes after POLYDATA content",
            bytes.len() - cursor.offset
        );
    }

    let mut info = PolyDataInfo::new();
    info.header = header;
    info.attributes = attributes;
    info.allocate_buffers()?;

    E::read_f32_into(points_bytes, &mut info.points);
    for channel in CellChannel::ALL.iter().copied() {
        E::read_u32_into(cell_bytes[channel.index()], info.cells_mut(channel));
    }
    for (attribute, bytes) in info.attributes.iter_mut().zip(attribute_bytes) {
        read_attribute_data::<E>(bytes, &mut attribute.data);
    }

    Ok(info)
}
