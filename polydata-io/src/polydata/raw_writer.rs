use std::io::Write;

use anyhow::{Context, Result};
use byteorder::{ByteOrder, WriteBytesExt};
use log::trace;
use polydata_core::{attribute::AttributeData, math::Alignable};

use super::{size_of_content, CellChannel, CodecError, PolyDataInfo};

/// `Write` adapter that counts the bytes written through it
struct CountingWriter<W: Write> {
    inner: W,
    bytes_written: usize,
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let count = self.inner.write(buf)?;
        self.bytes_written += count;
        Ok(count)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

fn check_buffer_len(section: &'static str, expected: usize, actual: usize) -> Result<(), CodecError> {
    if expected != actual {
        Err(CodecError::SizeMismatch {
            section,
            expected,
            actual,
        })
    } else {
        Ok(())
    }
}

/// Checks that all bulk buffers of `info` have the sizes its header and attribute headers declare
fn check_buffers(info: &PolyDataInfo) -> Result<(), CodecError> {
    check_buffer_len(
        "points",
        info.header.npoints as usize * 3,
        info.points.len(),
    )?;
    for channel in CellChannel::ALL.iter().copied() {
        let size = info.header.cell_data_size(channel) as usize;
        if size % 4 != 0 {
            return Err(CodecError::MalformedHeader(format!(
                "size of {} ({} bytes) is not a multiple of 4",
                channel, size
            )));
        }
        check_buffer_len(channel.name(), size / 4, info.cells(channel).len())?;
    }
    check_buffer_len(
        "attribute headers",
        info.header.nattributes as usize,
        info.attributes.len(),
    )?;
    for attribute in &info.attributes {
        check_buffer_len(
            "attribute data",
            attribute.value_count(),
            attribute.data.len(),
        )?;
        if attribute.data.data_type() != attribute.data_type() {
            return Err(CodecError::MalformedHeader(format!(
                "attribute '{}' declares {} values but stores {} values",
                attribute.name,
                attribute.data_type(),
                attribute.data.data_type()
            )));
        }
    }
    Ok(())
}

fn write_attribute_data<E: ByteOrder, W: Write>(data: &AttributeData, mut writer: W) -> Result<()> {
    match data {
        AttributeData::Float32(values) => values
            .iter()
            .try_for_each(|value| writer.write_f32::<E>(*value))?,
        AttributeData::Float64(values) => values
            .iter()
            .try_for_each(|value| writer.write_f64::<E>(*value))?,
        AttributeData::Int8(values) => values
            .iter()
            .try_for_each(|value| writer.write_i8(*value))?,
        AttributeData::UInt8(values) => writer.write_all(values)?,
        AttributeData::Int16(values) => values
            .iter()
            .try_for_each(|value| writer.write_i16::<E>(*value))?,
        AttributeData::UInt16(values) => values
            .iter()
            .try_for_each(|value| writer.write_u16::<E>(*value))?,
        AttributeData::Int32(values) => values
            .iter()
            .try_for_each(|value| writer.write_i32::<E>(*value))?,
        AttributeData::UInt32(values) => values
            .iter()
            .try_for_each(|value| writer.write_u32::<E>(*value))?,
    }
    Ok(())
}

/// Writes the content described by `info` to `writer` using the byte order `E`. The bulk buffers of `info` must be
/// allocated and filled. Returns the number of bytes written, which is always equal to
/// [size_of_content](super::size_of_content).
///
/// Sections are written in wire order: header, points, vertices, lines, polygons, triangle strips, attribute
/// headers, attribute names (padded to an even length) and attribute values.
pub fn pack<E: ByteOrder, W: Write>(info: &PolyDataInfo, writer: W) -> Result<usize> {
    check_buffers(info)?;

    let mut writer = CountingWriter {
        inner: writer,
        bytes_written: 0,
    };

    for word in info.header.as_words() {
        writer.write_u32::<E>(*word)?;
    }

    trace!("Writing {} point coordinates at offset {}", info.points.len(), writer.bytes_written);
    for coordinate in &info.points {
        writer.write_f32::<E>(*coordinate)?;
    }

    for channel in CellChannel::ALL.iter().copied() {
        trace!("Writing {} at offset {}", channel, writer.bytes_written);
        for word in info.cells(channel) {
            writer.write_u32::<E>(*word)?;
        }
    }

    trace!("Writing {} attribute headers at offset {}", info.attributes.len(), writer.bytes_written);
    for attribute in &info.attributes {
        writer.write_u8(attribute.type_byte)?;
        writer.write_u8(attribute.n_components)?;
        writer.write_u32::<E>(attribute.n)?;
    }

    let names_length = info.names_length();
    for attribute in &info.attributes {
        writer.write_all(attribute.name.as_bytes())?;
        writer.write_u8(0)?;
    }
    if names_length.padding_to(2) > 0 {
        writer.write_u8(0)?;
    }

    for attribute in &info.attributes {
        trace!("Writing values of attribute '{}' at offset {}", attribute.name, writer.bytes_written);
        write_attribute_data::<E, _>(&attribute.data, &mut writer)
            .with_context(|| format!("Failed to write values of attribute '{}'", attribute.name))?;
    }

    let expected = size_of_content(info);
    if writer.bytes_written != expected {
        return Err(CodecError::SizeMismatch {
            section: "packed content",
            expected,
            actual: writer.bytes_written,
        }
        .into());
    }
    Ok(writer.bytes_written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polydata::AttributeInfo;
    use byteorder::{BigEndian, LittleEndian};
    use polydata_core::attribute::{encode_type_byte, AttributeKind, DataType};

    #[test]
    fn test_pack_empty() -> Result<()> {
        let mut bytes = vec![];
        let written = pack::<BigEndian, _>(&PolyDataInfo::new(), &mut bytes)?;
        assert_eq!(written, 40);
        assert_eq!(bytes, vec![0; 40]);
        Ok(())
    }

    #[test]
    fn test_pack_layout() -> Result<()> {
        let mut info = PolyDataInfo::new();
        info.header.npoints = 1;
        info.header.set_cell_channel(CellChannel::Vertices, 1, 8);
        info.header.nattributes = 1;
        info.attributes.push(AttributeInfo::new(
            encode_type_byte(AttributeKind::PointScalar, DataType::Int16),
            1,
            1,
            "a".to_owned(),
        ));
        info.allocate_buffers()?;
        info.points.copy_from_slice(&[1.0, 2.0, 3.0]);
        info.cells_mut(CellChannel::Vertices).copy_from_slice(&[1, 0]);
        info.attributes[0].data = AttributeData::Int16(vec![-2]);

        let mut bytes = vec![];
        let written = pack::<BigEndian, _>(&info, &mut bytes)?;
        assert_eq!(written, bytes.len());
        assert_eq!(written, size_of_content(&info));

        let mut expected = vec![0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 8];
        expected.extend_from_slice(&[0; 24]);
        expected.extend_from_slice(&[0, 0, 0, 1]);
        expected.extend_from_slice(&1.0_f32.to_be_bytes());
        expected.extend_from_slice(&2.0_f32.to_be_bytes());
        expected.extend_from_slice(&3.0_f32.to_be_bytes());
        expected.extend_from_slice(&[0, 0, 0, 1, 0, 0, 0, 0]);
        expected.extend_from_slice(&[0x80, 1, 0, 0, 0, 1]);
        expected.extend_from_slice(b"a\0");
        expected.extend_from_slice(&(-2_i16).to_be_bytes());
        assert_eq!(bytes, expected);

        let mut little_endian_bytes = vec![];
        pack::<LittleEndian, _>(&info, &mut little_endian_bytes)?;
        assert_eq!(&little_endian_bytes[0..4], &[1, 0, 0, 0]);
        Ok(())
    }

    #[test]
    fn test_pack_odd_names_length_adds_one_pad_byte() -> Result<()> {
        let mut info = PolyDataInfo::new();
        info.header.nattributes = 1;
        info.attributes.push(AttributeInfo::new(
            encode_type_byte(AttributeKind::CellScalar, DataType::UInt8),
            1,
            0,
            "ab".to_owned(),
        ));
        info.allocate_buffers()?;

        let mut bytes = vec![];
        pack::<BigEndian, _>(&info, &mut bytes)?;
        assert_eq!(&bytes[46..], b"ab\0\0");
        Ok(())
    }

    #[test]
    fn test_pack_rejects_unallocated_buffers() {
        let mut info = PolyDataInfo::new();
        info.header.npoints = 2;
        let err = pack::<BigEndian, _>(&info, vec![]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CodecError>(),
            Some(&CodecError::SizeMismatch {
                section: "points",
                expected: 6,
                actual: 0
            })
        );
    }

    #[test]
    fn test_pack_into_short_slice_fails() -> Result<()> {
        let mut info = PolyDataInfo::new();
        info.header.npoints = 1;
        info.allocate_buffers()?;
        let mut out = [0_u8; 45];
        assert!(pack::<BigEndian, _>(&info, &mut out[..]).is_err());
        Ok(())
    }
}
