use anyhow::{Context, Result};
use byteorder::NetworkEndian;
use log::debug;
use polydata_core::{
    attribute::Attribute,
    geometry::{CellArray, PointArray},
};

use super::{
    pack, polydata_info::wire_u32, size_of_content, unpack, AttributeInfo, CellChannel, CodecError,
    PolyDataInfo, GET_POLYDATA_MESSAGE_TYPE, POLYDATA_MESSAGE_TYPE,
};
use crate::base::{ContentBuffer, MessageContent};

/// A polygonal surface mesh: points, four cell channels and any number of per-point or per-cell attributes.
///
/// Points and cell channels are optional and absent in a new message. Attributes are kept in insertion order, which
/// is also the order in which they are packed. Unpacking replaces the whole content of the message.
/// ```
/// # use polydata_io::{base::*, polydata::*};
/// # use polydata_core::geometry::*;
/// let mut message = PolyDataMessage::new();
/// message.set_points(PointArray::from_flat_coordinates(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]));
/// let mut polygons = CellArray::new();
/// polygons.add_cell(&[0, 1, 2]);
/// message.set_polygons(polygons);
///
/// let mut buffer = ContentBuffer::new();
/// message.pack_content(&mut buffer).unwrap();
///
/// let mut received = PolyDataMessage::new();
/// received.unpack_content(&buffer).unwrap();
/// assert_eq!(received.points().unwrap().count(), 3);
/// assert_eq!(received.polygons().unwrap().cell(0), Some(&[0, 1, 2][..]));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolyDataMessage {
    points: Option<PointArray>,
    vertices: Option<CellArray>,
    lines: Option<CellArray>,
    polygons: Option<CellArray>,
    triangle_strips: Option<CellArray>,
    attributes: Vec<Attribute>,
}

impl PolyDataMessage {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn points(&self) -> Option<&PointArray> {
        self.points.as_ref()
    }

    pub fn points_mut(&mut self) -> Option<&mut PointArray> {
        self.points.as_mut()
    }

    pub fn set_points(&mut self, points: PointArray) {
        self.points = Some(points);
    }

    /// Returns the cell array of the given channel, if present
    pub fn cells(&self, channel: CellChannel) -> Option<&CellArray> {
        match channel {
            CellChannel::Vertices => self.vertices.as_ref(),
            CellChannel::Lines => self.lines.as_ref(),
            CellChannel::Polygons => self.polygons.as_ref(),
            CellChannel::TriangleStrips => self.triangle_strips.as_ref(),
        }
    }

    pub fn cells_mut(&mut self, channel: CellChannel) -> Option<&mut CellArray> {
        self.cells_slot(channel).as_mut()
    }

    pub fn set_cells(&mut self, channel: CellChannel, cells: CellArray) {
        *self.cells_slot(channel) = Some(cells);
    }

    fn cells_slot(&mut self, channel: CellChannel) -> &mut Option<CellArray> {
        match channel {
            CellChannel::Vertices => &mut self.vertices,
            CellChannel::Lines => &mut self.lines,
            CellChannel::Polygons => &mut self.polygons,
            CellChannel::TriangleStrips => &mut self.triangle_strips,
        }
    }

    pub fn vertices(&self) -> Option<&CellArray> {
        self.vertices.as_ref()
    }

    pub fn set_vertices(&mut self, vertices: CellArray) {
        self.vertices = Some(vertices);
    }

    pub fn lines(&self) -> Option<&CellArray> {
        self.lines.as_ref()
    }

    pub fn set_lines(&mut self, lines: CellArray) {
        self.lines = Some(lines);
    }

    pub fn polygons(&self) -> Option<&CellArray> {
        self.polygons.as_ref()
    }

    pub fn set_polygons(&mut self, polygons: CellArray) {
        self.polygons = Some(polygons);
    }

    pub fn triangle_strips(&self) -> Option<&CellArray> {
        self.triangle_strips.as_ref()
    }

    pub fn set_triangle_strips(&mut self, triangle_strips: CellArray) {
        self.triangle_strips = Some(triangle_strips);
    }

    /// Appends an attribute. Attribute names don't have to be unique.
    pub fn add_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    pub fn attribute(&self, id: usize) -> Option<&Attribute> {
        self.attributes.get(id)
    }

    pub fn attribute_mut(&mut self, id: usize) -> Option<&mut Attribute> {
        self.attributes.get_mut(id)
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    pub fn clear_attributes(&mut self) {
        self.attributes.clear();
    }

    /// Removes points, cells and attributes
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Builds a descriptor that holds the header and the attribute metadata, but no bulk data
    fn header_info(&self) -> Result<PolyDataInfo, CodecError> {
        let mut info = PolyDataInfo::new();
        info.header.npoints = wire_u32("npoints", self.points.as_ref().map_or(0, PointArray::count))?;
        for channel in CellChannel::ALL.iter().copied() {
            if let Some(cells) = self.cells(channel) {
                info.header.set_cell_channel(
                    channel,
                    wire_u32("number of cells", cells.cell_count())?,
                    wire_u32("size of cells", cells.total_size_bytes())?,
                );
            }
        }
        info.header.nattributes = wire_u32("nattributes", self.attributes.len())?;
        info.attributes = self
            .attributes
            .iter()
            .map(|attribute| -> Result<AttributeInfo, CodecError> {
                Ok(AttributeInfo::new(
                    attribute.type_byte(),
                    attribute.n_components() as u8,
                    wire_u32("attribute size", attribute.size())?,
                    attribute.name().to_owned(),
                ))
            })
            .collect::<Result<Vec<_>, CodecError>>()?;
        Ok(info)
    }

    /// Builds a descriptor with all bulk buffers allocated and filled from this message
    fn full_info(&self) -> Result<PolyDataInfo> {
        let mut info = self.header_info()?;
        info.allocate_buffers()?;

        if let Some(points) = &self.points {
            info.points.copy_from_slice(points.as_flat_coordinates());
        }
        for channel in CellChannel::ALL.iter().copied() {
            if let Some(cells) = self.cells(channel) {
                let words = info.cells_mut(channel);
                words.clear();
                cells.write_length_prefixed(words);
            }
        }
        for (attribute_info, attribute) in info.attributes.iter_mut().zip(&self.attributes) {
            attribute_info
                .data
                .copy_from(attribute.values())
                .with_context(|| format!("Failed to copy values of attribute '{}'", attribute.name()))?;
        }
        Ok(info)
    }

    fn replace_from_info(&mut self, info: PolyDataInfo) -> Result<()> {
        let mut staged = PolyDataMessage::new();
        staged.points = Some(PointArray::from_flat_coordinates(&info.points));
        for channel in CellChannel::ALL.iter().copied() {
            let cells = CellArray::from_length_prefixed(
                info.cells(channel),
                info.header.cell_count(channel) as usize,
            )
            .with_context(|| format!("Malformed {} in POLYDATA content", channel))?;
            staged.set_cells(channel, cells);
        }
        for (index, attribute_info) in info.attributes.into_iter().enumerate() {
            let mut attribute = Attribute::new();
            attribute
                .set_type(attribute_info.type_byte, attribute_info.n_components as u32)
                .with_context(|| format!("Invalid type of attribute {}", index))?;
            attribute
                .set_element_count(attribute_info.n as usize)
                .with_context(|| format!("Failed to size attribute {}", index))?;
            attribute
                .set_name(attribute_info.name)
                .with_context(|| format!("Invalid name of attribute {}", index))?;
            attribute.replace_values(attribute_info.data)?;
            staged.attributes.push(attribute);
        }
        *self = staged;
        Ok(())
    }
}

impl MessageContent for PolyDataMessage {
    fn message_type(&self) -> &'static str {
        POLYDATA_MESSAGE_TYPE
    }

    fn calculate_content_size(&self) -> Result<usize> {
        Ok(size_of_content(&self.header_info()?))
    }

    fn pack_content(&self, buffer: &mut ContentBuffer) -> Result<()> {
        let size = self.calculate_content_size()?;
        let info = self.full_info().context("Failed to prepare POLYDATA content")?;
        let written = pack::<NetworkEndian, _>(&info, buffer.allocate(size))
            .context("Failed to pack POLYDATA content")?;
        if written != size {
            return Err(CodecError::SizeMismatch {
                section: "POLYDATA content",
                expected: size,
                actual: written,
            }
            .into());
        }
        debug!(
            "Packed POLYDATA content with {} points, {} attributes into {} bytes",
            info.header.npoints, info.header.nattributes, size
        );
        Ok(())
    }

    fn unpack_content(&mut self, buffer: &ContentBuffer) -> Result<()> {
        let result = unpack::<NetworkEndian>(buffer.content())
            .and_then(|info| self.replace_from_info(info));
        if let Err(err) = &result {
            debug!("Rejected POLYDATA content of {} bytes: {:#}", buffer.len(), err);
        }
        result.context("Failed to unpack POLYDATA content")?;
        debug!(
            "Unpacked POLYDATA content with {} points, {} attributes",
            self.points.as_ref().map_or(0, PointArray::count),
            self.attributes.len()
        );
        Ok(())
    }
}

/// Request for a POLYDATA message. The content is always empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetPolyDataMessage;

impl GetPolyDataMessage {
    pub fn new() -> Self {
        Self
    }
}

impl MessageContent for GetPolyDataMessage {
    fn message_type(&self) -> &'static str {
        GET_POLYDATA_MESSAGE_TYPE
    }

    fn calculate_content_size(&self) -> Result<usize> {
        Ok(0)
    }

    fn pack_content(&self, buffer: &mut ContentBuffer) -> Result<()> {
        buffer.allocate(0);
        Ok(())
    }

    fn unpack_content(&mut self, _buffer: &ContentBuffer) -> Result<()> {
        Ok(())
    }
}
