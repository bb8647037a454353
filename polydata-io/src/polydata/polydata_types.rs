use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert;

/// Message type tag of POLYDATA messages
pub const POLYDATA_MESSAGE_TYPE: &str = "POLYDATA";
/// Message type tag of POLYDATA request messages
pub const GET_POLYDATA_MESSAGE_TYPE: &str = "GET_POLYDATA";
/// Message type tag of POLYDATA acknowledgment messages
pub const RTS_POLYDATA_MESSAGE_TYPE: &str = "RTS_POLYDATA";

/// The four cell channels of a POLYDATA message, in wire order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellChannel {
    Vertices,
    Lines,
    Polygons,
    TriangleStrips,
}

impl CellChannel {
    pub const ALL: [CellChannel; 4] = [
        CellChannel::Vertices,
        CellChannel::Lines,
        CellChannel::Polygons,
        CellChannel::TriangleStrips,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            CellChannel::Vertices => "vertices",
            CellChannel::Lines => "lines",
            CellChannel::Polygons => "polygons",
            CellChannel::TriangleStrips => "triangle strips",
        }
    }
}

impl std::fmt::Display for CellChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed-size header at the start of every POLYDATA content payload. For each cell channel, the header stores the
/// number of cells and the size of the length-prefixed cell data in bytes.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct PolyDataHeader {
    pub npoints: u32,
    pub nvertices: u32,
    pub size_vertices: u32,
    pub nlines: u32,
    pub size_lines: u32,
    pub npolygons: u32,
    pub size_polygons: u32,
    pub ntriangle_strips: u32,
    pub size_triangle_strips: u32,
    pub nattributes: u32,
}

impl PolyDataHeader {
    /// Length of a POLYDATA header in bytes
    pub const BYTE_LENGTH: usize = 40;
    pub(crate) const WORD_COUNT: usize = Self::BYTE_LENGTH / 4;

    /// Number of cells in the given channel
    pub fn cell_count(&self, channel: CellChannel) -> u32 {
        match channel {
            CellChannel::Vertices => self.nvertices,
            CellChannel::Lines => self.nlines,
            CellChannel::Polygons => self.npolygons,
            CellChannel::TriangleStrips => self.ntriangle_strips,
        }
    }

    /// Size of the length-prefixed cell data of the given channel in bytes
    pub fn cell_data_size(&self, channel: CellChannel) -> u32 {
        match channel {
            CellChannel::Vertices => self.size_vertices,
            CellChannel::Lines => self.size_lines,
            CellChannel::Polygons => self.size_polygons,
            CellChannel::TriangleStrips => self.size_triangle_strips,
        }
    }

    pub fn set_cell_channel(&mut self, channel: CellChannel, count: u32, size: u32) {
        let (count_field, size_field) = match channel {
            CellChannel::Vertices => (&mut self.nvertices, &mut self.size_vertices),
            CellChannel::Lines => (&mut self.nlines, &mut self.size_lines),
            CellChannel::Polygons => (&mut self.npolygons, &mut self.size_polygons),
            CellChannel::TriangleStrips => {
                (&mut self.ntriangle_strips, &mut self.size_triangle_strips)
            }
        };
        *count_field = count;
        *size_field = size;
    }

    /// The header fields in wire order
    pub(crate) fn as_words(&self) -> &[u32; Self::WORD_COUNT] {
        bytemuck::cast_ref(self)
    }

    pub(crate) fn from_words(words: [u32; Self::WORD_COUNT]) -> Self {
        bytemuck::cast(words)
    }
}

const_assert!(PolyDataHeader::BYTE_LENGTH == std::mem::size_of::<PolyDataHeader>());

/// Length of a single attribute header in bytes: type byte, component count and element count
pub const ATTRIBUTE_HEADER_BYTE_LENGTH: usize = 6;
