use std::{iter::FromIterator, mem::size_of};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::PolyDataError;

/// A single cell: the ordered point indices of one vertex, line, polygon or triangle strip
pub type Cell = Vec<u32>;

/// One topology channel of a POLYDATA message. A `CellArray` holds an ordered list of cells of varying length.
/// In serialized form, every cell is written as a length word followed by its point indices, with no padding
/// between cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellArray {
    cells: Vec<Cell>,
}

impl CellArray {
    pub fn new() -> Self {
        Default::default()
    }

    /// Rebuilds a `CellArray` from `cell_count` length-prefixed runs stored in `words`. Runs with a length of
    /// zero are skipped, matching [add_cell](Self::add_cell). Words after the last run are ignored.
    pub fn from_length_prefixed(words: &[u32], cell_count: usize) -> Result<Self, PolyDataError> {
        let mut cells = CellArray::new();
        let mut offset = 0;
        for _ in 0..cell_count {
            let malformed = PolyDataError::MalformedCells {
                offset,
                len: words.len(),
            };
            let run_length = *words.get(offset).ok_or_else(|| malformed.clone())? as usize;
            let run_start = offset + 1;
            let run_end = run_start
                .checked_add(run_length)
                .filter(|&end| end <= words.len())
                .ok_or(malformed)?;
            cells.add_cell(&words[run_start..run_end]);
            offset = run_end;
        }
        Ok(cells)
    }

    /// Returns the number of cells in this channel
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Appends a copy of `indices` as a new cell. A cell needs at least one index, so empty slices are ignored.
    pub fn add_cell(&mut self, indices: &[u32]) {
        if indices.is_empty() {
            return;
        }
        self.cells.push(indices.to_vec());
    }

    /// Returns the number of indices in the cell at `id`, or 0 if there is no such cell
    pub fn cell_length(&self, id: usize) -> usize {
        self.cells.get(id).map(|cell| cell.len()).unwrap_or(0)
    }

    /// Size in bytes of this channel in serialized form, i.e. one length word plus the indices for every cell
    pub fn total_size_bytes(&self) -> usize {
        self.cells
            .iter()
            .map(|cell| (cell.len() + 1) * size_of::<u32>())
            .sum()
    }

    /// Copies the indices of the cell at `id` into `cell`, replacing its previous contents
    pub fn get_cell(&self, id: usize, cell: &mut Cell) -> Result<(), PolyDataError> {
        let src = self.cell(id).ok_or(PolyDataError::IndexOutOfRange {
            index: id,
            len: self.cells.len(),
        })?;
        cell.clear();
        cell.extend_from_slice(src);
        Ok(())
    }

    /// Borrows the indices of the cell at `id`
    pub fn cell(&self, id: usize) -> Option<&[u32]> {
        self.cells.get(id).map(|cell| cell.as_slice())
    }

    pub fn cells(&self) -> impl Iterator<Item = &[u32]> + '_ {
        self.cells.iter().map(|cell| cell.as_slice())
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Appends all cells of this channel to `words` as length-prefixed runs
    pub fn write_length_prefixed(&self, words: &mut Vec<u32>) {
        words.reserve(self.total_size_bytes() / size_of::<u32>());
        for cell in &self.cells {
            words.push(cell.len() as u32);
            words.extend_from_slice(cell);
        }
    }

    /// Returns all cells of this channel as length-prefixed runs
    pub fn to_length_prefixed(&self) -> Vec<u32> {
        let mut words = vec![];
        self.write_length_prefixed(&mut words);
        words
    }
}

impl<'a> FromIterator<&'a [u32]> for CellArray {
    fn from_iter<I: IntoIterator<Item = &'a [u32]>>(iter: I) -> Self {
        let mut cells = CellArray::new();
        for cell in iter {
            cells.add_cell(cell);
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_triangle_size() {
        let mut polygons = CellArray::new();
        polygons.add_cell(&[0, 1, 2]);
        assert_eq!(polygons.cell_count(), 1);
        assert_eq!(polygons.cell_length(0), 3);
        assert_eq!(polygons.total_size_bytes(), 16);
    }

    #[test]
    fn test_empty_cells_are_ignored() {
        let mut lines = CellArray::new();
        lines.add_cell(&[]);
        assert!(lines.is_empty());
        assert_eq!(lines.total_size_bytes(), 0);
    }

    #[test]
    fn test_get_cell() {
        let mut strips = CellArray::new();
        strips.add_cell(&[0, 1, 2, 3, 4]);
        strips.add_cell(&[7]);

        let mut cell = vec![42, 42, 42, 42, 42, 42];
        strips.get_cell(1, &mut cell).unwrap();
        assert_eq!(cell, vec![7]);
        strips.get_cell(0, &mut cell).unwrap();
        assert_eq!(cell, vec![0, 1, 2, 3, 4]);

        assert_eq!(
            strips.get_cell(2, &mut cell),
            Err(PolyDataError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(cell, vec![0, 1, 2, 3, 4]);
        assert_eq!(strips.cell_length(2), 0);
    }

    #[test]
    fn test_length_prefixed_runs() {
        let mut polygons = CellArray::new();
        polygons.add_cell(&[0, 1, 2]);
        polygons.add_cell(&[2, 3, 4, 5]);

        let words = polygons.to_length_prefixed();
        assert_eq!(words, vec![3, 0, 1, 2, 4, 2, 3, 4, 5]);
        assert_eq!(words.len() * 4, polygons.total_size_bytes());

        let rebuilt = CellArray::from_length_prefixed(&words, 2).unwrap();
        assert_eq!(rebuilt, polygons);
    }

    #[test]
    fn test_length_prefixed_overrun() {
        assert_eq!(
            CellArray::from_length_prefixed(&[3, 0, 1], 1),
            Err(PolyDataError::MalformedCells { offset: 0, len: 3 })
        );
        assert_eq!(
            CellArray::from_length_prefixed(&[1, 0], 2),
            Err(PolyDataError::MalformedCells { offset: 2, len: 2 })
        );
        assert_eq!(
            CellArray::from_length_prefixed(&[u32::MAX, 0], 1),
            Err(PolyDataError::MalformedCells { offset: 0, len: 2 })
        );
    }

    #[test]
    fn test_length_prefixed_zero_runs_are_skipped() {
        let cells = CellArray::from_length_prefixed(&[0, 1, 9], 2).unwrap();
        assert_eq!(cells.cell_count(), 1);
        assert_eq!(cells.cell(0), Some(&[9_u32][..]));
    }

    #[test]
    fn test_random_cells_roundtrip_through_length_prefixed_runs() -> anyhow::Result<()> {
        use rand::Rng;

        let mut rng = rand::thread_rng();
        let cells = (0..64)
            .map(|_| {
                (0..rng.gen_range(1..10))
                    .map(|_| rng.gen())
                    .collect::<Vec<u32>>()
            })
            .collect::<Vec<_>>();
        let expected = cells.iter().map(|cell| cell.as_slice()).collect::<CellArray>();

        let words = expected.to_length_prefixed();
        assert_eq!(words.len() * 4, expected.total_size_bytes());
        let actual = CellArray::from_length_prefixed(&words, expected.cell_count())?;
        assert_eq!(expected, actual);
        Ok(())
    }
}
