use std::iter::FromIterator;

use nalgebra::Vector3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::PolyDataError;

/// A single 3D point with single-precision coordinates
pub type Point = Vector3<f32>;

/// Ordered list of 3D points. The insertion order is the order in which points are written to the wire,
/// and the position of a point in this list is the index that cells refer to.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointArray {
    points: Vec<Point>,
}

impl PointArray {
    /// Creates a new, empty `PointArray`
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates a new, empty `PointArray` with space for `capacity` points
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Rebuilds a `PointArray` from a flat list of coordinates `[x0, y0, z0, x1, y1, z1, ...]`. Trailing
    /// coordinates that do not form a full point are ignored.
    pub fn from_flat_coordinates(coordinates: &[f32]) -> Self {
        coordinates
            .chunks_exact(3)
            .map(|xyz| Point::new(xyz[0], xyz[1], xyz[2]))
            .collect()
    }

    /// Returns the number of points
    pub fn count(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Resizes this `PointArray` to `count` points. New points are set to the origin. Fails with
    /// [PolyDataError::Allocation] and keeps all points if the memory for the new points cannot be reserved.
    pub fn set_count(&mut self, count: usize) -> Result<(), PolyDataError> {
        if count > self.points.len() {
            self.points
                .try_reserve_exact(count - self.points.len())
                .map_err(|_| PolyDataError::Allocation { count })?;
        }
        self.points.resize(count, Point::zeros());
        Ok(())
    }

    /// Overwrites the point at `id`. Fails if `id` is out of range.
    pub fn set_point(&mut self, id: usize, x: f32, y: f32, z: f32) -> Result<(), PolyDataError> {
        let len = self.points.len();
        let point = self
            .points
            .get_mut(id)
            .ok_or(PolyDataError::IndexOutOfRange { index: id, len })?;
        *point = Point::new(x, y, z);
        Ok(())
    }

    /// Returns the point at `id`. Fails if `id` is out of range.
    pub fn get_point(&self, id: usize) -> Result<Point, PolyDataError> {
        self.points
            .get(id)
            .copied()
            .ok_or(PolyDataError::IndexOutOfRange {
                index: id,
                len: self.points.len(),
            })
    }

    /// Appends a new point
    pub fn add_point(&mut self, x: f32, y: f32, z: f32) {
        self.points.push(Point::new(x, y, z));
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    pub fn as_slice(&self) -> &[Point] {
        &self.points
    }

    /// Views all points as one flat list of coordinates `[x0, y0, z0, x1, y1, z1, ...]`
    pub fn as_flat_coordinates(&self) -> &[f32] {
        bytemuck::cast_slice(&self.points)
    }
}

impl From<Vec<Point>> for PointArray {
    fn from(points: Vec<Point>) -> Self {
        Self { points }
    }
}

impl FromIterator<Point> for PointArray {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PointArray {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
