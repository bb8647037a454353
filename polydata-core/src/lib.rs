#![warn(clippy::all)]

//! Core data structures for POLYDATA surface mesh messages
//!
//! A POLYDATA message describes a polygonal surface: a [PointArray](crate::geometry::PointArray) of 3D
//! coordinates, up to four [CellArray](crate::geometry::CellArray) topology channels (vertices, lines,
//! polygons and triangle strips) and any number of typed per-point or per-cell
//! [Attribute](crate::attribute::Attribute)s. This crate only holds the in-memory model, packing and
//! unpacking of the binary payload lives in `polydata-io`.

pub extern crate nalgebra;

/// Typed per-point and per-cell data channels
pub mod attribute;
/// Points and cell topology
pub mod geometry;
/// Small numeric helpers shared by the model and the codec
pub mod math;

mod error;
pub use self::error::*;
